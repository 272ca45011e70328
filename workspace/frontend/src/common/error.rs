use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct ErrorAlertProps {
    pub title: AttrValue,
    pub message: AttrValue,
    #[prop_or_default]
    pub on_dismiss: Option<Callback<()>>,
}

/// Inline error box for a failed user action.
#[function_component(ErrorAlert)]
pub fn error_alert(props: &ErrorAlertProps) -> Html {
    log::warn!("Displaying error to user: {}", props.message);

    html! {
        <div class="alert alert-error">
            <i class="fas fa-exclamation-circle text-2xl"></i>
            <div class="flex flex-col gap-1">
                <span class="font-semibold">{&props.title}</span>
                <span class="text-sm">{&props.message}</span>
            </div>
            {if let Some(on_dismiss) = &props.on_dismiss {
                let on_dismiss = on_dismiss.clone();
                html! {
                    <button
                        class="btn btn-sm btn-ghost btn-circle"
                        onclick={Callback::from(move |_| on_dismiss.emit(()))}
                    >
                        <i class="fas fa-times"></i>
                    </button>
                }
            } else {
                html! {}
            }}
        </div>
    }
}
