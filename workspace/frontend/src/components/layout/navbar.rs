use yew::prelude::*;

use crate::hooks::use_app;

#[derive(Properties, PartialEq)]
pub struct Props {
    pub title: AttrValue,
}

#[function_component(Navbar)]
pub fn navbar(props: &Props) -> Html {
    let app = use_app();
    let state = app.state();

    let (badge_class, badge_icon, badge_text) = if state.model_ready() {
        ("badge-success", "fas fa-circle-check", "Model Ready")
    } else {
        ("badge-error", "fas fa-circle-xmark", "Model Offline")
    };

    let on_refresh = {
        let app = app.clone();
        Callback::from(move |_| {
            log::debug!("Manual status refresh");
            app.refresh();
        })
    };

    html! {
        <div class="navbar bg-base-100 shadow-sm z-40 sticky top-0">
            <div class="flex-none lg:hidden">
                <label aria-label="open sidebar" class="btn btn-square btn-ghost" for="app-drawer">
                    <i class="fas fa-bars text-xl"></i>
                </label>
            </div>
            <div class="flex-1 px-4">
                <h1 class="text-xl font-bold">{ &props.title }</h1>
            </div>
            <div class="flex-none gap-2 items-center">
                {if let Some(info) = &state.model_info {
                    html! { <span class="badge badge-ghost">{format!("v{}", info.short_version())}</span> }
                } else {
                    html! {}
                }}
                <span class={classes!("badge", "gap-1", badge_class)}>
                    <i class={badge_icon}></i>
                    {badge_text}
                </span>
                <button class="btn btn-ghost btn-circle" title="Refresh status" onclick={on_refresh}>
                    <i class="fas fa-sync-alt"></i>
                </button>
            </div>
        </div>
    }
}
