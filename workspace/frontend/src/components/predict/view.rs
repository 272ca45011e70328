use std::rc::Rc;

use common::{format_price_compact, PredictionRecord};
use compute::error::SubmitError;
use compute::form::{FormField, FormState};
use yew::prelude::*;

use super::form::PredictionForm;
use super::location_map::LocationMap;
use super::model_info::ModelInfoCard;
use super::result::PredictionResult;
use crate::common::error::ErrorAlert;
use crate::common::toast::use_toast;
use crate::components::dashboard::Dashboard;
use crate::hooks::use_app;

/// Form contents plus the outcome of the last submit. Edits go through the
/// reducer so none are lost.
#[derive(Clone, Default, PartialEq)]
struct PredictPage {
    form: FormState,
    result: Option<PredictionRecord>,
    error: Option<String>,
}

enum PageAction {
    /// A field changed; the shown outcome no longer matches the inputs
    Edit(FormField, String),
    /// Address resolved from the map
    Locate(String),
    Submitted,
    Succeeded(PredictionRecord),
    Failed(String),
    DismissError,
}

impl Reducible for PredictPage {
    type Action = PageAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let mut next = (*self).clone();
        match action {
            PageAction::Edit(field, value) => {
                next.form.set(field, value);
                next.result = None;
                next.error = None;
            }
            PageAction::Locate(address) => next.form.set(FormField::Location, address),
            PageAction::Submitted | PageAction::DismissError => next.error = None,
            PageAction::Succeeded(record) => next.result = Some(record),
            PageAction::Failed(message) => next.error = Some(message),
        }
        Rc::new(next)
    }
}

#[function_component(Predict)]
pub fn predict() -> Html {
    let app = use_app();
    let toast = use_toast();
    let page = use_reducer(PredictPage::default);
    let busy = use_state(|| false);

    let on_change = {
        let page = page.dispatcher();
        Callback::from(move |(field, value): (FormField, String)| {
            page.dispatch(PageAction::Edit(field, value))
        })
    };

    let on_address = {
        let page = page.dispatcher();
        Callback::from(move |address: String| page.dispatch(PageAction::Locate(address)))
    };

    let on_submit = {
        let app = app.clone();
        let page = page.clone();
        let busy = busy.clone();

        Callback::from(move |_| {
            let controller = app.controller.clone();
            let health = app.state().health.clone();
            let request = page.form.clone();
            let app = app.clone();
            let toast = toast.clone();
            let outcome = page.dispatcher();
            let busy = busy.clone();

            busy.set(true);
            outcome.dispatch(PageAction::Submitted);

            wasm_bindgen_futures::spawn_local(async move {
                match controller.submit(&request, &health).await {
                    Ok(record) => {
                        log::info!("Prediction succeeded: {}", record.predicted_price);
                        toast.success(format!(
                            "Predicted price: {}",
                            format_price_compact(record.predicted_price)
                        ));
                        outcome.dispatch(PageAction::Succeeded(record));
                        app.history_changed();
                    }
                    Err(SubmitError::Busy) => {
                        log::debug!("Ignoring submit while a prediction is in flight");
                        return;
                    }
                    Err(e) => {
                        log::error!("Prediction failed: {}", e);
                        toast.error(e.to_string());
                        outcome.dispatch(PageAction::Failed(e.to_string()));
                    }
                }
                busy.set(false);
            });
        })
    };

    let on_dismiss_error = {
        let page = page.dispatcher();
        Callback::from(move |_| page.dispatch(PageAction::DismissError))
    };

    html! {
        <div class="grid grid-cols-1 xl:grid-cols-3 gap-6">
            <div class="xl:col-span-2 space-y-6">
                <div class="card bg-base-100 shadow">
                    <div class="card-body">
                        <h2 class="card-title"><i class="fas fa-house"></i>{" House Details"}</h2>
                        <PredictionForm
                            form={page.form.clone()}
                            {on_change}
                            {on_submit}
                            busy={*busy}
                            model_ready={app.state().model_ready()}
                        />
                    </div>
                </div>
                <div class="card bg-base-100 shadow">
                    <div class="card-body">
                        <h2 class="card-title"><i class="fas fa-map-location-dot"></i>{" Location"}</h2>
                        <LocationMap {on_address} />
                    </div>
                </div>
            </div>
            <div class="space-y-6">
                {if let Some(message) = page.error.clone() {
                    html! { <ErrorAlert title="Prediction failed" {message} on_dismiss={on_dismiss_error} /> }
                } else {
                    html! {}
                }}
                {if let Some(record) = page.result.clone() {
                    html! { <PredictionResult {record} /> }
                } else {
                    html! {}
                }}
                <ModelInfoCard />
                <Dashboard compact={true} />
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use common::FeaturesUsed;

    use super::*;

    fn record() -> PredictionRecord {
        PredictionRecord {
            predicted_price: 2.5e9,
            features_used: FeaturesUsed::default(),
            timestamp: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    fn reduce(page: PredictPage, action: PageAction) -> PredictPage {
        (*Rc::new(page).reduce(action)).clone()
    }

    #[test]
    fn test_edit_clears_shown_outcome() {
        let shown = PredictPage {
            result: Some(record()),
            error: Some("model not trained".to_string()),
            ..PredictPage::default()
        };

        let page = reduce(shown, PageAction::Edit(FormField::Area, "120".to_string()));
        assert_eq!(page.form.get(FormField::Area), "120");
        assert!(page.result.is_none());
        assert!(page.error.is_none());
    }

    #[test]
    fn test_map_address_keeps_result() {
        let shown = PredictPage {
            result: Some(record()),
            ..PredictPage::default()
        };

        let page = reduce(shown, PageAction::Locate("District 1".to_string()));
        assert_eq!(page.form.get(FormField::Location), "District 1");
        assert!(page.result.is_some());
    }

    #[test]
    fn test_failure_keeps_form_and_last_result() {
        let page = reduce(PredictPage::default(), PageAction::Edit(FormField::Bedrooms, "3".to_string()));
        let page = reduce(page, PageAction::Succeeded(record()));
        let page = reduce(page, PageAction::Submitted);
        let page = reduce(page, PageAction::Failed("Could not reach the prediction server".to_string()));

        assert_eq!(page.form.get(FormField::Bedrooms), "3");
        assert!(page.result.is_some());
        assert_eq!(page.error.as_deref(), Some("Could not reach the prediction server"));
    }
}
