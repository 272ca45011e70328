use compute::form::{FormField, FormState};
use web_sys::HtmlInputElement;
use yew::prelude::*;

use crate::common::loading::ButtonSpinner;

struct FieldSpec {
    field: FormField,
    label: &'static str,
    input_type: &'static str,
    placeholder: &'static str,
    step: Option<&'static str>,
    required: bool,
}

const FIELDS: [FieldSpec; 6] = [
    FieldSpec {
        field: FormField::Area,
        label: "Area (m²)",
        input_type: "number",
        placeholder: "e.g. 120",
        step: Some("0.1"),
        required: true,
    },
    FieldSpec {
        field: FormField::Bedrooms,
        label: "Bedrooms",
        input_type: "number",
        placeholder: "e.g. 3",
        step: Some("1"),
        required: true,
    },
    FieldSpec {
        field: FormField::Bathrooms,
        label: "Bathrooms",
        input_type: "number",
        placeholder: "e.g. 2",
        step: Some("1"),
        required: true,
    },
    FieldSpec {
        field: FormField::Floors,
        label: "Floors",
        input_type: "number",
        placeholder: "1",
        step: Some("1"),
        required: false,
    },
    FieldSpec {
        field: FormField::YearBuilt,
        label: "Year built",
        input_type: "number",
        placeholder: "e.g. 2015",
        step: Some("1"),
        required: false,
    },
    FieldSpec {
        field: FormField::LocationScore,
        label: "Location score (0-10)",
        input_type: "number",
        placeholder: "e.g. 7.5",
        step: Some("0.1"),
        required: false,
    },
];

#[derive(Properties, PartialEq)]
pub struct PredictionFormProps {
    pub form: FormState,
    pub on_change: Callback<(FormField, String)>,
    pub on_submit: Callback<()>,
    pub busy: bool,
    pub model_ready: bool,
}

#[function_component(PredictionForm)]
pub fn prediction_form(props: &PredictionFormProps) -> Html {
    let oninput = {
        let on_change = props.on_change.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            match FormField::from_name(&input.name()) {
                Some(field) => on_change.emit((field, input.value())),
                None => log::warn!("Input '{}' is not a form field", input.name()),
            }
        })
    };

    let onsubmit = {
        let on_submit = props.on_submit.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            on_submit.emit(());
        })
    };

    let disabled = props.busy || !props.model_ready;

    html! {
        <form class="space-y-4" {onsubmit}>
            <div class="grid grid-cols-1 md:grid-cols-2 gap-4">
                {for FIELDS.iter().map(|spec| html! {
                    <div class="form-control">
                        <label class="label">
                            <span class="label-text">
                                {spec.label}
                                {if spec.required { html! { <span class="text-error">{" *"}</span> } } else { html! {} }}
                            </span>
                        </label>
                        <input
                            type={spec.input_type}
                            name={spec.field.name()}
                            class="input input-bordered w-full"
                            placeholder={spec.placeholder}
                            step={spec.step}
                            value={props.form.get(spec.field).to_string()}
                            required={spec.required}
                            disabled={props.busy}
                            oninput={oninput.clone()}
                        />
                    </div>
                })}
            </div>

            <div class="form-control">
                <label class="label"><span class="label-text">{"Location"}</span></label>
                <input
                    type="text"
                    name={FormField::Location.name()}
                    class="input input-bordered w-full"
                    placeholder="Pick a point on the map or type an address"
                    value={props.form.location.clone()}
                    disabled={props.busy}
                    oninput={oninput.clone()}
                />
            </div>

            {if !props.model_ready {
                html! {
                    <div class="alert alert-warning">
                        <i class="fas fa-triangle-exclamation"></i>
                        <span>{"The model is not loaded. Train a model before predicting."}</span>
                    </div>
                }
            } else {
                html! {}
            }}

            <button type="submit" class="btn btn-primary w-full" {disabled}>
                {if props.busy {
                    html! { <><ButtonSpinner />{" Predicting..."}</> }
                } else {
                    html! { <><i class="fas fa-calculator"></i>{" Predict Price"}</> }
                }}
            </button>
        </form>
    }
}
