use web_sys::{HtmlInputElement, HtmlSelectElement};
use yew::prelude::*;

use crate::common::toast::use_toast;
use crate::settings::{self, parse_log_level, AppSettings};

const LOG_LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

#[function_component(Settings)]
pub fn settings_view() -> Html {
    let toast = use_toast();
    let draft = use_state(settings::get_settings);

    let text_input = |apply: fn(&mut AppSettings, String)| {
        let draft = draft.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            let mut next = (*draft).clone();
            apply(&mut next, input.value());
            draft.set(next);
        })
    };

    let on_host = text_input(|s, v| s.api_host = v);
    let on_port = text_input(|s, v| {
        if let Ok(port) = v.parse() {
            s.api_port = port;
        }
    });
    let on_path = text_input(|s, v| s.api_path = v);
    let on_geocoder = text_input(|s, v| s.geocoder_url = v);

    let on_https = {
        let draft = draft.clone();
        Callback::from(move |e: Event| {
            let input: HtmlInputElement = e.target_unchecked_into();
            let mut next = (*draft).clone();
            next.api_use_https = input.checked();
            draft.set(next);
        })
    };

    let on_log_level = {
        let draft = draft.clone();
        Callback::from(move |e: Event| {
            let select: HtmlSelectElement = e.target_unchecked_into();
            if let Some(level) = parse_log_level(&select.value()) {
                let mut next = (*draft).clone();
                next.log_level = level;
                draft.set(next);
            }
        })
    };

    let on_save = {
        let draft = draft.clone();
        Callback::from(move |_| {
            let next = (*draft).clone();
            match next.save_to_storage() {
                Ok(()) => {
                    log::info!("Settings saved: {:?}", next);
                    settings::update_settings(|s| *s = next.clone());
                    if let Some(window) = web_sys::window() {
                        if let Err(e) = window.location().reload() {
                            log::error!("Failed to reload page: {:?}", e);
                        }
                    }
                }
                Err(e) => {
                    log::error!("Failed to save settings: {:?}", e);
                    toast.error("Could not save settings to local storage");
                }
            }
        })
    };

    let on_reset = {
        let draft = draft.clone();
        Callback::from(move |_| draft.set(AppSettings::default()))
    };

    let current_level = draft.log_level.as_str().to_lowercase();

    html! {
        <div class="grid grid-cols-1 md:grid-cols-2 gap-8">
            <div class="card bg-base-100 shadow">
                <div class="card-body">
                    <h2 class="card-title">{"Prediction Service"}</h2>
                    <div class="form-control w-full mt-2">
                        <label class="label"><span class="label-text">{"Host"}</span></label>
                        <input type="text" class="input input-bordered w-full" value={draft.api_host.clone()} oninput={on_host} />
                    </div>
                    <div class="form-control w-full">
                        <label class="label"><span class="label-text">{"Port"}</span></label>
                        <input type="number" class="input input-bordered w-full" value={draft.api_port.to_string()} oninput={on_port} />
                    </div>
                    <div class="form-control w-full">
                        <label class="label"><span class="label-text">{"Path prefix"}</span></label>
                        <input type="text" class="input input-bordered w-full" placeholder="(none)" value={draft.api_path.clone()} oninput={on_path} />
                    </div>
                    <div class="form-control">
                        <label class="label cursor-pointer justify-start gap-3">
                            <input type="checkbox" class="checkbox" checked={draft.api_use_https} onchange={on_https} />
                            <span class="label-text">{"Use HTTPS"}</span>
                        </label>
                    </div>
                    <p class="text-sm text-gray-500">{format!("Requests go to {}", draft.api_base_url())}</p>
                </div>
            </div>

            <div class="card bg-base-100 shadow">
                <div class="card-body">
                    <h2 class="card-title">{"Map & Logging"}</h2>
                    <div class="form-control w-full mt-2">
                        <label class="label"><span class="label-text">{"Geocoder URL"}</span></label>
                        <input type="text" class="input input-bordered w-full" value={draft.geocoder_url.clone()} oninput={on_geocoder} />
                    </div>
                    <div class="form-control w-full">
                        <label class="label"><span class="label-text">{"Log level"}</span></label>
                        <select class="select select-bordered w-full" onchange={on_log_level}>
                            {for LOG_LEVELS.iter().map(|level| html! {
                                <option value={*level} selected={*level == current_level}>{*level}</option>
                            })}
                        </select>
                    </div>
                    <div class="card-actions justify-end mt-4">
                        <button class="btn btn-ghost" onclick={on_reset}>{"Reset to defaults"}</button>
                        <button class="btn btn-primary" onclick={on_save}>{"Save & Reload"}</button>
                    </div>
                </div>
            </div>
        </div>
    }
}
