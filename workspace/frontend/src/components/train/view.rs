use common::{TrainRequest, TrainResponse, MAX_SAMPLES, MIN_SAMPLES};
use web_sys::HtmlInputElement;
use yew::prelude::*;

use crate::common::error::ErrorAlert;
use crate::common::loading::Loading;
use crate::common::toast::use_toast;
use crate::hooks::use_app;

#[derive(Clone, Copy, PartialEq)]
enum DataSource {
    Generated,
    Dataset,
}

/// Builds the request from the panel inputs. A sample count that does not
/// parse is sent as 0 so the range check rejects it with its usual message.
fn build_request(source: DataSource, samples: &str, data_path: &str) -> TrainRequest {
    match source {
        DataSource::Generated => TrainRequest::sample_data(samples.trim().parse().unwrap_or(0)),
        DataSource::Dataset => TrainRequest::real_data(Some(data_path.to_string())),
    }
}

#[function_component(Train)]
pub fn train() -> Html {
    let app = use_app();
    let toast = use_toast();
    let source = use_state(|| DataSource::Generated);
    let samples = use_state(|| TrainRequest::default().n_samples.to_string());
    let data_path = use_state(String::new);
    let busy = use_state(|| false);
    let error = use_state(|| None::<String>);
    let last_result = use_state(|| None::<TrainResponse>);

    let on_samples = {
        let samples = samples.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            samples.set(input.value());
        })
    };

    let on_data_path = {
        let data_path = data_path.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            data_path.set(input.value());
        })
    };

    let select_source = |choice: DataSource| {
        let source = source.clone();
        Callback::from(move |_: Event| source.set(choice))
    };

    let on_submit = {
        let app = app.clone();
        let source = source.clone();
        let samples = samples.clone();
        let data_path = data_path.clone();
        let busy = busy.clone();
        let error = error.clone();
        let last_result = last_result.clone();

        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            if *busy {
                return;
            }

            let request = build_request(*source, &samples, &data_path);
            let controller = app.controller.clone();
            let app = app.clone();
            let toast = toast.clone();
            let busy = busy.clone();
            let error = error.clone();
            let last_result = last_result.clone();

            busy.set(true);
            error.set(None);

            wasm_bindgen_futures::spawn_local(async move {
                log::info!("Training requested: {:?}", request);
                match controller.train(&request).await {
                    Ok((response, updates)) => {
                        toast.success(response.message.clone());
                        app.apply(updates);
                        last_result.set(Some(response));
                    }
                    Err(e) => {
                        log::error!("Training failed: {}", e);
                        toast.error(e.message.clone());
                        error.set(Some(e.message));
                    }
                }
                busy.set(false);
            });
        })
    };

    let generated = *source == DataSource::Generated;

    html! {
        <div class="grid grid-cols-1 lg:grid-cols-2 gap-6">
            <div class="card bg-base-100 shadow">
                <div class="card-body">
                    <h2 class="card-title"><i class="fas fa-brain"></i>{" Train a New Model"}</h2>
                    <form class="space-y-4" onsubmit={on_submit}>
                        <div class="form-control">
                            <label class="label cursor-pointer justify-start gap-3">
                                <input type="radio" name="source" class="radio radio-primary"
                                    checked={generated} onchange={select_source(DataSource::Generated)}
                                    disabled={*busy} />
                                <span class="label-text">{"Generate sample data"}</span>
                            </label>
                            <label class="label cursor-pointer justify-start gap-3">
                                <input type="radio" name="source" class="radio radio-primary"
                                    checked={!generated} onchange={select_source(DataSource::Dataset)}
                                    disabled={*busy} />
                                <span class="label-text">{"Use the server dataset"}</span>
                            </label>
                        </div>

                        {if generated {
                            html! {
                                <div class="form-control">
                                    <label class="label">
                                        <span class="label-text">{"Number of samples"}</span>
                                        <span class="label-text-alt">{format!("{} to {}", MIN_SAMPLES, MAX_SAMPLES)}</span>
                                    </label>
                                    <input type="number" class="input input-bordered w-full"
                                        min={MIN_SAMPLES.to_string()} max={MAX_SAMPLES.to_string()} step="1000"
                                        value={(*samples).clone()} oninput={on_samples} disabled={*busy} />
                                </div>
                            }
                        } else {
                            html! {
                                <div class="form-control">
                                    <label class="label"><span class="label-text">{"Dataset path on the server (optional)"}</span></label>
                                    <input type="text" class="input input-bordered w-full"
                                        placeholder="data/house_prices.csv"
                                        value={(*data_path).clone()} oninput={on_data_path} disabled={*busy} />
                                </div>
                            }
                        }}

                        <button type="submit" class="btn btn-primary w-full" disabled={*busy}>
                            <i class="fas fa-play"></i>{" Start Training"}
                        </button>
                    </form>
                </div>
            </div>

            <div class="space-y-6">
                {if *busy {
                    html! { <Loading text={"Training model, this may take a minute..."} /> }
                } else {
                    html! {}
                }}
                {if let Some(message) = (*error).clone() {
                    html! { <ErrorAlert title="Training failed" {message} /> }
                } else {
                    html! {}
                }}
                {if let Some(result) = (*last_result).clone() {
                    let metrics = result.performance.as_ref().and_then(|p| p.metrics.clone()).unwrap_or_default();
                    let fmt = |v: Option<f64>| v.map(|v| format!("{:.4}", v)).unwrap_or_else(|| "N/A".to_string());
                    html! {
                        <div class="card bg-base-100 shadow">
                            <div class="card-body">
                                <h2 class="card-title"><i class="fas fa-check-circle text-success"></i>{" Last Training Run"}</h2>
                                <p>{&result.message}</p>
                                <div class="stats stats-vertical lg:stats-horizontal shadow">
                                    <div class="stat">
                                        <div class="stat-title">{"R²"}</div>
                                        <div class="stat-value text-lg">{fmt(metrics.r2_score)}</div>
                                    </div>
                                    <div class="stat">
                                        <div class="stat-title">{"RMSE"}</div>
                                        <div class="stat-value text-lg">{fmt(metrics.rmse)}</div>
                                    </div>
                                    <div class="stat">
                                        <div class="stat-title">{"MAE"}</div>
                                        <div class="stat-value text-lg">{fmt(metrics.mae)}</div>
                                    </div>
                                </div>
                            </div>
                        </div>
                    }
                } else {
                    html! {}
                }}
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_request_generated() {
        let request = build_request(DataSource::Generated, " 2000 ", "ignored");
        assert!(request.generate_sample);
        assert_eq!(request.n_samples, 2000);
        assert!(request.data_path.is_none());
    }

    #[test]
    fn test_build_request_unparsable_count_is_out_of_range() {
        let request = build_request(DataSource::Generated, "lots", "");
        assert_eq!(request.n_samples, 0);
    }

    #[test]
    fn test_build_request_dataset_ignores_blank_path() {
        let request = build_request(DataSource::Dataset, "50000", "  ");
        assert!(!request.generate_sample);
        assert!(request.data_path.is_none());
    }
}
