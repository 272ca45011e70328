use common::ModelInfo;
use yew::prelude::*;

use crate::hooks::use_app;

const FEATURE_PREVIEW: usize = 5;

fn metric(value: Option<f64>, decimals: usize) -> String {
    value
        .map(|v| format!("{:.*}", decimals, v))
        .unwrap_or_else(|| "N/A".to_string())
}

fn info_rows(info: &ModelInfo) -> Vec<(&'static str, String)> {
    let metrics = info.metrics.clone().unwrap_or_default();
    vec![
        ("Version", info.short_version().to_string()),
        ("Trained at", info.trained_at.clone().unwrap_or_else(|| "N/A".to_string())),
        (
            "Training samples",
            info.training_samples
                .map(|n| n.to_string())
                .unwrap_or_else(|| "N/A".to_string()),
        ),
        ("R²", metric(metrics.r2_score, 4)),
        ("RMSE", metric(metrics.rmse, 2)),
        ("MAE", metric(metrics.mae, 2)),
    ]
}

#[function_component(ModelInfoCard)]
pub fn model_info_card() -> Html {
    let app = use_app();

    let body = match &app.state().model_info {
        Some(info) => {
            let (shown, hidden) = info.feature_preview(FEATURE_PREVIEW);
            html! {
                <>
                    <table class="table table-sm">
                        <tbody>
                            {for info_rows(info).into_iter().map(|(label, value)| html! {
                                <tr>
                                    <td class="text-gray-500">{label}</td>
                                    <td class="text-right font-medium">{value}</td>
                                </tr>
                            })}
                        </tbody>
                    </table>
                    <div class="flex flex-wrap gap-1 mt-2">
                        <span class="text-sm text-gray-500 mr-1">{format!("{} features:", info.feature_count)}</span>
                        {for shown.iter().map(|name| html! { <span class="badge badge-outline">{name}</span> })}
                        {if hidden > 0 {
                            html! { <span class="badge badge-ghost">{format!("+{} more", hidden)}</span> }
                        } else {
                            html! {}
                        }}
                    </div>
                </>
            }
        }
        None => html! {
            <p class="text-sm text-gray-500">{"No model information available."}</p>
        },
    };

    html! {
        <div class="card bg-base-100 shadow">
            <div class="card-body">
                <h2 class="card-title"><i class="fas fa-circle-info"></i>{" Model Information"}</h2>
                {body}
            </div>
        </div>
    }
}
