use common::{format_price_compact, format_vnd, PredictionRecord};
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct PredictionResultProps {
    pub record: PredictionRecord,
}

fn or_dash<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string())
}

#[function_component(PredictionResult)]
pub fn prediction_result(props: &PredictionResultProps) -> Html {
    let record = &props.record;
    let features = &record.features_used;

    let rows = [
        ("Area", features.area.map(|a| format!("{} m²", a)).unwrap_or_else(|| "-".to_string())),
        ("Bedrooms", or_dash(features.bedrooms)),
        ("Bathrooms", or_dash(features.bathrooms)),
        ("Floors", or_dash(features.floors)),
        ("Year built", or_dash(features.year_built)),
        ("Location score", or_dash(features.location_score)),
    ];

    html! {
        <div class="card bg-base-100 shadow">
            <div class="card-body">
                <h2 class="card-title"><i class="fas fa-tag"></i>{" Predicted Price"}</h2>
                <div class="stat px-0">
                    <div class="stat-value text-primary">{format_price_compact(record.predicted_price)}</div>
                    <div class="stat-desc">{format_vnd(record.predicted_price)}</div>
                </div>
                <table class="table table-sm">
                    <tbody>
                        {for rows.iter().map(|(label, value)| html! {
                            <tr>
                                <td class="text-gray-500">{label}</td>
                                <td class="text-right font-medium">{value}</td>
                            </tr>
                        })}
                    </tbody>
                </table>
                <p class="text-xs text-gray-400">
                    {record.timestamp.with_timezone(&chrono::Local).format("%Y-%m-%d %H:%M:%S").to_string()}
                </p>
            </div>
        </div>
    }
}
