use common::{format_price_compact, PredictionRecord};
use compute::aggregate::{DashboardSnapshot, DEFAULT_CHART_WINDOW};
use yew::prelude::*;
use yew_router::prelude::*;

use super::chart::{AreaChart, BedroomChart, PriceTrendChart};
use super::stats::Stats;
use crate::hooks::use_app;
use crate::Route;

fn recent_row(record: &PredictionRecord) -> Html {
    let features = &record.features_used;
    let show = |v: Option<String>| v.unwrap_or_else(|| "-".to_string());
    html! {
        <tr>
            <td>{record.timestamp.with_timezone(&chrono::Local).format("%Y-%m-%d %H:%M").to_string()}</td>
            <td>{show(features.area.map(|a| format!("{} m²", a)))}</td>
            <td>{show(features.bedrooms.map(|b| b.to_string()))}</td>
            <td>{show(features.bathrooms.map(|b| b.to_string()))}</td>
            <td class="text-right font-medium">{format_price_compact(record.predicted_price)}</td>
        </tr>
    }
}

/// How much of the dashboard a placement has room for.
#[derive(Debug, Clone, Copy, PartialEq)]
struct DashboardLayout {
    chart_grid: &'static str,
    recent_rows: usize,
}

impl DashboardLayout {
    fn new(compact: bool) -> Self {
        if compact {
            Self {
                chart_grid: "grid grid-cols-1 gap-6 mt-6",
                recent_rows: 0,
            }
        } else {
            Self {
                chart_grid: "grid grid-cols-1 lg:grid-cols-2 gap-6 mt-6",
                recent_rows: DEFAULT_CHART_WINDOW,
            }
        }
    }
}

#[derive(Properties, PartialEq)]
pub struct DashboardProps {
    /// Single-column variant for the predict page side column
    #[prop_or_default]
    pub compact: bool,
}

#[function_component(Dashboard)]
pub fn dashboard(props: &DashboardProps) -> Html {
    let layout = DashboardLayout::new(props.compact);
    let app = use_app();
    let version = *app.history_version;

    // Re-read the log whenever a prediction was stored
    let snapshot = {
        let controller = app.controller.clone();
        use_memo(version, move |_| {
            let records = controller.history().load_all();
            log::debug!("Building dashboard from {} records", records.len());
            DashboardSnapshot::build(&records, DEFAULT_CHART_WINDOW)
        })
    };

    if snapshot.is_empty() {
        return html! {
            <div class="card bg-base-100 shadow">
                <div class="card-body items-center text-center py-16">
                    <i class="fas fa-chart-line text-5xl text-gray-300"></i>
                    <h2 class="card-title mt-4">{"No predictions yet"}</h2>
                    <p class="text-gray-500">{"Make your first prediction to see statistics here."}</p>
                    <Link<Route> to={Route::Predict} classes="btn btn-primary mt-4">{"Make a Prediction"}</Link<Route>>
                </div>
            </div>
        };
    }

    html! {
        <>
            <Stats stats={snapshot.stats} compact={props.compact} />
            <div class={layout.chart_grid}>
                <div class="card bg-base-100 shadow">
                    <div class="card-body">
                        <h2 class="card-title">{format!("Price Trend (last {})", snapshot.recent.len())}</h2>
                        <PriceTrendChart series={snapshot.series.clone()} />
                    </div>
                </div>
                <div class="card bg-base-100 shadow">
                    <div class="card-body">
                        <h2 class="card-title">{"Average Price by Bedrooms"}</h2>
                        <BedroomChart groups={snapshot.bedrooms.clone()} />
                    </div>
                </div>
                {if snapshot.has_area_data() {
                    html! {
                        <div class="card bg-base-100 shadow">
                            <div class="card-body">
                                <h2 class="card-title">{"Area Distribution (m²)"}</h2>
                                <AreaChart buckets={snapshot.areas.clone()} />
                            </div>
                        </div>
                    }
                } else {
                    html! {}
                }}
                {if layout.recent_rows > 0 {
                    html! {
                        <div class="card bg-base-100 shadow">
                            <div class="card-body">
                                <h2 class="card-title">{"Recent Predictions"}</h2>
                                <div class="overflow-x-auto">
                                    <table class="table table-sm">
                                        <thead>
                                            <tr>
                                                <th>{"Time"}</th>
                                                <th>{"Area"}</th>
                                                <th>{"Bedrooms"}</th>
                                                <th>{"Bathrooms"}</th>
                                                <th class="text-right">{"Price"}</th>
                                            </tr>
                                        </thead>
                                        <tbody>
                                            {for snapshot.recent.iter().rev().take(layout.recent_rows).map(recent_row)}
                                        </tbody>
                                    </table>
                                </div>
                            </div>
                        </div>
                    }
                } else {
                    html! {}
                }}
            </div>
        </>
    }
}
