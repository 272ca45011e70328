use compute::aggregate::{AreaBucket, BedroomGroup, TimePoint};
use serde_json::Value;
use wasm_bindgen::prelude::*;
use web_sys::Element;
use yew::prelude::*;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = Plotly)]
    pub fn newPlot(div_id: &str, data: JsValue, layout: JsValue, config: JsValue);
}

/// Prices are charted in millions of VND.
const MILLION: f64 = 1_000_000.0;

fn base_layout(y_title: &str) -> Value {
    serde_json::json!({
        "margin": {"t": 10, "r": 10, "l": 60, "b": 40},
        "paper_bgcolor": "rgba(0,0,0,0)",
        "plot_bgcolor": "rgba(0,0,0,0)",
        "xaxis": {"showgrid": false},
        "yaxis": {"showgrid": true, "gridcolor": "#eee", "title": {"text": y_title}}
    })
}

fn plot(element: &Element, traces: &Value, layout: &Value) {
    let div_id = element.id();
    if div_id.is_empty() {
        return;
    }
    let config = serde_json::json!({"responsive": true, "displayModeBar": false});
    let encode = |v: &Value| {
        serde_wasm_bindgen::to_value(v).map_err(|e| log::error!("Failed to encode chart data: {}", e))
    };
    if let (Ok(traces), Ok(layout), Ok(config)) = (encode(traces), encode(layout), encode(&config)) {
        newPlot(&div_id, traces, layout, config);
    }
}

pub fn price_trend_traces(series: &[TimePoint]) -> Value {
    let labels: Vec<&str> = series.iter().map(|p| p.label.as_str()).collect();
    let prices: Vec<f64> = series.iter().map(|p| p.price / MILLION).collect();
    serde_json::json!([{
        "x": labels,
        "y": prices,
        "type": "scatter",
        "mode": "lines+markers",
        "line": {"color": "#6366f1", "shape": "spline"},
        "name": "Predicted price"
    }])
}

pub fn bedroom_traces(groups: &[BedroomGroup]) -> Value {
    let labels: Vec<String> = groups.iter().map(|g| format!("{} bd", g.bedrooms)).collect();
    let averages: Vec<f64> = groups.iter().map(|g| g.average_price() / MILLION).collect();
    serde_json::json!([{
        "x": labels,
        "y": averages,
        "type": "bar",
        "marker": {"color": "#22c55e"},
        "name": "Average price"
    }])
}

pub fn area_traces(buckets: &[AreaBucket]) -> Value {
    let labels: Vec<&str> = buckets.iter().map(|b| b.range.label).collect();
    let counts: Vec<usize> = buckets.iter().map(|b| b.count).collect();
    serde_json::json!([{
        "labels": labels,
        "values": counts,
        "type": "pie",
        "hole": 0.4
    }])
}

#[derive(Properties, PartialEq)]
pub struct PriceTrendProps {
    pub series: Vec<TimePoint>,
}

#[function_component(PriceTrendChart)]
pub fn price_trend_chart(props: &PriceTrendProps) -> Html {
    let chart_ref = use_node_ref();

    use_effect_with((chart_ref.clone(), props.series.clone()), move |(chart_ref, series)| {
        if let Some(element) = chart_ref.cast::<Element>() {
            plot(&element, &price_trend_traces(series), &base_layout("Million VND"));
        }
        || ()
    });

    html! {
        <div ref={chart_ref} id="chart-price-trend" class="chart-container" style="height: 300px;"></div>
    }
}

#[derive(Properties, PartialEq)]
pub struct BedroomChartProps {
    pub groups: Vec<BedroomGroup>,
}

#[function_component(BedroomChart)]
pub fn bedroom_chart(props: &BedroomChartProps) -> Html {
    let chart_ref = use_node_ref();

    use_effect_with((chart_ref.clone(), props.groups.clone()), move |(chart_ref, groups)| {
        if let Some(element) = chart_ref.cast::<Element>() {
            plot(&element, &bedroom_traces(groups), &base_layout("Million VND"));
        }
        || ()
    });

    html! {
        <div ref={chart_ref} id="chart-bedrooms" class="chart-container" style="height: 300px;"></div>
    }
}

#[derive(Properties, PartialEq)]
pub struct AreaChartProps {
    pub buckets: Vec<AreaBucket>,
}

#[function_component(AreaChart)]
pub fn area_chart(props: &AreaChartProps) -> Html {
    let chart_ref = use_node_ref();

    use_effect_with((chart_ref.clone(), props.buckets.clone()), move |(chart_ref, buckets)| {
        if let Some(element) = chart_ref.cast::<Element>() {
            let layout = serde_json::json!({
                "margin": {"t": 10, "r": 10, "l": 10, "b": 10},
                "paper_bgcolor": "rgba(0,0,0,0)",
                "showlegend": true
            });
            plot(&element, &area_traces(buckets), &layout);
        }
        || ()
    });

    html! {
        <div ref={chart_ref} id="chart-areas" class="chart-container" style="height: 300px;"></div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use common::{FeaturesUsed, PredictionRecord};
    use compute::aggregate::DashboardSnapshot;

    fn record(price: f64, area: f64, bedrooms: u32) -> PredictionRecord {
        PredictionRecord {
            predicted_price: price,
            features_used: FeaturesUsed {
                area: Some(area),
                bedrooms: Some(bedrooms),
                ..FeaturesUsed::default()
            },
            timestamp: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_traces_scale_prices_to_millions() {
        let records = vec![record(2.0e9, 80.0, 2), record(4.0e9, 250.0, 2)];
        let snapshot = DashboardSnapshot::build(&records, 10);

        let trend = price_trend_traces(&snapshot.series);
        assert_eq!(trend[0]["x"][1], "Pred 2");
        assert_eq!(trend[0]["y"][0], 2000.0);

        let bedrooms = bedroom_traces(&snapshot.bedrooms);
        assert_eq!(bedrooms[0]["x"][0], "2 bd");
        assert_eq!(bedrooms[0]["y"][0], 3000.0);

        let areas = area_traces(&snapshot.areas);
        assert_eq!(areas[0]["labels"].as_array().map(|a| a.len()), Some(5));
    }
}
