//! Chart-ready aggregations over a snapshot of the prediction log.
//!
//! Everything here is pure: the functions take a slice of records and never
//! touch storage. Empty input always yields empty or zeroed output.

use std::collections::BTreeMap;

use common::PredictionRecord;
use serde::Serialize;

/// Number of most recent records the dashboard charts.
pub const DEFAULT_CHART_WINDOW: usize = 10;

/// Count, mean, minimum and maximum of the predicted prices.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct SummaryStats {
    pub count: usize,
    pub average: f64,
    pub min: f64,
    pub max: f64,
}

pub fn summary_stats(records: &[PredictionRecord]) -> SummaryStats {
    if records.is_empty() {
        return SummaryStats::default();
    }

    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    let mut total = 0.0;
    for price in records.iter().map(|r| r.predicted_price) {
        total += price;
        min = min.min(price);
        max = max.max(price);
    }

    SummaryStats {
        count: records.len(),
        average: total / records.len() as f64,
        min,
        max,
    }
}

/// One point of the price trend chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimePoint {
    /// Sequential label, `Pred 1` for the oldest record
    pub label: String,
    pub price: f64,
    pub area: Option<f64>,
}

pub fn time_series(records: &[PredictionRecord]) -> Vec<TimePoint> {
    records
        .iter()
        .enumerate()
        .map(|(i, r)| TimePoint {
            label: format!("Pred {}", i + 1),
            price: r.predicted_price,
            area: r.features_used.area,
        })
        .collect()
}

/// Predictions sharing one bedroom count.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BedroomGroup {
    pub bedrooms: u32,
    pub count: usize,
    pub total_price: f64,
}

impl BedroomGroup {
    pub fn average_price(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.total_price / self.count as f64
        }
    }
}

/// Groups records by exact bedroom count, ascending. Records without a
/// bedroom count are left out.
pub fn bedroom_distribution(records: &[PredictionRecord]) -> Vec<BedroomGroup> {
    let mut groups: BTreeMap<u32, BedroomGroup> = BTreeMap::new();
    for record in records {
        let Some(bedrooms) = record.features_used.bedrooms else {
            continue;
        };
        let group = groups.entry(bedrooms).or_insert(BedroomGroup {
            bedrooms,
            count: 0,
            total_price: 0.0,
        });
        group.count += 1;
        group.total_price += record.predicted_price;
    }
    groups.into_values().collect()
}

/// Half-open area interval `[min, max)` in square meters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AreaRange {
    pub label: &'static str,
    pub min: f64,
    /// `None` for the last, unbounded range
    pub max: Option<f64>,
}

impl AreaRange {
    pub fn contains(&self, area: f64) -> bool {
        area >= self.min && self.max.is_none_or(|max| area < max)
    }
}

/// The five fixed dashboard ranges. They tile `[0, ∞)` without overlap.
pub const AREA_RANGES: [AreaRange; 5] = [
    AreaRange { label: "<100", min: 0.0, max: Some(100.0) },
    AreaRange { label: "100-150", min: 100.0, max: Some(150.0) },
    AreaRange { label: "150-200", min: 150.0, max: Some(200.0) },
    AreaRange { label: "200-300", min: 200.0, max: Some(300.0) },
    AreaRange { label: ">300", min: 300.0, max: None },
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AreaBucket {
    pub range: AreaRange,
    pub count: usize,
}

/// Counts records per [`AREA_RANGES`] entry. All five buckets are returned,
/// empty ones included. Records without an area, or with one outside every
/// range, are not counted.
pub fn area_distribution(records: &[PredictionRecord]) -> Vec<AreaBucket> {
    AREA_RANGES
        .iter()
        .map(|range| AreaBucket {
            range: *range,
            count: records
                .iter()
                .filter_map(|r| r.features_used.area)
                .filter(|area| range.contains(*area))
                .count(),
        })
        .collect()
}

/// Everything the dashboard renders, computed from one log snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSnapshot {
    /// Over the whole log
    pub stats: SummaryStats,
    /// The charted window, oldest first
    pub recent: Vec<PredictionRecord>,
    pub series: Vec<TimePoint>,
    pub bedrooms: Vec<BedroomGroup>,
    pub areas: Vec<AreaBucket>,
}

impl DashboardSnapshot {
    /// Summary over all records, charts over the last `window` of them.
    pub fn build(records: &[PredictionRecord], window: usize) -> Self {
        let start = records.len().saturating_sub(window);
        let recent = &records[start..];

        Self {
            stats: summary_stats(records),
            recent: recent.to_vec(),
            series: time_series(recent),
            bedrooms: bedroom_distribution(recent),
            areas: area_distribution(recent),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.recent.is_empty()
    }

    /// Whether any charted record falls in an area bucket.
    pub fn has_area_data(&self) -> bool {
        self.areas.iter().any(|b| b.count > 0)
    }
}
