use anyhow::Result;
use common::{PredictionRecord, format_price_compact};
use compute::aggregate::DashboardSnapshot;
use tracing::{debug, trace};

use super::Context;
use crate::output::{key_value_table, or_na};

pub fn history(ctx: &Context, last: Option<usize>) -> Result<()> {
    trace!("Entering history command");
    let log = ctx.log();
    let records = match last {
        Some(n) => log.load_recent(n),
        None => log.load_all(),
    };
    debug!("Loaded {} records", records.len());
    ctx.format.print(&records, |r| render_history(r))
}

pub fn dashboard(ctx: &Context, window: usize) -> Result<()> {
    trace!("Entering dashboard command");
    let records = ctx.log().load_all();
    let snapshot = DashboardSnapshot::build(&records, window);
    ctx.format.print(&snapshot, render_dashboard)
}

pub fn render_history(records: &[PredictionRecord]) -> String {
    if records.is_empty() {
        return "No predictions yet".to_string();
    }
    records
        .iter()
        .map(|r| {
            format!(
                "{}  {:>10}  {:>8} m²  {} bd  {} ba",
                r.timestamp.format("%Y-%m-%d %H:%M"),
                format_price_compact(r.predicted_price),
                or_na(r.features_used.area),
                or_na(r.features_used.bedrooms),
                or_na(r.features_used.bathrooms),
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_dashboard(snapshot: &DashboardSnapshot) -> String {
    if snapshot.stats.count == 0 {
        return "No predictions yet".to_string();
    }

    let stats = &snapshot.stats;
    let mut out = key_value_table(&[
        ("Predictions", stats.count.to_string()),
        ("Average", format_price_compact(stats.average)),
        ("Lowest", format_price_compact(stats.min)),
        ("Highest", format_price_compact(stats.max)),
    ]);

    out.push_str("\n\nPrice trend\n");
    for point in &snapshot.series {
        out.push_str(&format!(
            "  {:<8} {:>10}\n",
            point.label,
            format_price_compact(point.price)
        ));
    }

    out.push_str("\nAverage price by bedrooms\n");
    for group in &snapshot.bedrooms {
        out.push_str(&format!(
            "  {} bd     {:>10}  ({} predictions)\n",
            group.bedrooms,
            format_price_compact(group.average_price()),
            group.count
        ));
    }

    if snapshot.has_area_data() {
        out.push_str("\nArea distribution (m²)\n");
        for bucket in &snapshot.areas {
            out.push_str(&format!(
                "  {:<8} {}\n",
                bucket.range.label,
                "#".repeat(bucket.count)
            ));
        }
    }
    out
}
