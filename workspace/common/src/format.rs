use rusty_money::{Money, iso};

const BILLION: f64 = 1_000_000_000.0;
const MILLION: f64 = 1_000_000.0;

/// Short price label for chart axes and stat cards: `3.45B` or `850M`.
pub fn format_price_compact(price: f64) -> String {
    if !price.is_finite() {
        return "N/A".to_string();
    }
    if price.abs() >= BILLION {
        format!("{:.2}B", price / BILLION)
    } else {
        format!("{:.0}M", price / MILLION)
    }
}

/// Full price in Vietnamese dong, rounded to the whole unit.
pub fn format_vnd(price: f64) -> String {
    if !price.is_finite() {
        return "N/A".to_string();
    }
    Money::from_major(price.round() as i64, iso::VND).to_string()
}
