//! Display strings for the admin dashboard and CLI.

use crate::types::{PopularitySelection, RatingRollup, ShadePopularitySelection};

/// `"4.3 ⭐ (12 ratings)"`, or `"No ratings"` so an empty rollup's zero
/// average is never shown as a score.
#[must_use]
pub fn format_rating(rollup: &RatingRollup) -> String {
    match rollup.count {
        0 => "No ratings".to_string(),
        1 => format!("{:.1} ⭐ (1 rating)", rollup.average),
        n => format!("{:.1} ⭐ ({n} ratings)", rollup.average),
    }
}

/// `"MAC (4.3⭐)"`, or `"N/A"` when nothing has been rated.
#[must_use]
pub fn format_popular(selection: &PopularitySelection) -> String {
    match &selection.brand {
        Some(brand) if selection.count > 0 => format!("{brand} ({:.1}⭐)", selection.average),
        _ => "N/A".to_string(),
    }
}

/// `"MAC - Ruby Woo (4.5⭐)"`, or `"N/A"`.
#[must_use]
pub fn format_popular_shade(selection: &ShadePopularitySelection) -> String {
    match (&selection.brand, &selection.shade_name) {
        (Some(brand), Some(shade)) if selection.count > 0 => {
            format!("{brand} - {shade} ({:.1}⭐)", selection.average)
        }
        _ => "N/A".to_string(),
    }
}

/// Whole-second `"{m}m {s}s"` rendering of a duration in seconds.
#[must_use]
pub fn format_duration(seconds: f64) -> String {
    if !seconds.is_finite() || seconds <= 0.0 {
        return "0m 0s".to_string();
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let whole = seconds.round() as u64;
    format!("{}m {}s", whole / 60, whole % 60)
}
