//! Relative "last updated" labels for the editor header.

use chrono::{DateTime, Utc};

/// `"Updated now"`, `"Updated 5m ago"`, `"Updated 3h ago"`, or
/// `"Updated on Mar 4"` once a day has passed. Minutes are rounded to the
/// nearest minute and hours are rounded from those minutes.
pub fn format_last_updated(updated: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = (now - updated).num_seconds().max(0);
    if seconds < 60 {
        return "Updated now".to_string();
    }
    let minutes = (seconds as f64 / 60.0).round() as i64;
    if minutes < 60 {
        return format!("Updated {minutes}m ago");
    }
    let hours = (minutes as f64 / 60.0).round() as i64;
    if hours < 24 {
        return format!("Updated {hours}h ago");
    }
    format!("Updated on {}", updated.format("%b %-d"))
}
