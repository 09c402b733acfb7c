use chrono::{DateTime, Utc};

/// Render the time between `then` and `now` the way check-in lists show it.
///
/// Timestamps in the future (clock skew) render as "just now".
pub fn format_elapsed(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let delta = now.signed_duration_since(then);
    let minutes = delta.num_minutes();
    if minutes < 1 {
        return "just now".to_string();
    }
    if minutes < 60 {
        return plural(minutes, "minute");
    }
    let hours = delta.num_hours();
    if hours < 24 {
        return plural(hours, "hour");
    }
    match delta.num_days() {
        1 => "yesterday".to_string(),
        days => format!("{days} days ago"),
    }
}

fn plural(n: i64, unit: &str) -> String {
    if n == 1 {
        format!("1 {unit} ago")
    } else {
        format!("{n} {unit}s ago")
    }
}
