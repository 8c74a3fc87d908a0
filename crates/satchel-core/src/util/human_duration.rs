//! Human-readable duration rendering for reminder payloads.

use chrono::Duration;

/// ## Summary
/// Renders a duration as the two most significant units, e.g.
/// `"2 days 3 hours"` or `"45 minutes"`.
///
/// Durations under a minute render as `"less than a minute"`; negative
/// durations (an already-passed trigger) get an `"overdue"` suffix.
#[must_use]
pub fn human_duration(duration: Duration) -> String {
    let overdue = duration < Duration::zero();
    let total_minutes = duration.num_minutes().abs();

    if total_minutes < 1 {
        return "less than a minute".to_owned();
    }

    let days = total_minutes / (24 * 60);
    let hours = (total_minutes % (24 * 60)) / 60;
    let minutes = total_minutes % 60;

    let mut parts = Vec::new();
    push_unit(&mut parts, days, "day");
    push_unit(&mut parts, hours, "hour");
    push_unit(&mut parts, minutes, "minute");

    let mut rendered = parts
        .into_iter()
        .take(2)
        .collect::<Vec<_>>()
        .join(" ");

    if overdue {
        rendered.push_str(" overdue");
    }
    rendered
}

fn push_unit(parts: &mut Vec<String>, count: i64, unit: &str) {
    if count == 1 {
        parts.push(format!("1 {unit}"));
    } else if count > 1 {
        parts.push(format!("{count} {unit}s"));
    }
}
