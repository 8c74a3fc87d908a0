//! Schedule time rendering, honoring the profile clock preference.

use chrono::{DateTime, Utc};

use crate::types::TimeDisplayFormat;

/// ## Summary
/// Formats an instant the way it appears in reminder messages, e.g.
/// `"Monday, Sep 07, 2026 at 14:30"` or `"Monday, Sep 07, 2026 at 2:30 PM"`.
#[must_use]
pub fn format_schedule_time(at: DateTime<Utc>, format: TimeDisplayFormat) -> String {
    match format {
        TimeDisplayFormat::H24 => at.format("%A, %b %d, %Y at %H:%M").to_string(),
        TimeDisplayFormat::H12 => at.format("%A, %b %d, %Y at %-I:%M %p").to_string(),
    }
}
