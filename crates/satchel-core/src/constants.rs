//! Domain limits shared across crates.

/// Smallest lesson or assessment duration a user may enter.
pub const MIN_EVENT_DURATION_MINUTES: i64 = 15;
/// Largest lesson or assessment duration a user may enter.
pub const MAX_EVENT_DURATION_MINUTES: i64 = 8 * 60;

/// Furthest into the future any event time may be placed.
pub const MAX_TIMEFRAME_DAYS: i64 = 365;
/// Furthest into the past a trigger time (start or due) may be placed.
pub const RECENT_PAST_DAYS: i64 = 30;

pub const MAX_TASK_LENGTH: usize = 1000;
pub const MAX_DESCRIPTION_LENGTH: usize = 500;
pub const MAX_SUBJECT_NAME_LENGTH: usize = 150;
pub const MAX_SUBJECTS_PER_USER: i64 = 200;

/// Fallback durations applied when a profile carries none.
pub const DEFAULT_LESSON_DURATION_MINUTES: i32 = 90;
pub const DEFAULT_ASSESSMENT_DURATION_MINUTES: i32 = 90;

/// Default cadence of the notification sweep.
pub const DEFAULT_SWEEP_INTERVAL_SECONDS: u64 = 60;
