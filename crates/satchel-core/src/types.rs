//! Closed event and preference enums shared across crates.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// The three event shapes that can carry a reminder.
///
/// Dispatch over event types is always an exhaustive `match`, so adding a
/// fourth variant is a compile-time gap rather than a silent miss.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    Lesson,
    Assessment,
    Homework,
}

impl EventType {
    pub const ALL: [Self; 3] = [Self::Lesson, Self::Assessment, Self::Homework];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Lesson => "lesson",
            Self::Assessment => "assessment",
            Self::Homework => "homework",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a user wants reminders delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationMethod {
    Email,
    Push,
    Both,
}

impl NotificationMethod {
    #[must_use]
    pub const fn includes_email(self) -> bool {
        matches!(self, Self::Email | Self::Both)
    }

    #[must_use]
    pub const fn includes_push(self) -> bool {
        matches!(self, Self::Push | Self::Both)
    }
}

/// Clock format preference for rendered schedule times.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeDisplayFormat {
    H24,
    H12,
}

/// Reminder lifecycle of a single event row.
///
/// The store persists two columns (`scheduled_reminder_time`,
/// `reminder_sent`); this tri-state is the only in-memory representation,
/// making the illegal column pair (sent with no scheduled time)
/// unrepresentable past the decode boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReminderState {
    /// No reminder has been scheduled yet.
    Unscheduled,
    /// A reminder is scheduled for the given instant and not yet sent.
    Scheduled(DateTime<Utc>),
    /// The reminder scheduled for the given instant has been delivered.
    Sent(DateTime<Utc>),
}

impl ReminderState {
    /// ## Summary
    /// Decodes the persisted column pair into a `ReminderState`.
    ///
    /// ## Errors
    /// Returns an invariant violation for the combination
    /// `reminder_sent = true` with no scheduled time, which no write path
    /// can produce.
    pub fn from_columns(
        scheduled_reminder_time: Option<DateTime<Utc>>,
        reminder_sent: bool,
    ) -> CoreResult<Self> {
        match (scheduled_reminder_time, reminder_sent) {
            (None, false) => Ok(Self::Unscheduled),
            (Some(at), false) => Ok(Self::Scheduled(at)),
            (Some(at), true) => Ok(Self::Sent(at)),
            (None, true) => Err(CoreError::InvariantViolation(
                "reminder marked sent without a scheduled time",
            )),
        }
    }

    /// Returns the column pair this state persists as.
    #[must_use]
    pub const fn columns(self) -> (Option<DateTime<Utc>>, bool) {
        match self {
            Self::Unscheduled => (None, false),
            Self::Scheduled(at) => (Some(at), false),
            Self::Sent(at) => (Some(at), true),
        }
    }

    #[must_use]
    pub const fn is_unscheduled(self) -> bool {
        matches!(self, Self::Unscheduled)
    }

    #[must_use]
    pub const fn is_sent(self) -> bool {
        matches!(self, Self::Sent(_))
    }

    /// Scheduled instant, if one exists.
    #[must_use]
    pub const fn scheduled_at(self) -> Option<DateTime<Utc>> {
        match self {
            Self::Unscheduled => None,
            Self::Scheduled(at) | Self::Sent(at) => Some(at),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reminder_state_round_trips_through_columns() {
        let at = Utc::now();
        for state in [
            ReminderState::Unscheduled,
            ReminderState::Scheduled(at),
            ReminderState::Sent(at),
        ] {
            let (scheduled, sent) = state.columns();
            assert_eq!(ReminderState::from_columns(scheduled, sent).unwrap(), state);
        }
    }

    #[test]
    fn sent_without_schedule_is_rejected() {
        assert!(ReminderState::from_columns(None, true).is_err());
    }

    #[test]
    fn notification_method_channel_selection() {
        assert!(NotificationMethod::Email.includes_email());
        assert!(!NotificationMethod::Email.includes_push());
        assert!(NotificationMethod::Push.includes_push());
        assert!(!NotificationMethod::Push.includes_email());
        assert!(NotificationMethod::Both.includes_email());
        assert!(NotificationMethod::Both.includes_push());
    }
}
