//! Reminder payload assembly and delivery channels.

pub mod email;
pub mod push;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use satchel_core::types::EventType;
use satchel_core::util::human_duration::human_duration;
use satchel_core::util::time_format::format_schedule_time;
use satchel_db::model::profile::UserProfile;
use satchel_db::model::user::AppUser;
use serde::Serialize;
use thiserror::Error;

use crate::error::ServiceResult;
use crate::event::Event;

/// Everything a channel needs to render and address one reminder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReminderPayload {
    pub recipient_name: String,
    pub recipient_email: String,
    pub event_type: EventType,
    pub title: String,
    /// Trigger time rendered in the recipient's clock preference.
    pub scheduled_time: String,
    /// Time remaining until the trigger, e.g. `"2 hours 15 minutes"`.
    pub time_left: String,
    pub message: &'static str,
}

/// Transient delivery failure. The sweep releases its claim on the event
/// so the next pass retries it.
#[derive(Error, Debug)]
pub enum DeliveryError {
    #[error("relay request failed: {0}")]
    Relay(#[from] reqwest::Error),

    #[error("relay rejected the message with status {status}")]
    Rejected { status: u16 },
}

/// A one-way reminder transport.
#[async_trait]
pub trait DeliveryChannel: Send + Sync {
    /// ## Summary
    /// Delivers one reminder payload.
    ///
    /// ## Errors
    /// Returns a `DeliveryError` when the transport fails or rejects the
    /// message.
    async fn deliver(&self, payload: &ReminderPayload) -> Result<(), DeliveryError>;
}

/// Per-type closing line of the reminder message.
#[must_use]
pub const fn event_type_message(event_type: EventType) -> &'static str {
    match event_type {
        EventType::Lesson => {
            "Your lesson is starting soon. Don't forget to prepare everything you need beforehand."
        }
        EventType::Assessment => {
            "Your assessment is coming up. Give yourself enough time for a final review."
        }
        EventType::Homework => {
            "Your homework deadline is approaching. Make sure everything is ready to hand in."
        }
    }
}

/// ## Summary
/// Assembles the reminder payload for one due event: title and trigger
/// derived from the event, rendering preferences from the owner's profile.
///
/// ## Errors
/// Returns a derivation error if the event cannot resolve its subject or
/// trigger time.
pub fn build_payload(
    event: &Event,
    owner: &AppUser,
    profile: &UserProfile,
    now: DateTime<Utc>,
) -> ServiceResult<ReminderPayload> {
    let event_type = event.event_type();
    let trigger_time = event.effective_trigger_time()?;

    Ok(ReminderPayload {
        recipient_name: owner.first_name.clone(),
        recipient_email: owner.email.clone(),
        event_type,
        title: event.title()?,
        scheduled_time: format_schedule_time(trigger_time, profile.time_display_format.into()),
        time_left: human_duration(trigger_time - now),
        message: event_type_message(event_type),
    })
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use satchel_db::db::enums::TimeDisplayFormat;

    use super::*;
    use crate::event::test_fixtures::{
        app_user, fixed_now, lesson_event, profile, subject,
    };

    #[test]
    fn payload_carries_recipient_title_and_countdown() {
        let user = app_user("Ada");
        let profile = profile(user.id);
        let physics = subject(user.id, "Physics");
        let start = fixed_now() + Duration::hours(2) + Duration::minutes(15);
        let event = Event::Lesson(lesson_event(&physics, start));

        let payload = build_payload(&event, &user, &profile, fixed_now()).unwrap();

        assert_eq!(payload.recipient_name, "Ada");
        assert_eq!(payload.recipient_email, "ada@example.edu");
        assert_eq!(payload.event_type, EventType::Lesson);
        assert_eq!(payload.title, "Lecture — Physics");
        assert_eq!(payload.time_left, "2 hours 15 minutes");
        assert_eq!(payload.message, event_type_message(EventType::Lesson));
    }

    #[test]
    fn scheduled_time_honors_the_clock_preference() {
        let user = app_user("Ada");
        let mut profile = profile(user.id);
        let physics = subject(user.id, "Physics");
        // 2025-09-15 14:30 UTC.
        let start = fixed_now() + Duration::hours(2) + Duration::minutes(30);
        let event = Event::Lesson(lesson_event(&physics, start));

        let payload = build_payload(&event, &user, &profile, fixed_now()).unwrap();
        assert!(payload.scheduled_time.ends_with("at 14:30"));

        profile.time_display_format = TimeDisplayFormat::H12;
        let payload = build_payload(&event, &user, &profile, fixed_now()).unwrap();
        assert!(payload.scheduled_time.ends_with("at 2:30 PM"));
    }
}
