use chrono::Duration;
use diesel::{pg::Pg, prelude::*};
use satchel_core::types::EventType;

use crate::db::enums::{NotificationMethod, TimeDisplayFormat};
use crate::db::schema;

/// Per-user notification preferences, one row per user.
///
/// Lead times and default durations are stored as whole minutes and
/// surfaced as `chrono::Duration`.
#[derive(Debug, Clone, PartialEq, Eq, Identifiable, Queryable, Selectable)]
#[diesel(table_name = schema::userprofile)]
#[diesel(check_for_backend(Pg))]
pub struct UserProfile {
    pub id: uuid::Uuid,
    pub user_id: uuid::Uuid,
    pub notification_method: NotificationMethod,
    pub time_display_format: TimeDisplayFormat,
    pub lesson_duration_minutes: i32,
    pub assessment_duration_minutes: i32,
    pub receive_lesson_reminders: bool,
    pub lesson_reminder_minutes: i32,
    pub receive_assessment_reminders: bool,
    pub assessment_reminder_minutes: i32,
    pub receive_homework_reminders: bool,
    pub homework_reminder_minutes: i32,
}

impl UserProfile {
    /// Whether the user opted into reminders for this event type.
    #[must_use]
    pub const fn receives_reminders(&self, event_type: EventType) -> bool {
        match event_type {
            EventType::Lesson => self.receive_lesson_reminders,
            EventType::Assessment => self.receive_assessment_reminders,
            EventType::Homework => self.receive_homework_reminders,
        }
    }

    /// Lead time subtracted from an event's trigger time when scheduling
    /// its reminder.
    #[must_use]
    pub fn reminder_lead_time(&self, event_type: EventType) -> Duration {
        let minutes = match event_type {
            EventType::Lesson => self.lesson_reminder_minutes,
            EventType::Assessment => self.assessment_reminder_minutes,
            EventType::Homework => self.homework_reminder_minutes,
        };
        Duration::minutes(i64::from(minutes))
    }

    /// Default duration applied when the user creates an event without one.
    /// Homework carries no duration.
    #[must_use]
    pub fn default_duration(&self, event_type: EventType) -> Option<Duration> {
        let minutes = match event_type {
            EventType::Lesson => self.lesson_duration_minutes,
            EventType::Assessment => self.assessment_duration_minutes,
            EventType::Homework => return None,
        };
        Some(Duration::minutes(i64::from(minutes)))
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = schema::userprofile)]
pub struct NewUserProfile {
    pub id: uuid::Uuid,
    pub user_id: uuid::Uuid,
    pub notification_method: NotificationMethod,
    pub time_display_format: TimeDisplayFormat,
    pub lesson_duration_minutes: i32,
    pub assessment_duration_minutes: i32,
    pub receive_lesson_reminders: bool,
    pub lesson_reminder_minutes: i32,
    pub receive_assessment_reminders: bool,
    pub assessment_reminder_minutes: i32,
    pub receive_homework_reminders: bool,
    pub homework_reminder_minutes: i32,
}
