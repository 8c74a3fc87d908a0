use chrono::Duration;
use diesel::{pg::Pg, prelude::*};
use satchel_core::error::CoreResult;
use satchel_core::types::ReminderState;

use crate::db::enums::LessonType;
use crate::db::schema;

/// A scheduled lesson. The only event shape whose trigger time is always
/// a direct field.
#[derive(Debug, Clone, PartialEq, Eq, Identifiable, Queryable, Selectable)]
#[diesel(table_name = schema::lesson)]
#[diesel(check_for_backend(Pg))]
pub struct Lesson {
    pub id: uuid::Uuid,
    pub subject_id: uuid::Uuid,
    pub lesson_type: LessonType,
    pub start_time: chrono::DateTime<chrono::Utc>,
    pub duration_minutes: i32,
    pub scheduled_reminder_time: Option<chrono::DateTime<chrono::Utc>>,
    pub reminder_sent: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub last_modified: chrono::DateTime<chrono::Utc>,
}

impl Lesson {
    /// ## Summary
    /// Decodes the persisted reminder columns into the tri-state.
    ///
    /// ## Errors
    /// Returns an invariant violation if the columns hold the illegal
    /// sent-without-schedule combination.
    pub fn reminder_state(&self) -> CoreResult<ReminderState> {
        ReminderState::from_columns(self.scheduled_reminder_time, self.reminder_sent)
    }

    #[must_use]
    pub fn duration(&self) -> Duration {
        Duration::minutes(i64::from(self.duration_minutes))
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = schema::lesson)]
pub struct NewLesson {
    pub id: uuid::Uuid,
    pub subject_id: uuid::Uuid,
    pub lesson_type: LessonType,
    pub start_time: chrono::DateTime<chrono::Utc>,
    pub duration_minutes: i32,
    pub scheduled_reminder_time: Option<chrono::DateTime<chrono::Utc>>,
}

/// Field update for a lesson; reminder columns are written separately by
/// the save path and the sweep.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = schema::lesson)]
pub struct LessonChangeset {
    pub lesson_type: LessonType,
    pub start_time: chrono::DateTime<chrono::Utc>,
    pub duration_minutes: i32,
    pub scheduled_reminder_time: Option<Option<chrono::DateTime<chrono::Utc>>>,
    pub last_modified: chrono::DateTime<chrono::Utc>,
}
