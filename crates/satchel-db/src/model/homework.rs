use diesel::{pg::Pg, prelude::*};
use satchel_core::error::CoreResult;
use satchel_core::types::ReminderState;

use crate::db::schema;

/// Homework resolves its subject through a direct field or either linked
/// lesson, and its due (trigger) time through `due_at` or the due lesson.
#[derive(Debug, Clone, PartialEq, Eq, Identifiable, Queryable, Selectable)]
#[diesel(table_name = schema::homework)]
#[diesel(check_for_backend(Pg))]
pub struct Homework {
    pub id: uuid::Uuid,
    pub subject_id: Option<uuid::Uuid>,
    pub lesson_given_id: Option<uuid::Uuid>,
    pub lesson_due_id: Option<uuid::Uuid>,
    pub start_time: Option<chrono::DateTime<chrono::Utc>>,
    pub due_at: Option<chrono::DateTime<chrono::Utc>>,
    pub task: String,
    pub completion_percent: i32,
    pub has_subtasks: bool,
    pub scheduled_reminder_time: Option<chrono::DateTime<chrono::Utc>>,
    pub reminder_sent: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub last_modified: chrono::DateTime<chrono::Utc>,
}

impl Homework {
    /// ## Summary
    /// Decodes the persisted reminder columns into the tri-state.
    ///
    /// ## Errors
    /// Returns an invariant violation if the columns hold the illegal
    /// sent-without-schedule combination.
    pub fn reminder_state(&self) -> CoreResult<ReminderState> {
        ReminderState::from_columns(self.scheduled_reminder_time, self.reminder_sent)
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = schema::homework)]
pub struct NewHomework {
    pub id: uuid::Uuid,
    pub subject_id: Option<uuid::Uuid>,
    pub lesson_given_id: Option<uuid::Uuid>,
    pub lesson_due_id: Option<uuid::Uuid>,
    pub start_time: Option<chrono::DateTime<chrono::Utc>>,
    pub due_at: Option<chrono::DateTime<chrono::Utc>>,
    pub task: String,
    pub completion_percent: i32,
    pub has_subtasks: bool,
    pub scheduled_reminder_time: Option<chrono::DateTime<chrono::Utc>>,
}

#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = schema::homework)]
pub struct HomeworkChangeset {
    pub subject_id: Option<Option<uuid::Uuid>>,
    pub lesson_given_id: Option<Option<uuid::Uuid>>,
    pub lesson_due_id: Option<Option<uuid::Uuid>>,
    pub start_time: Option<Option<chrono::DateTime<chrono::Utc>>>,
    pub due_at: Option<Option<chrono::DateTime<chrono::Utc>>>,
    pub task: String,
    pub completion_percent: i32,
    pub has_subtasks: bool,
    pub scheduled_reminder_time: Option<Option<chrono::DateTime<chrono::Utc>>>,
    pub last_modified: chrono::DateTime<chrono::Utc>,
}
