use chrono::Duration;
use diesel::{pg::Pg, prelude::*};
use satchel_core::error::CoreResult;
use satchel_core::types::ReminderState;

use crate::db::enums::AssessmentType;
use crate::db::schema;

/// An assessment either carries its own subject and start time or links a
/// lesson; a persisted row linked to a lesson has the direct fields
/// cleared (linking supersedes).
#[derive(Debug, Clone, PartialEq, Eq, Identifiable, Queryable, Selectable)]
#[diesel(table_name = schema::assessment)]
#[diesel(check_for_backend(Pg))]
pub struct Assessment {
    pub id: uuid::Uuid,
    pub subject_id: Option<uuid::Uuid>,
    pub lesson_id: Option<uuid::Uuid>,
    pub assessment_type: AssessmentType,
    pub start_time: Option<chrono::DateTime<chrono::Utc>>,
    pub duration_minutes: Option<i32>,
    pub description: Option<String>,
    pub scheduled_reminder_time: Option<chrono::DateTime<chrono::Utc>>,
    pub reminder_sent: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub last_modified: chrono::DateTime<chrono::Utc>,
}

impl Assessment {
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
    pub fn duration(&self) -> Option<Duration> {
        self.duration_minutes
            .map(|m| Duration::minutes(i64::from(m)))
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = schema::assessment)]
pub struct NewAssessment {
    pub id: uuid::Uuid,
    pub subject_id: Option<uuid::Uuid>,
    pub lesson_id: Option<uuid::Uuid>,
    pub assessment_type: AssessmentType,
    pub start_time: Option<chrono::DateTime<chrono::Utc>>,
    pub duration_minutes: Option<i32>,
    pub description: Option<String>,
    pub scheduled_reminder_time: Option<chrono::DateTime<chrono::Utc>>,
}

#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = schema::assessment)]
pub struct AssessmentChangeset {
    pub subject_id: Option<Option<uuid::Uuid>>,
    pub lesson_id: Option<Option<uuid::Uuid>>,
    pub assessment_type: AssessmentType,
    pub start_time: Option<Option<chrono::DateTime<chrono::Utc>>>,
    pub duration_minutes: Option<Option<i32>>,
    pub description: Option<Option<String>>,
    pub scheduled_reminder_time: Option<Option<chrono::DateTime<chrono::Utc>>>,
    pub last_modified: chrono::DateTime<chrono::Utc>,
}
