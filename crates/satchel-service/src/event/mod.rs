//! Hydrated event shapes and the operations that gate their persistence.
//!
//! A "hydrated" event is a row together with every linked record its
//! derived fields can draw from, so derivation never touches the store.

pub mod derive;
pub mod save;
pub mod validate;

#[cfg(test)]
pub(crate) mod test_fixtures;
#[cfg(test)]
mod validate_tests;

use satchel_core::error::CoreResult;
use satchel_core::types::{EventType, ReminderState};
use satchel_db::model::assessment::Assessment;
use satchel_db::model::homework::Homework;
use satchel_db::model::lesson::Lesson;
use satchel_db::model::subject::Subject;

/// A lesson with its owning subject.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LessonEvent {
    pub lesson: Lesson,
    pub subject: Subject,
}

/// An assessment with its optional direct subject and linked lesson.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssessmentEvent {
    pub assessment: Assessment,
    pub subject: Option<Subject>,
    pub lesson: Option<LessonEvent>,
}

/// Homework with its optional direct subject and linked lessons.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HomeworkEvent {
    pub homework: Homework,
    pub subject: Option<Subject>,
    pub lesson_given: Option<LessonEvent>,
    pub lesson_due: Option<LessonEvent>,
}

/// Any event that can carry a reminder, tagged by its closed type set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Lesson(LessonEvent),
    Assessment(AssessmentEvent),
    Homework(HomeworkEvent),
}

impl Event {
    #[must_use]
    pub const fn event_type(&self) -> EventType {
        match self {
            Self::Lesson(_) => EventType::Lesson,
            Self::Assessment(_) => EventType::Assessment,
            Self::Homework(_) => EventType::Homework,
        }
    }

    #[must_use]
    pub const fn id(&self) -> uuid::Uuid {
        match self {
            Self::Lesson(e) => e.lesson.id,
            Self::Assessment(e) => e.assessment.id,
            Self::Homework(e) => e.homework.id,
        }
    }

    /// ## Summary
    /// Decodes the row's persisted reminder columns into the tri-state.
    ///
    /// ## Errors
    /// Returns an invariant violation for the illegal sent-without-schedule
    /// column pair.
    pub fn reminder_state(&self) -> CoreResult<ReminderState> {
        match self {
            Self::Lesson(e) => e.lesson.reminder_state(),
            Self::Assessment(e) => e.assessment.reminder_state(),
            Self::Homework(e) => e.homework.reminder_state(),
        }
    }
}
