//! Effective-field derivation for hydrated events.
//!
//! Every accessor applies the same fixed precedence: the direct field
//! first, then each linked lesson in priority order. Accessors are pure
//! reads; a row missing every source fails loudly instead of defaulting,
//! because the write-time invariants guarantee such a row cannot exist.

use chrono::{DateTime, Duration, Utc};
use satchel_core::types::EventType;
use satchel_db::model::subject::Subject;
use thiserror::Error;
use uuid::Uuid;

use super::{Event, LessonEvent};

/// Data-integrity failure: a persisted event that cannot resolve one of
/// its derived fields.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DeriveError {
    #[error("{event_type} {id} has no resolvable subject")]
    MissingSubject { event_type: EventType, id: Uuid },

    #[error("{event_type} {id} has no resolvable trigger time")]
    MissingTrigger { event_type: EventType, id: Uuid },
}

impl Event {
    /// ## Summary
    /// Resolves the subject this event belongs to: the direct subject
    /// first, then each linked lesson's subject (given before due for
    /// homework).
    ///
    /// ## Errors
    /// Returns `DeriveError::MissingSubject` if no source is present.
    pub fn effective_subject(&self) -> Result<&Subject, DeriveError> {
        let resolved = match self {
            Self::Lesson(e) => Some(&e.subject),
            Self::Assessment(e) => e
                .subject
                .as_ref()
                .or_else(|| e.lesson.as_ref().map(|l| &l.subject)),
            Self::Homework(e) => e
                .subject
                .as_ref()
                .or_else(|| e.lesson_given.as_ref().map(|l| &l.subject))
                .or_else(|| e.lesson_due.as_ref().map(|l| &l.subject)),
        };

        resolved.ok_or(DeriveError::MissingSubject {
            event_type: self.event_type(),
            id: self.id(),
        })
    }

    /// ## Summary
    /// Resolves the user who owns this event, through its effective subject.
    ///
    /// ## Errors
    /// Returns `DeriveError::MissingSubject` if no subject source is present.
    pub fn effective_owner_id(&self) -> Result<Uuid, DeriveError> {
        Ok(self.effective_subject()?.user_id)
    }

    /// ## Summary
    /// Resolves the trigger time reminders count back from: a lesson's
    /// start, an assessment's start (direct, else linked lesson), or a
    /// homework's due time (direct `due_at`, else the due lesson's start).
    ///
    /// ## Errors
    /// Returns `DeriveError::MissingTrigger` if no source is present.
    pub fn effective_trigger_time(&self) -> Result<DateTime<Utc>, DeriveError> {
        let resolved = match self {
            Self::Lesson(e) => Some(e.lesson.start_time),
            Self::Assessment(e) => e
                .assessment
                .start_time
                .or_else(|| e.lesson.as_ref().map(|l| l.lesson.start_time)),
            Self::Homework(e) => e
                .homework
                .due_at
                .or_else(|| e.lesson_due.as_ref().map(|l| l.lesson.start_time)),
        };

        resolved.ok_or(DeriveError::MissingTrigger {
            event_type: self.event_type(),
            id: self.id(),
        })
    }

    /// Resolves the event duration: direct field first, else the linked
    /// lesson's. Homework carries no duration.
    #[must_use]
    pub fn effective_duration(&self) -> Option<Duration> {
        match self {
            Self::Lesson(e) => Some(e.lesson.duration()),
            Self::Assessment(e) => e
                .assessment
                .duration()
                .or_else(|| e.lesson.as_ref().map(|l| l.lesson.duration())),
            Self::Homework(_) => None,
        }
    }

    /// ## Summary
    /// Human title used in reminder messages, e.g. `"Exam — Physics"`.
    ///
    /// ## Errors
    /// Returns a derivation error if the subject cannot be resolved.
    pub fn title(&self) -> Result<String, DeriveError> {
        let subject = self.effective_subject()?;
        let label = match self {
            Self::Lesson(e) => e.lesson.lesson_type.label(),
            Self::Assessment(e) => e.assessment.assessment_type.label(),
            Self::Homework(_) => "Homework",
        };
        Ok(format!("{label} — {}", subject.name))
    }
}

/// Convenience accessor matching the linked-lesson shape used by the
/// validation layer.
pub(crate) fn lesson_start(linked: Option<&LessonEvent>) -> Option<DateTime<Utc>> {
    linked.map(|l| l.lesson.start_time)
}
