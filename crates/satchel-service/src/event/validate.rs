//! Write-time invariant checks gating event persistence.
//!
//! Each validator collects every offending rule into a field-keyed
//! `ValidationErrors` aggregate; a non-empty aggregate rejects the write
//! before anything is persisted. Bulk writes run the same per-row checks
//! before any row is written.

use chrono::{DateTime, Duration, Utc};
use satchel_core::constants::{
    MAX_DESCRIPTION_LENGTH, MAX_EVENT_DURATION_MINUTES, MAX_TASK_LENGTH, MAX_TIMEFRAME_DAYS,
    MIN_EVENT_DURATION_MINUTES, RECENT_PAST_DAYS,
};
use satchel_core::error::ValidationErrors;
use satchel_db::db::enums::{AssessmentType, LessonType};
use satchel_db::model::subject::Subject;

use super::LessonEvent;
use super::derive::lesson_start;

/// A lesson as submitted for a write, before any row exists.
#[derive(Debug, Clone)]
pub struct LessonDraft {
    pub subject: Subject,
    pub lesson_type: LessonType,
    pub start_time: DateTime<Utc>,
    pub duration: Duration,
}

/// An assessment as submitted for a write, with its linked lesson hydrated.
#[derive(Debug, Clone)]
pub struct AssessmentDraft {
    pub subject: Option<Subject>,
    pub lesson: Option<LessonEvent>,
    pub assessment_type: AssessmentType,
    pub start_time: Option<DateTime<Utc>>,
    pub duration: Option<Duration>,
    pub description: Option<String>,
}

/// Homework as submitted for a write, with its linked lessons hydrated.
#[derive(Debug, Clone)]
pub struct HomeworkDraft {
    pub subject: Option<Subject>,
    pub lesson_given: Option<LessonEvent>,
    pub lesson_due: Option<LessonEvent>,
    pub start_time: Option<DateTime<Utc>>,
    pub due_at: Option<DateTime<Utc>>,
    pub task: String,
    pub completion_percent: i32,
}

fn max_future(now: DateTime<Utc>) -> DateTime<Utc> {
    now + Duration::days(MAX_TIMEFRAME_DAYS)
}

fn recent_past(now: DateTime<Utc>) -> DateTime<Utc> {
    now - Duration::days(RECENT_PAST_DAYS)
}

fn distant_past(now: DateTime<Utc>) -> DateTime<Utc> {
    now - Duration::days(MAX_TIMEFRAME_DAYS)
}

fn check_duration(errors: &mut ValidationErrors, field: &'static str, duration: Duration) {
    if duration < Duration::minutes(MIN_EVENT_DURATION_MINUTES) {
        errors.push(
            field,
            "min_duration_not_met",
            format!("Duration must be at least {MIN_EVENT_DURATION_MINUTES} minutes."),
        );
    } else if duration > Duration::minutes(MAX_EVENT_DURATION_MINUTES) {
        errors.push(
            field,
            "max_duration_exceeded",
            format!(
                "Duration can't exceed {} hours.",
                MAX_EVENT_DURATION_MINUTES / 60
            ),
        );
    }
}

/// ## Summary
/// Validates a lesson draft against duration bounds and the trigger-time
/// window.
///
/// ## Errors
/// Returns the field-keyed aggregate of every violated rule.
pub fn validate_lesson(draft: &LessonDraft, now: DateTime<Utc>) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();

    check_duration(&mut errors, "duration", draft.duration);

    // A lesson's start is its trigger time, so the tight past bound applies.
    if draft.start_time < recent_past(now) {
        errors.push(
            "start_time",
            "too_far_in_past",
            format!("Lessons can't start more than {RECENT_PAST_DAYS} days in the past."),
        );
    }
    if draft.start_time > max_future(now) {
        errors.push(
            "start_time",
            "too_far_in_future",
            format!("Lessons can't start more than {MAX_TIMEFRAME_DAYS} days in the future."),
        );
    }

    errors.into_result()
}

/// ## Summary
/// Validates an assessment draft: existence of a subject source and a
/// start source, consistency with the linked lesson, duration bounds, and
/// the time window.
///
/// ## Errors
/// Returns the field-keyed aggregate of every violated rule.
pub fn validate_assessment(
    draft: &AssessmentDraft,
    now: DateTime<Utc>,
) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();

    if draft.subject.is_none() && draft.lesson.is_none() {
        errors.push(
            "__all__",
            "required",
            "Assessment must have either a subject or a lesson.",
        );
    }

    if draft.lesson.is_none() && draft.start_time.is_none() {
        errors.push(
            "start_time",
            "required",
            "Start time is required if the assessment isn't linked to any lesson.",
        );
    }

    if let (Some(subject), Some(lesson)) = (&draft.subject, &draft.lesson)
        && subject.id != lesson.subject.id
    {
        errors.push(
            "__all__",
            "subject_mismatch",
            format!(
                "The selected lesson belongs to \"{}\" but this assessment is for \"{}\". \
                 Either select a lesson from the same subject, or remove the lesson or the \
                 subject so the remaining one is used.",
                lesson.subject.name, subject.name
            ),
        );
    }

    if let (Some(start_time), Some(lesson)) = (draft.start_time, &draft.lesson)
        && start_time != lesson.lesson.start_time
    {
        errors.push(
            "start_time",
            "start_time_mismatch",
            "An assessment linked to a lesson must use the lesson's scheduled time. \
             Remove the lesson for a custom time, or remove the custom start time.",
        );
    }

    if let Some(duration) = draft.duration {
        check_duration(&mut errors, "duration", duration);
    }

    if let Some(description) = &draft.description
        && description.chars().count() > MAX_DESCRIPTION_LENGTH
    {
        errors.push(
            "description",
            "max_length_exceeded",
            format!("Description can't be longer than {MAX_DESCRIPTION_LENGTH} characters."),
        );
    }

    if let Some(start_time) = draft.start_time {
        if start_time < now {
            errors.push(
                "start_time",
                "starts_in_past",
                "Assessment must start in the future.",
            );
        }
        if start_time > max_future(now) {
            errors.push(
                "start_time",
                "too_far_in_future",
                format!(
                    "Assessments can't start more than {MAX_TIMEFRAME_DAYS} days in the future."
                ),
            );
        }
    }

    if let Some(lesson_time) = lesson_start(draft.lesson.as_ref()) {
        if lesson_time < now {
            errors.push(
                "lesson",
                "starts_in_past",
                "Assessment can't be attached to a lesson starting in the past.",
            );
        }
        if lesson_time > max_future(now) {
            errors.push(
                "lesson",
                "too_far_in_future",
                format!(
                    "The linked lesson can't start more than {MAX_TIMEFRAME_DAYS} days in the future."
                ),
            );
        }
    }

    errors.into_result()
}

/// ## Summary
/// Validates a homework draft: existence of a subject source and a due
/// source, subject consistency across all links, field bounds, time
/// ordering, and the time windows.
///
/// ## Errors
/// Returns the field-keyed aggregate of every violated rule.
pub fn validate_homework(
    draft: &HomeworkDraft,
    now: DateTime<Utc>,
) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();

    if draft.subject.is_none() && draft.lesson_given.is_none() && draft.lesson_due.is_none() {
        errors.push(
            "__all__",
            "required",
            "Homework must either have a subject or be linked to a lesson.",
        );
    }

    if draft.due_at.is_none() && draft.lesson_due.is_none() {
        errors.push(
            "due_at",
            "required",
            "Homework must either have a due date or be due at a specific lesson.",
        );
    }

    check_subject_consistency(&mut errors, draft);

    if draft.task.is_empty() {
        errors.push("task", "required", "Task description is required.");
    } else if draft.task.chars().count() > MAX_TASK_LENGTH {
        errors.push(
            "task",
            "max_length_exceeded",
            format!("Task can't be longer than {MAX_TASK_LENGTH} characters."),
        );
    }

    if !(0..=100).contains(&draft.completion_percent) {
        errors.push(
            "completion_percent",
            "out_of_range",
            "Completion must be between 0 and 100 percent.",
        );
    }

    check_homework_windows(&mut errors, draft, now);
    check_homework_ordering(&mut errors, draft);

    errors.into_result()
}

fn check_subject_consistency(errors: &mut ValidationErrors, draft: &HomeworkDraft) {
    if let Some(subject) = &draft.subject {
        if let Some(given) = &draft.lesson_given
            && given.subject.id != subject.id
        {
            errors.push(
                "lesson_given",
                "subject_mismatch",
                format!(
                    "The lesson this homework was given at belongs to \"{}\" but the homework \
                     is for \"{}\". Choose a lesson from the same subject, or remove one so \
                     the remaining source is used.",
                    given.subject.name, subject.name
                ),
            );
        }

        if let Some(due) = &draft.lesson_due
            && due.subject.id != subject.id
        {
            errors.push(
                "lesson_due",
                "subject_mismatch",
                format!(
                    "The lesson this homework is due at belongs to \"{}\" but the homework \
                     is for \"{}\". Choose a lesson from the same subject, or remove one so \
                     the remaining source is used.",
                    due.subject.name, subject.name
                ),
            );
        }
    }

    if let (Some(given), Some(due)) = (&draft.lesson_given, &draft.lesson_due)
        && given.subject.id != due.subject.id
    {
        errors.push(
            "__all__",
            "subject_mismatch",
            "The given and due lessons belong to different subjects; choose two lessons \
             from the same subject.",
        );
    }
}

fn check_homework_windows(
    errors: &mut ValidationErrors,
    draft: &HomeworkDraft,
    now: DateTime<Utc>,
) {
    // Start-side times tolerate the full past window; the due (trigger)
    // side only the recent past.
    if let Some(start_time) = draft.start_time
        && start_time < distant_past(now)
    {
        errors.push(
            "start_time",
            "too_far_in_past",
            format!("Homework can't start more than {MAX_TIMEFRAME_DAYS} days in the past."),
        );
    }

    if let Some(given_time) = lesson_start(draft.lesson_given.as_ref())
        && given_time < distant_past(now)
    {
        errors.push(
            "lesson_given",
            "too_far_in_past",
            format!(
                "The lesson this homework was given at can't start more than \
                 {MAX_TIMEFRAME_DAYS} days in the past."
            ),
        );
    }

    if let Some(due_at) = draft.due_at {
        if due_at < recent_past(now) {
            errors.push(
                "due_at",
                "too_far_in_past",
                format!("Homework can't be due more than {RECENT_PAST_DAYS} days in the past."),
            );
        }
        if due_at > max_future(now) {
            errors.push(
                "due_at",
                "too_far_in_future",
                format!(
                    "Homework can't be due more than {MAX_TIMEFRAME_DAYS} days in the future."
                ),
            );
        }
    }

    if let Some(due_time) = lesson_start(draft.lesson_due.as_ref()) {
        if due_time < recent_past(now) {
            errors.push(
                "lesson_due",
                "too_far_in_past",
                format!(
                    "The lesson this homework is due at can't start more than \
                     {RECENT_PAST_DAYS} days in the past."
                ),
            );
        }
        if due_time > max_future(now) {
            errors.push(
                "lesson_due",
                "too_far_in_future",
                format!(
                    "The lesson this homework is due at can't start more than \
                     {MAX_TIMEFRAME_DAYS} days in the future."
                ),
            );
        }
    }
}

fn check_homework_ordering(errors: &mut ValidationErrors, draft: &HomeworkDraft) {
    if let Some(start_time) = draft.start_time {
        if let Some(due_at) = draft.due_at
            && start_time >= due_at
        {
            errors.push(
                "start_time",
                "start_after_due",
                "Start time must be before the due date.",
            );
        }

        if let Some(due_time) = lesson_start(draft.lesson_due.as_ref())
            && start_time >= due_time
        {
            errors.push(
                "start_time",
                "start_after_due",
                "Start time must be before the due lesson's start time.",
            );
        }
    }

    if let Some(given_time) = lesson_start(draft.lesson_given.as_ref()) {
        if let Some(due_at) = draft.due_at
            && given_time >= due_at
        {
            errors.push(
                "lesson_given",
                "start_after_due",
                "The given lesson must start before the due date.",
            );
        }

        if let Some(due_time) = lesson_start(draft.lesson_due.as_ref())
            && given_time >= due_time
        {
            errors.push(
                "lesson_given",
                "start_after_due",
                "The given lesson must start before the due lesson.",
            );
        }
    }
}
