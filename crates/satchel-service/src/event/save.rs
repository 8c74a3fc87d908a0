//! Validated event persistence.
//!
//! Every create resolves defaults from the owner's profile, validates the
//! hydrated draft, decides the reminder schedule, and only then writes.
//! Updates replay validation against the new field values and carry the
//! reminder latch forward: a pending reminder moves with the trigger
//! time, a declined or delivered one never comes back.

use chrono::{DateTime, Duration, Utc};
use diesel_async::scoped_futures::ScopedFutureExt;
use satchel_core::constants::{
    DEFAULT_ASSESSMENT_DURATION_MINUTES, DEFAULT_LESSON_DURATION_MINUTES,
};
use satchel_core::types::EventType;
use satchel_db::db::connection::DbConnection;
use satchel_db::db::enums::{AssessmentType, LessonType};
use satchel_db::db::query::{assessment, homework, lesson, profile, subject};
use satchel_db::db::transaction::with_transaction;
use satchel_db::model::assessment::{Assessment, AssessmentChangeset, NewAssessment};
use satchel_db::model::homework::{Homework, HomeworkChangeset, NewHomework};
use satchel_db::model::lesson::{Lesson, LessonChangeset, NewLesson};
use satchel_db::model::profile::UserProfile;
use satchel_db::model::subject::Subject;
use uuid::Uuid;

use super::LessonEvent;
use super::validate::{
    AssessmentDraft, HomeworkDraft, LessonDraft, validate_assessment, validate_homework,
    validate_lesson,
};
use crate::error::{ServiceError, ServiceResult};
use crate::reminder::policy;

/// Fields a caller supplies when creating a lesson. A missing duration
/// falls back to the owner's profile default.
#[derive(Debug, Clone)]
pub struct LessonInput {
    pub subject_id: Uuid,
    pub lesson_type: LessonType,
    pub start_time: DateTime<Utc>,
    pub duration: Option<Duration>,
}

/// Fields a caller may change on an existing lesson. Lessons never move
/// between subjects.
#[derive(Debug, Clone)]
pub struct LessonUpdate {
    pub lesson_type: LessonType,
    pub start_time: DateTime<Utc>,
    pub duration: Option<Duration>,
}

/// Fields for creating or replacing an assessment.
#[derive(Debug, Clone)]
pub struct AssessmentInput {
    pub subject_id: Option<Uuid>,
    pub lesson_id: Option<Uuid>,
    pub assessment_type: AssessmentType,
    pub start_time: Option<DateTime<Utc>>,
    pub duration: Option<Duration>,
    pub description: Option<String>,
}

/// Fields for creating or replacing a homework row.
#[derive(Debug, Clone)]
pub struct HomeworkInput {
    pub subject_id: Option<Uuid>,
    pub lesson_given_id: Option<Uuid>,
    pub lesson_due_id: Option<Uuid>,
    pub start_time: Option<DateTime<Utc>>,
    pub due_at: Option<DateTime<Utc>>,
    pub task: String,
    pub completion_percent: i32,
    pub has_subtasks: bool,
}

/// ## Summary
/// Creates a lesson: validates the draft, schedules its reminder per the
/// owner's profile, and inserts the row.
///
/// ## Errors
/// Returns `NotFound` for a missing subject or profile, `Validation` for
/// rejected field values, or a database error.
pub async fn create_lesson(
    conn: &mut DbConnection<'_>,
    input: &LessonInput,
    now: DateTime<Utc>,
) -> ServiceResult<Lesson> {
    let row = prepare_lesson(conn, input, now).await?;
    Ok(lesson::insert(conn, &row).await?)
}

/// ## Summary
/// Creates a batch of lessons inside one transaction. Every row is
/// validated before any is written; the first failing row aborts the
/// whole batch.
///
/// ## Errors
/// Returns `BulkValidation` naming the offending row index, or any error
/// `create_lesson` can produce.
pub async fn create_lessons<'a>(
    conn: &mut DbConnection<'a>,
    inputs: &'a [LessonInput],
    now: DateTime<Utc>,
) -> ServiceResult<Vec<Lesson>> {
    with_transaction(conn, |conn| {
        async move {
            let mut rows = Vec::with_capacity(inputs.len());
            for (index, input) in inputs.iter().enumerate() {
                let row = prepare_lesson(conn, input, now)
                    .await
                    .map_err(|e| at_row(index, e))?;
                rows.push(row);
            }
            Ok(lesson::insert_batch(conn, &rows).await?)
        }
        .scope_boxed()
    })
    .await
}

/// ## Summary
/// Replaces a lesson's fields and carries its reminder latch forward: a
/// pending reminder is recomputed only when the start time moved.
///
/// ## Errors
/// Returns `NotFound` for a missing row, `Validation` for rejected field
/// values, or a database error.
pub async fn update_lesson(
    conn: &mut DbConnection<'_>,
    id: Uuid,
    update: &LessonUpdate,
    now: DateTime<Utc>,
) -> ServiceResult<Lesson> {
    let existing = lesson::by_id(conn, id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("lesson {id}")))?;
    let subject = load_subject(conn, existing.subject_id).await?;
    let profile = load_profile(conn, subject.user_id).await?;

    let duration = update
        .duration
        .or_else(|| profile.default_duration(EventType::Lesson))
        .unwrap_or_else(|| Duration::minutes(i64::from(DEFAULT_LESSON_DURATION_MINUTES)));
    let draft = LessonDraft {
        subject,
        lesson_type: update.lesson_type,
        start_time: update.start_time,
        duration,
    };
    validate_lesson(&draft, now)?;

    let resolved = policy::resolve_on_update(
        existing.reminder_state()?,
        existing.start_time,
        update.start_time,
        &profile,
        EventType::Lesson,
    );

    let changes = LessonChangeset {
        lesson_type: update.lesson_type,
        start_time: update.start_time,
        duration_minutes: whole_minutes(duration)?,
        scheduled_reminder_time: Some(resolved.columns().0),
        last_modified: now,
    };
    Ok(lesson::update(conn, id, &changes).await?)
}

/// ## Summary
/// Creates an assessment. A linked lesson supersedes the direct subject
/// and start time, which are cleared in the stored row once validation
/// confirmed they agree with the lesson.
///
/// ## Errors
/// Returns `NotFound` for missing linked rows, `Validation` for rejected
/// field values, or a database error.
pub async fn create_assessment(
    conn: &mut DbConnection<'_>,
    input: &AssessmentInput,
    now: DateTime<Utc>,
) -> ServiceResult<Assessment> {
    let row = prepare_assessment(conn, input, now).await?;
    Ok(assessment::insert(conn, &row).await?)
}

/// ## Summary
/// Creates a batch of assessments inside one transaction, validating
/// every row before any is written.
///
/// ## Errors
/// Returns `BulkValidation` naming the offending row index, or any error
/// `create_assessment` can produce.
pub async fn create_assessments<'a>(
    conn: &mut DbConnection<'a>,
    inputs: &'a [AssessmentInput],
    now: DateTime<Utc>,
) -> ServiceResult<Vec<Assessment>> {
    with_transaction(conn, |conn| {
        async move {
            let mut rows = Vec::with_capacity(inputs.len());
            for (index, input) in inputs.iter().enumerate() {
                let row = prepare_assessment(conn, input, now)
                    .await
                    .map_err(|e| at_row(index, e))?;
                rows.push(row);
            }
            Ok(assessment::insert_batch(conn, &rows).await?)
        }
        .scope_boxed()
    })
    .await
}

/// ## Summary
/// Replaces an assessment's fields, carrying the reminder latch forward
/// against the trigger time the new field values derive to.
///
/// ## Errors
/// Returns `NotFound` for missing rows, `Validation` for rejected field
/// values, or a database error.
pub async fn update_assessment(
    conn: &mut DbConnection<'_>,
    id: Uuid,
    input: &AssessmentInput,
    now: DateTime<Utc>,
) -> ServiceResult<Assessment> {
    let existing = assessment::by_id(conn, id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("assessment {id}")))?;
    let old_trigger = match (existing.start_time, existing.lesson_id) {
        (Some(at), _) => at,
        (None, Some(lesson_id)) => load_lesson_event(conn, lesson_id).await?.lesson.start_time,
        (None, None) => {
            return Err(ServiceError::InvariantViolation(
                "persisted assessment has no trigger source",
            ));
        }
    };

    let (draft, profile) = assemble_assessment(conn, input, now).await?;
    let new_trigger = draft
        .start_time
        .or_else(|| draft.lesson.as_ref().map(|l| l.lesson.start_time))
        .ok_or(ServiceError::InvariantViolation(
            "validated assessment has no trigger source",
        ))?;

    let resolved = policy::resolve_on_update(
        existing.reminder_state()?,
        old_trigger,
        new_trigger,
        &profile,
        EventType::Assessment,
    );

    let linked = draft.lesson.is_some();
    let changes = AssessmentChangeset {
        subject_id: Some(if linked { None } else { input.subject_id }),
        lesson_id: Some(input.lesson_id),
        assessment_type: input.assessment_type,
        start_time: Some(if linked { None } else { input.start_time }),
        duration_minutes: Some(draft.duration.map(whole_minutes).transpose()?),
        description: Some(input.description.clone()),
        scheduled_reminder_time: Some(resolved.columns().0),
        last_modified: now,
    };
    Ok(assessment::update(conn, id, &changes).await?)
}

/// ## Summary
/// Creates a homework row. Direct fields are kept alongside lesson links;
/// derivation applies its precedence at read time.
///
/// ## Errors
/// Returns `NotFound` for missing linked rows, `Validation` for rejected
/// field values, or a database error.
pub async fn create_homework(
    conn: &mut DbConnection<'_>,
    input: &HomeworkInput,
    now: DateTime<Utc>,
) -> ServiceResult<Homework> {
    let row = prepare_homework(conn, input, now).await?;
    Ok(homework::insert(conn, &row).await?)
}

/// ## Summary
/// Creates a batch of homework rows inside one transaction, validating
/// every row before any is written.
///
/// ## Errors
/// Returns `BulkValidation` naming the offending row index, or any error
/// `create_homework` can produce.
pub async fn create_homework_batch<'a>(
    conn: &mut DbConnection<'a>,
    inputs: &'a [HomeworkInput],
    now: DateTime<Utc>,
) -> ServiceResult<Vec<Homework>> {
    with_transaction(conn, |conn| {
        async move {
            let mut rows = Vec::with_capacity(inputs.len());
            for (index, input) in inputs.iter().enumerate() {
                let row = prepare_homework(conn, input, now)
                    .await
                    .map_err(|e| at_row(index, e))?;
                rows.push(row);
            }
            Ok(homework::insert_batch(conn, &rows).await?)
        }
        .scope_boxed()
    })
    .await
}

/// ## Summary
/// Replaces a homework row's fields, carrying the reminder latch forward
/// against the due time the new field values derive to.
///
/// ## Errors
/// Returns `NotFound` for missing rows, `Validation` for rejected field
/// values, or a database error.
pub async fn update_homework(
    conn: &mut DbConnection<'_>,
    id: Uuid,
    input: &HomeworkInput,
    now: DateTime<Utc>,
) -> ServiceResult<Homework> {
    let existing = homework::by_id(conn, id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("homework {id}")))?;
    let old_trigger = match (existing.due_at, existing.lesson_due_id) {
        (Some(at), _) => at,
        (None, Some(lesson_id)) => load_lesson_event(conn, lesson_id).await?.lesson.start_time,
        (None, None) => {
            return Err(ServiceError::InvariantViolation(
                "persisted homework has no due source",
            ));
        }
    };

    let (draft, profile) = assemble_homework(conn, input, now).await?;
    let new_trigger = draft
        .due_at
        .or_else(|| draft.lesson_due.as_ref().map(|l| l.lesson.start_time))
        .ok_or(ServiceError::InvariantViolation(
            "validated homework has no due source",
        ))?;

    let resolved = policy::resolve_on_update(
        existing.reminder_state()?,
        old_trigger,
        new_trigger,
        &profile,
        EventType::Homework,
    );

    let changes = HomeworkChangeset {
        subject_id: Some(input.subject_id),
        lesson_given_id: Some(input.lesson_given_id),
        lesson_due_id: Some(input.lesson_due_id),
        start_time: Some(input.start_time),
        due_at: Some(input.due_at),
        task: input.task.clone(),
        completion_percent: input.completion_percent,
        has_subtasks: input.has_subtasks,
        scheduled_reminder_time: Some(resolved.columns().0),
        last_modified: now,
    };
    Ok(homework::update(conn, id, &changes).await?)
}

async fn prepare_lesson(
    conn: &mut DbConnection<'_>,
    input: &LessonInput,
    now: DateTime<Utc>,
) -> ServiceResult<NewLesson> {
    let subject = load_subject(conn, input.subject_id).await?;
    let profile = load_profile(conn, subject.user_id).await?;

    let duration = input
        .duration
        .or_else(|| profile.default_duration(EventType::Lesson))
        .unwrap_or_else(|| Duration::minutes(i64::from(DEFAULT_LESSON_DURATION_MINUTES)));
    let draft = LessonDraft {
        subject,
        lesson_type: input.lesson_type,
        start_time: input.start_time,
        duration,
    };
    validate_lesson(&draft, now)?;

    let scheduled = policy::schedule_on_create(input.start_time, &profile, EventType::Lesson);
    Ok(NewLesson {
        id: Uuid::new_v4(),
        subject_id: input.subject_id,
        lesson_type: input.lesson_type,
        start_time: input.start_time,
        duration_minutes: whole_minutes(duration)?,
        scheduled_reminder_time: scheduled,
    })
}

async fn prepare_assessment(
    conn: &mut DbConnection<'_>,
    input: &AssessmentInput,
    now: DateTime<Utc>,
) -> ServiceResult<NewAssessment> {
    let (draft, profile) = assemble_assessment(conn, input, now).await?;

    let trigger = draft
        .start_time
        .or_else(|| draft.lesson.as_ref().map(|l| l.lesson.start_time))
        .ok_or(ServiceError::InvariantViolation(
            "validated assessment has no trigger source",
        ))?;
    let scheduled = policy::schedule_on_create(trigger, &profile, EventType::Assessment);

    let linked = draft.lesson.is_some();
    Ok(NewAssessment {
        id: Uuid::new_v4(),
        subject_id: if linked { None } else { input.subject_id },
        lesson_id: input.lesson_id,
        assessment_type: input.assessment_type,
        start_time: if linked { None } else { input.start_time },
        duration_minutes: draft.duration.map(whole_minutes).transpose()?,
        description: input.description.clone(),
        scheduled_reminder_time: scheduled,
    })
}

async fn prepare_homework(
    conn: &mut DbConnection<'_>,
    input: &HomeworkInput,
    now: DateTime<Utc>,
) -> ServiceResult<NewHomework> {
    let (draft, profile) = assemble_homework(conn, input, now).await?;

    let trigger = draft
        .due_at
        .or_else(|| draft.lesson_due.as_ref().map(|l| l.lesson.start_time))
        .ok_or(ServiceError::InvariantViolation(
            "validated homework has no due source",
        ))?;
    let scheduled = policy::schedule_on_create(trigger, &profile, EventType::Homework);

    Ok(NewHomework {
        id: Uuid::new_v4(),
        subject_id: input.subject_id,
        lesson_given_id: input.lesson_given_id,
        lesson_due_id: input.lesson_due_id,
        start_time: input.start_time,
        due_at: input.due_at,
        task: input.task.clone(),
        completion_percent: input.completion_percent,
        has_subtasks: input.has_subtasks,
        scheduled_reminder_time: scheduled,
    })
}

/// Hydrates and validates an assessment draft, returning it with the
/// owner's profile.
async fn assemble_assessment(
    conn: &mut DbConnection<'_>,
    input: &AssessmentInput,
    now: DateTime<Utc>,
) -> ServiceResult<(AssessmentDraft, UserProfile)> {
    let subject = match input.subject_id {
        Some(id) => Some(load_subject(conn, id).await?),
        None => None,
    };
    let lesson = match input.lesson_id {
        Some(id) => Some(load_lesson_event(conn, id).await?),
        None => None,
    };

    let owner_id = subject
        .as_ref()
        .map(|s| s.user_id)
        .or_else(|| lesson.as_ref().map(|l| l.subject.user_id));
    let Some(owner_id) = owner_id else {
        // No owner means no profile defaults either; validation rejects
        // the draft with the proper field errors.
        let draft = AssessmentDraft {
            subject,
            lesson,
            assessment_type: input.assessment_type,
            start_time: input.start_time,
            duration: input.duration,
            description: input.description.clone(),
        };
        validate_assessment(&draft, now)?;
        return Err(ServiceError::InvariantViolation(
            "assessment without a subject source passed validation",
        ));
    };
    let profile = load_profile(conn, owner_id).await?;

    // Profile default durations apply only to standalone assessments; a
    // linked one inherits the lesson's duration at read time.
    let duration = if lesson.is_none() {
        input.duration.or_else(|| {
            profile.default_duration(EventType::Assessment).or_else(|| {
                Some(Duration::minutes(i64::from(
                    DEFAULT_ASSESSMENT_DURATION_MINUTES,
                )))
            })
        })
    } else {
        input.duration
    };

    let draft = AssessmentDraft {
        subject,
        lesson,
        assessment_type: input.assessment_type,
        start_time: input.start_time,
        duration,
        description: input.description.clone(),
    };
    validate_assessment(&draft, now)?;
    Ok((draft, profile))
}

/// Hydrates and validates a homework draft, returning it with the owner's
/// profile.
async fn assemble_homework(
    conn: &mut DbConnection<'_>,
    input: &HomeworkInput,
    now: DateTime<Utc>,
) -> ServiceResult<(HomeworkDraft, UserProfile)> {
    let subject = match input.subject_id {
        Some(id) => Some(load_subject(conn, id).await?),
        None => None,
    };
    let lesson_given = match input.lesson_given_id {
        Some(id) => Some(load_lesson_event(conn, id).await?),
        None => None,
    };
    let lesson_due = match input.lesson_due_id {
        Some(id) => Some(load_lesson_event(conn, id).await?),
        None => None,
    };

    let draft = HomeworkDraft {
        subject,
        lesson_given,
        lesson_due,
        start_time: input.start_time,
        due_at: input.due_at,
        task: input.task.clone(),
        completion_percent: input.completion_percent,
    };
    validate_homework(&draft, now)?;

    let owner_id = draft
        .subject
        .as_ref()
        .map(|s| s.user_id)
        .or_else(|| draft.lesson_given.as_ref().map(|l| l.subject.user_id))
        .or_else(|| draft.lesson_due.as_ref().map(|l| l.subject.user_id))
        .ok_or(ServiceError::InvariantViolation(
            "homework without a subject source passed validation",
        ))?;
    let profile = load_profile(conn, owner_id).await?;
    Ok((draft, profile))
}

async fn load_subject(conn: &mut DbConnection<'_>, id: Uuid) -> ServiceResult<Subject> {
    subject::by_id(conn, id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("subject {id}")))
}

async fn load_profile(conn: &mut DbConnection<'_>, user_id: Uuid) -> ServiceResult<UserProfile> {
    profile::by_user_id(conn, user_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("profile for user {user_id}")))
}

async fn load_lesson_event(conn: &mut DbConnection<'_>, id: Uuid) -> ServiceResult<LessonEvent> {
    let lesson = lesson::by_id(conn, id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("lesson {id}")))?;
    let subject = load_subject(conn, lesson.subject_id).await?;
    Ok(LessonEvent { lesson, subject })
}

fn whole_minutes(duration: Duration) -> ServiceResult<i32> {
    i32::try_from(duration.num_minutes())
        .map_err(|_| ServiceError::InvariantViolation("duration exceeds the storable range"))
}

fn at_row(index: usize, error: ServiceError) -> ServiceError {
    match error {
        ServiceError::Validation(source) => ServiceError::BulkValidation { index, source },
        other => other,
    }
}
