//! Persisted reminder state behind a trait seam.
//!
//! The sweep runs against `ReminderStore` so its claim and delivery logic
//! can be exercised without Postgres; `PgReminderStore` is the production
//! implementation over the connection pool.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use satchel_core::types::EventType;
use satchel_db::db::DbProvider;
use satchel_db::db::connection::DbPool;
use satchel_db::db::query::{lesson, profile, reminder, subject, user};
use satchel_db::model::assessment::Assessment;
use satchel_db::model::homework::Homework;
use satchel_db::model::lesson::Lesson;
use satchel_db::model::profile::UserProfile;
use satchel_db::model::subject::Subject;
use satchel_db::model::user::AppUser;
use uuid::Uuid;

use crate::error::ServiceResult;
use crate::event::{AssessmentEvent, Event, HomeworkEvent, LessonEvent};

/// One due event, hydrated with everything the sweep needs to render and
/// address its reminder.
#[derive(Debug, Clone)]
pub struct DueReminder {
    pub event: Event,
    pub owner: AppUser,
    pub profile: UserProfile,
}

/// The persisted reminder state the sweep reads and claims against.
#[async_trait]
pub trait ReminderStore: Send + Sync {
    /// ## Summary
    /// Loads every event whose scheduled reminder time has passed and
    /// whose reminder has not been sent, hydrated for delivery.
    ///
    /// ## Errors
    /// Returns an error if the store cannot be read.
    async fn due_reminders(&self, now: DateTime<Utc>) -> ServiceResult<Vec<DueReminder>>;

    /// ## Summary
    /// Atomically claims one event's reminder for delivery. Returns
    /// whether this caller won the claim.
    ///
    /// ## Errors
    /// Returns an error if the store cannot be written.
    async fn claim(&self, event_type: EventType, id: Uuid) -> ServiceResult<bool>;

    /// ## Summary
    /// Releases a previously won claim after delivery failed, so the next
    /// sweep retries the event.
    ///
    /// ## Errors
    /// Returns an error if the store cannot be written.
    async fn release(&self, event_type: EventType, id: Uuid) -> ServiceResult<()>;
}

/// Production store over the Postgres pool.
pub struct PgReminderStore {
    pool: DbPool,
}

impl PgReminderStore {
    #[must_use]
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReminderStore for PgReminderStore {
    #[tracing::instrument(skip(self))]
    async fn due_reminders(&self, now: DateTime<Utc>) -> ServiceResult<Vec<DueReminder>> {
        let mut conn = self.pool.get_connection().await?;

        let due_lessons = reminder::due_lessons(&mut conn, now).await?;
        let due_assessments = reminder::due_assessments(&mut conn, now).await?;
        let due_homework = reminder::due_homework(&mut conn, now).await?;

        // Batch-load every linked lesson the due assessments and homework
        // reference, then every subject in reach.
        let linked_lesson_ids = collect_linked_lesson_ids(&due_assessments, &due_homework);
        let linked_lessons: HashMap<Uuid, Lesson> = lesson::by_ids(&mut conn, &linked_lesson_ids)
            .await?
            .into_iter()
            .map(|l| (l.id, l))
            .collect();

        let subject_ids = collect_subject_ids(
            &due_lessons,
            &due_assessments,
            &due_homework,
            linked_lessons.values(),
        );
        let subjects: HashMap<Uuid, Subject> = subject::by_ids(&mut conn, &subject_ids)
            .await?
            .into_iter()
            .map(|s| (s.id, s))
            .collect();

        let mut events = Vec::new();
        for row in due_lessons {
            match hydrate_lesson(row, &subjects) {
                Some(event) => events.push(Event::Lesson(event)),
                None => continue,
            }
        }
        for row in due_assessments {
            events.push(Event::Assessment(hydrate_assessment(
                row,
                &subjects,
                &linked_lessons,
            )));
        }
        for row in due_homework {
            events.push(Event::Homework(hydrate_homework(
                row,
                &subjects,
                &linked_lessons,
            )));
        }

        let owner_ids: Vec<Uuid> = events
            .iter()
            .filter_map(|e| e.effective_owner_id().ok())
            .collect();
        let owners: HashMap<Uuid, AppUser> = user::by_ids(&mut conn, &owner_ids)
            .await?
            .into_iter()
            .map(|u| (u.id, u))
            .collect();
        let profiles: HashMap<Uuid, UserProfile> = profile::by_user_ids(&mut conn, &owner_ids)
            .await?
            .into_iter()
            .map(|p| (p.user_id, p))
            .collect();

        let mut due = Vec::with_capacity(events.len());
        for event in events {
            let Ok(owner_id) = event.effective_owner_id() else {
                tracing::error!(
                    event_type = %event.event_type(),
                    id = %event.id(),
                    "due event cannot resolve an owner; leaving for inspection"
                );
                continue;
            };
            let (Some(owner), Some(profile)) =
                (owners.get(&owner_id), profiles.get(&owner_id))
            else {
                tracing::error!(
                    event_type = %event.event_type(),
                    id = %event.id(),
                    owner_id = %owner_id,
                    "due event owner has no user or profile row"
                );
                continue;
            };

            due.push(DueReminder {
                event,
                owner: owner.clone(),
                profile: profile.clone(),
            });
        }

        Ok(due)
    }

    async fn claim(&self, event_type: EventType, id: Uuid) -> ServiceResult<bool> {
        let mut conn = self.pool.get_connection().await?;
        Ok(reminder::claim(&mut conn, event_type, id).await?)
    }

    async fn release(&self, event_type: EventType, id: Uuid) -> ServiceResult<()> {
        let mut conn = self.pool.get_connection().await?;
        reminder::release(&mut conn, event_type, id).await?;
        Ok(())
    }
}

fn collect_linked_lesson_ids(assessments: &[Assessment], homework: &[Homework]) -> Vec<Uuid> {
    let mut ids = Vec::new();
    ids.extend(assessments.iter().filter_map(|a| a.lesson_id));
    ids.extend(homework.iter().filter_map(|h| h.lesson_given_id));
    ids.extend(homework.iter().filter_map(|h| h.lesson_due_id));
    ids.sort_unstable();
    ids.dedup();
    ids
}

fn collect_subject_ids<'a>(
    lessons: &[Lesson],
    assessments: &[Assessment],
    homework: &[Homework],
    linked_lessons: impl Iterator<Item = &'a Lesson>,
) -> Vec<Uuid> {
    let mut ids = Vec::new();
    ids.extend(lessons.iter().map(|l| l.subject_id));
    ids.extend(assessments.iter().filter_map(|a| a.subject_id));
    ids.extend(homework.iter().filter_map(|h| h.subject_id));
    ids.extend(linked_lessons.map(|l| l.subject_id));
    ids.sort_unstable();
    ids.dedup();
    ids
}

fn hydrate_lesson(row: Lesson, subjects: &HashMap<Uuid, Subject>) -> Option<LessonEvent> {
    let Some(subject) = subjects.get(&row.subject_id) else {
        tracing::error!(id = %row.id, "due lesson references a missing subject");
        return None;
    };
    Some(LessonEvent {
        lesson: row,
        subject: subject.clone(),
    })
}

fn hydrate_assessment(
    row: Assessment,
    subjects: &HashMap<Uuid, Subject>,
    linked_lessons: &HashMap<Uuid, Lesson>,
) -> AssessmentEvent {
    let lesson = row
        .lesson_id
        .and_then(|id| linked_lessons.get(&id).cloned())
        .and_then(|l| hydrate_lesson(l, subjects));
    let subject = row.subject_id.and_then(|id| subjects.get(&id).cloned());
    AssessmentEvent {
        assessment: row,
        subject,
        lesson,
    }
}

fn hydrate_homework(
    row: Homework,
    subjects: &HashMap<Uuid, Subject>,
    linked_lessons: &HashMap<Uuid, Lesson>,
) -> HomeworkEvent {
    let lesson_given = row
        .lesson_given_id
        .and_then(|id| linked_lessons.get(&id).cloned())
        .and_then(|l| hydrate_lesson(l, subjects));
    let lesson_due = row
        .lesson_due_id
        .and_then(|id| linked_lessons.get(&id).cloned())
        .and_then(|l| hydrate_lesson(l, subjects));
    let subject = row.subject_id.and_then(|id| subjects.get(&id).cloned());
    HomeworkEvent {
        homework: row,
        subject,
        lesson_given,
        lesson_due,
    }
}
