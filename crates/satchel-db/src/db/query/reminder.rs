//! Due-reminder scan and the atomic claim used by the notification sweep.
//!
//! The sweep owns `reminder_sent` writes exclusively; request-serving save
//! paths never touch that column after insert.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use satchel_core::types::EventType;
use uuid::Uuid;

use crate::db::connection::DbConnection;
use crate::db::schema::{assessment, homework, lesson};
use crate::model::assessment::Assessment;
use crate::model::homework::Homework;
use crate::model::lesson::Lesson;

/// ## Summary
/// Loads lessons whose reminder is due and not yet sent.
///
/// ## Errors
/// Returns an error if the database operation fails.
pub async fn due_lessons(
    conn: &mut DbConnection<'_>,
    now: DateTime<Utc>,
) -> QueryResult<Vec<Lesson>> {
    lesson::table
        .filter(lesson::scheduled_reminder_time.le(now))
        .filter(lesson::reminder_sent.eq(false))
        .select(Lesson::as_select())
        .load(conn)
        .await
}

/// ## Summary
/// Loads assessments whose reminder is due and not yet sent.
///
/// ## Errors
/// Returns an error if the database operation fails.
pub async fn due_assessments(
    conn: &mut DbConnection<'_>,
    now: DateTime<Utc>,
) -> QueryResult<Vec<Assessment>> {
    assessment::table
        .filter(assessment::scheduled_reminder_time.le(now))
        .filter(assessment::reminder_sent.eq(false))
        .select(Assessment::as_select())
        .load(conn)
        .await
}

/// ## Summary
/// Loads homework whose reminder is due and not yet sent.
///
/// ## Errors
/// Returns an error if the database operation fails.
pub async fn due_homework(
    conn: &mut DbConnection<'_>,
    now: DateTime<Utc>,
) -> QueryResult<Vec<Homework>> {
    homework::table
        .filter(homework::scheduled_reminder_time.le(now))
        .filter(homework::reminder_sent.eq(false))
        .select(Homework::as_select())
        .load(conn)
        .await
}

/// ## Summary
/// Atomically claims an event's reminder for delivery: flips
/// `reminder_sent` to true only where it was still false.
///
/// Returns whether this call won the claim. A concurrent sweep that
/// selected the same row loses here and must skip delivery.
///
/// ## Errors
/// Returns an error if the database operation fails.
pub async fn claim(
    conn: &mut DbConnection<'_>,
    event_type: EventType,
    id: Uuid,
) -> QueryResult<bool> {
    let affected = match event_type {
        EventType::Lesson => {
            diesel::update(
                lesson::table
                    .find(id)
                    .filter(lesson::reminder_sent.eq(false)),
            )
            .set(lesson::reminder_sent.eq(true))
            .execute(conn)
            .await?
        }
        EventType::Assessment => {
            diesel::update(
                assessment::table
                    .find(id)
                    .filter(assessment::reminder_sent.eq(false)),
            )
            .set(assessment::reminder_sent.eq(true))
            .execute(conn)
            .await?
        }
        EventType::Homework => {
            diesel::update(
                homework::table
                    .find(id)
                    .filter(homework::reminder_sent.eq(false)),
            )
            .set(homework::reminder_sent.eq(true))
            .execute(conn)
            .await?
        }
    };

    Ok(affected == 1)
}

/// ## Summary
/// Releases a claim after delivery failed, so the next sweep retries the
/// event. Only ever called by the sweep that won the claim.
///
/// ## Errors
/// Returns an error if the database operation fails.
pub async fn release(
    conn: &mut DbConnection<'_>,
    event_type: EventType,
    id: Uuid,
) -> QueryResult<()> {
    match event_type {
        EventType::Lesson => {
            diesel::update(lesson::table.find(id))
                .set(lesson::reminder_sent.eq(false))
                .execute(conn)
                .await?;
        }
        EventType::Assessment => {
            diesel::update(assessment::table.find(id))
                .set(assessment::reminder_sent.eq(false))
                .execute(conn)
                .await?;
        }
        EventType::Homework => {
            diesel::update(homework::table.find(id))
                .set(homework::reminder_sent.eq(false))
                .execute(conn)
                .await?;
        }
    }

    Ok(())
}
