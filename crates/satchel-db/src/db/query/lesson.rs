//! Query composition for `lesson`.

use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::db::connection::DbConnection;
use crate::db::schema::lesson;
use crate::model::lesson::{Lesson, LessonChangeset, NewLesson};

/// ## Summary
/// Inserts a lesson and returns the created row.
///
/// ## Errors
/// Returns an error if the database operation fails.
pub async fn insert(conn: &mut DbConnection<'_>, new: &NewLesson) -> QueryResult<Lesson> {
    diesel::insert_into(lesson::table)
        .values(new)
        .returning(Lesson::as_returning())
        .get_result(conn)
        .await
}

/// ## Summary
/// Inserts multiple lessons in a batch and returns the created rows.
/// Callers must have validated every row before any is written.
///
/// ## Errors
/// Returns an error if the database operation fails.
pub async fn insert_batch(
    conn: &mut DbConnection<'_>,
    rows: &[NewLesson],
) -> QueryResult<Vec<Lesson>> {
    if rows.is_empty() {
        return Ok(Vec::new());
    }

    diesel::insert_into(lesson::table)
        .values(rows)
        .returning(Lesson::as_returning())
        .get_results(conn)
        .await
}

/// ## Summary
/// Loads a lesson by id.
///
/// ## Errors
/// Returns an error if the database operation fails.
pub async fn by_id(conn: &mut DbConnection<'_>, id: Uuid) -> QueryResult<Option<Lesson>> {
    lesson::table
        .find(id)
        .select(Lesson::as_select())
        .first(conn)
        .await
        .optional()
}

/// ## Summary
/// Loads lessons by id, in no particular order.
///
/// ## Errors
/// Returns an error if the database operation fails.
pub async fn by_ids(conn: &mut DbConnection<'_>, ids: &[Uuid]) -> QueryResult<Vec<Lesson>> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    lesson::table
        .filter(lesson::id.eq_any(ids))
        .select(Lesson::as_select())
        .load(conn)
        .await
}

/// ## Summary
/// Applies a field update to a lesson and returns the updated row.
///
/// ## Errors
/// Returns an error if the database operation fails.
pub async fn update(
    conn: &mut DbConnection<'_>,
    id: Uuid,
    changes: &LessonChangeset,
) -> QueryResult<Lesson> {
    diesel::update(lesson::table.find(id))
        .set(changes)
        .returning(Lesson::as_returning())
        .get_result(conn)
        .await
}
