//! Query composition for `subject`.

use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::db::connection::DbConnection;
use crate::db::schema::subject;
use crate::model::subject::{NewSubject, Subject};

/// ## Summary
/// Inserts a subject and returns the created row.
///
/// ## Errors
/// Returns an error if the database operation fails.
pub async fn insert(conn: &mut DbConnection<'_>, new: &NewSubject<'_>) -> QueryResult<Subject> {
    diesel::insert_into(subject::table)
        .values(new)
        .returning(Subject::as_returning())
        .get_result(conn)
        .await
}

/// ## Summary
/// Loads a subject by id.
///
/// ## Errors
/// Returns an error if the database operation fails.
pub async fn by_id(conn: &mut DbConnection<'_>, id: Uuid) -> QueryResult<Option<Subject>> {
    subject::table
        .find(id)
        .select(Subject::as_select())
        .first(conn)
        .await
        .optional()
}

/// ## Summary
/// Loads subjects by id, in no particular order.
///
/// ## Errors
/// Returns an error if the database operation fails.
pub async fn by_ids(conn: &mut DbConnection<'_>, ids: &[Uuid]) -> QueryResult<Vec<Subject>> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    subject::table
        .filter(subject::id.eq_any(ids))
        .select(Subject::as_select())
        .load(conn)
        .await
}

/// ## Summary
/// Counts the subjects a user owns; the service caps this at
/// `MAX_SUBJECTS_PER_USER`.
///
/// ## Errors
/// Returns an error if the database operation fails.
pub async fn count_for_user(conn: &mut DbConnection<'_>, user_id: Uuid) -> QueryResult<i64> {
    subject::table
        .filter(subject::user_id.eq(user_id))
        .count()
        .get_result(conn)
        .await
}
