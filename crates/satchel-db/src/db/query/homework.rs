//! Query composition for `homework`.

use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::db::connection::DbConnection;
use crate::db::schema::homework;
use crate::model::homework::{Homework, HomeworkChangeset, NewHomework};

/// ## Summary
/// Inserts a homework row and returns it.
///
/// ## Errors
/// Returns an error if the database operation fails.
pub async fn insert(conn: &mut DbConnection<'_>, new: &NewHomework) -> QueryResult<Homework> {
    diesel::insert_into(homework::table)
        .values(new)
        .returning(Homework::as_returning())
        .get_result(conn)
        .await
}

/// ## Summary
/// Inserts multiple homework rows in a batch and returns them.
/// Callers must have validated every row before any is written.
///
/// ## Errors
/// Returns an error if the database operation fails.
pub async fn insert_batch(
    conn: &mut DbConnection<'_>,
    rows: &[NewHomework],
) -> QueryResult<Vec<Homework>> {
    if rows.is_empty() {
        return Ok(Vec::new());
    }

    diesel::insert_into(homework::table)
        .values(rows)
        .returning(Homework::as_returning())
        .get_results(conn)
        .await
}

/// ## Summary
/// Loads a homework row by id.
///
/// ## Errors
/// Returns an error if the database operation fails.
pub async fn by_id(conn: &mut DbConnection<'_>, id: Uuid) -> QueryResult<Option<Homework>> {
    homework::table
        .find(id)
        .select(Homework::as_select())
        .first(conn)
        .await
        .optional()
}

/// ## Summary
/// Applies a field update to a homework row and returns it.
///
/// ## Errors
/// Returns an error if the database operation fails.
pub async fn update(
    conn: &mut DbConnection<'_>,
    id: Uuid,
    changes: &HomeworkChangeset,
) -> QueryResult<Homework> {
    diesel::update(homework::table.find(id))
        .set(changes)
        .returning(Homework::as_returning())
        .get_result(conn)
        .await
}
