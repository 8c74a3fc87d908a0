//! Query composition for `assessment`.

use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::db::connection::DbConnection;
use crate::db::schema::assessment;
use crate::model::assessment::{Assessment, AssessmentChangeset, NewAssessment};

/// ## Summary
/// Inserts an assessment and returns the created row.
///
/// ## Errors
/// Returns an error if the database operation fails.
pub async fn insert(conn: &mut DbConnection<'_>, new: &NewAssessment) -> QueryResult<Assessment> {
    diesel::insert_into(assessment::table)
        .values(new)
        .returning(Assessment::as_returning())
        .get_result(conn)
        .await
}

/// ## Summary
/// Inserts multiple assessments in a batch and returns the created rows.
/// Callers must have validated every row before any is written.
///
/// ## Errors
/// Returns an error if the database operation fails.
pub async fn insert_batch(
    conn: &mut DbConnection<'_>,
    rows: &[NewAssessment],
) -> QueryResult<Vec<Assessment>> {
    if rows.is_empty() {
        return Ok(Vec::new());
    }

    diesel::insert_into(assessment::table)
        .values(rows)
        .returning(Assessment::as_returning())
        .get_results(conn)
        .await
}

/// ## Summary
/// Loads an assessment by id.
///
/// ## Errors
/// Returns an error if the database operation fails.
pub async fn by_id(conn: &mut DbConnection<'_>, id: Uuid) -> QueryResult<Option<Assessment>> {
    assessment::table
        .find(id)
        .select(Assessment::as_select())
        .first(conn)
        .await
        .optional()
}

/// ## Summary
/// Applies a field update to an assessment and returns the updated row.
///
/// ## Errors
/// Returns an error if the database operation fails.
pub async fn update(
    conn: &mut DbConnection<'_>,
    id: Uuid,
    changes: &AssessmentChangeset,
) -> QueryResult<Assessment> {
    diesel::update(assessment::table.find(id))
        .set(changes)
        .returning(Assessment::as_returning())
        .get_result(conn)
        .await
}
