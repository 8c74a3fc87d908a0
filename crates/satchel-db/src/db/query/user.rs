//! Query composition for `app_user`.

use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::db::connection::DbConnection;
use crate::db::schema::app_user;
use crate::model::user::{AppUser, NewAppUser};

/// ## Summary
/// Inserts a user and returns the created row.
///
/// ## Errors
/// Returns an error if the database operation fails.
pub async fn insert(conn: &mut DbConnection<'_>, user: &NewAppUser<'_>) -> QueryResult<AppUser> {
    diesel::insert_into(app_user::table)
        .values(user)
        .returning(AppUser::as_returning())
        .get_result(conn)
        .await
}

/// ## Summary
/// Loads a user by id.
///
/// ## Errors
/// Returns an error if the database operation fails.
pub async fn by_id(conn: &mut DbConnection<'_>, id: Uuid) -> QueryResult<Option<AppUser>> {
    app_user::table
        .find(id)
        .select(AppUser::as_select())
        .first(conn)
        .await
        .optional()
}

/// ## Summary
/// Loads users by id, in no particular order.
///
/// ## Errors
/// Returns an error if the database operation fails.
pub async fn by_ids(conn: &mut DbConnection<'_>, ids: &[Uuid]) -> QueryResult<Vec<AppUser>> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    app_user::table
        .filter(app_user::id.eq_any(ids))
        .select(AppUser::as_select())
        .load(conn)
        .await
}
