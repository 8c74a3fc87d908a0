//! Query composition for `userprofile`.

use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::db::connection::DbConnection;
use crate::db::schema::userprofile;
use crate::model::profile::{NewUserProfile, UserProfile};

/// ## Summary
/// Inserts a profile and returns the created row.
///
/// ## Errors
/// Returns an error if the database operation fails.
pub async fn insert(
    conn: &mut DbConnection<'_>,
    profile: &NewUserProfile,
) -> QueryResult<UserProfile> {
    diesel::insert_into(userprofile::table)
        .values(profile)
        .returning(UserProfile::as_returning())
        .get_result(conn)
        .await
}

/// ## Summary
/// Loads the profile belonging to a user.
///
/// ## Errors
/// Returns an error if the database operation fails.
pub async fn by_user_id(
    conn: &mut DbConnection<'_>,
    user_id: Uuid,
) -> QueryResult<Option<UserProfile>> {
    userprofile::table
        .filter(userprofile::user_id.eq(user_id))
        .select(UserProfile::as_select())
        .first(conn)
        .await
        .optional()
}

/// ## Summary
/// Loads profiles for a set of users.
///
/// ## Errors
/// Returns an error if the database operation fails.
pub async fn by_user_ids(
    conn: &mut DbConnection<'_>,
    user_ids: &[Uuid],
) -> QueryResult<Vec<UserProfile>> {
    if user_ids.is_empty() {
        return Ok(Vec::new());
    }

    userprofile::table
        .filter(userprofile::user_id.eq_any(user_ids))
        .select(UserProfile::as_select())
        .load(conn)
        .await
}
