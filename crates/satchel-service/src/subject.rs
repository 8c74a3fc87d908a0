//! Subject creation, gated by the per-user cap.

use satchel_core::constants::{MAX_SUBJECT_NAME_LENGTH, MAX_SUBJECTS_PER_USER};
use satchel_core::error::ValidationErrors;
use satchel_db::db::connection::DbConnection;
use satchel_db::db::query::subject;
use satchel_db::model::subject::{NewSubject, Subject};
use uuid::Uuid;

use crate::error::ServiceResult;

/// ## Summary
/// Validates a subject name against its length bound and emptiness.
///
/// ## Errors
/// Returns the field-keyed aggregate of every violated rule.
pub fn validate_subject_name(name: &str) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    if name.trim().is_empty() {
        errors.push("name", "required", "Subject name is required.");
    } else if name.chars().count() > MAX_SUBJECT_NAME_LENGTH {
        errors.push(
            "name",
            "max_length_exceeded",
            format!("Subject name can't be longer than {MAX_SUBJECT_NAME_LENGTH} characters."),
        );
    }
    errors.into_result()
}

/// ## Summary
/// Creates a subject for a user, rejecting the write once the user holds
/// `MAX_SUBJECTS_PER_USER` subjects.
///
/// ## Errors
/// Returns `Validation` for a rejected name or an exhausted cap, or a
/// database error.
pub async fn create_subject(
    conn: &mut DbConnection<'_>,
    user_id: Uuid,
    name: &str,
    image_url: Option<&str>,
) -> ServiceResult<Subject> {
    validate_subject_name(name)?;

    let held = subject::count_for_user(conn, user_id).await?;
    if held >= MAX_SUBJECTS_PER_USER {
        let mut errors = ValidationErrors::new();
        errors.push(
            "__all__",
            "max_subjects_reached",
            format!("You can't have more than {MAX_SUBJECTS_PER_USER} subjects."),
        );
        return Err(errors.into());
    }

    let row = NewSubject {
        id: Uuid::new_v4(),
        user_id,
        name,
        image_url,
    };
    Ok(subject::insert(conn, &row).await?)
}
