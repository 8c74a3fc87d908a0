use satchel_core::error::ValidationErrors;
use thiserror::Error;

use crate::event::derive::DeriveError;
use crate::notify::DeliveryError;

/// Service layer errors - combines all error types
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error(transparent)]
    DatabaseError(#[from] satchel_db::error::DbError),

    #[error("Diesel error: {0}")]
    DieselError(#[from] diesel::result::Error),

    #[error(transparent)]
    CoreError(#[from] satchel_core::error::CoreError),

    /// User-correctable write rejection; field-keyed, nothing persisted.
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    /// Bulk-insert rejection: no row was written because row `index` failed.
    #[error("Validation failed for row {index}: {source}")]
    BulkValidation {
        index: usize,
        source: ValidationErrors,
    },

    /// Data-integrity failure: a persisted row that cannot resolve its
    /// subject or trigger time should not exist.
    #[error(transparent)]
    Derivation(#[from] DeriveError),

    /// Transient channel failure; the reminder stays claimed-released for
    /// retry on the next sweep.
    #[error(transparent)]
    Delivery(#[from] DeliveryError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invariant violation: {0}")]
    InvariantViolation(&'static str),
}

pub type ServiceResult<T> = std::result::Result<T, ServiceError>;
