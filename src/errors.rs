use sea_orm::error::DbErr;
use serde::Serialize;

/// Error taxonomy for the fulfillability core.
///
/// Per-item shortages are not errors: they surface as an `Ok(false)`
/// verdict. Only configuration failures, storage failures, malformed
/// input and aborted evaluations are raised here.
#[derive(Debug, thiserror::Error, Serialize)]
pub enum ServiceError {
    #[error("Database error: {0}")]
    DatabaseError(
        #[from]
        #[serde(skip)]
        DbErr,
    ),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("No enabled default location configured for stock {0}")]
    NoDefaultLocation(i64),

    #[error("Evaluation aborted: {0}")]
    EvaluationAborted(String),

    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    #[error("Event error: {0}")]
    EventError(String),

    #[error("Internal error: {0}")]
    InternalError(String),

    #[error("Other error: {0}")]
    Other(
        #[from]
        #[serde(skip)]
        anyhow::Error,
    ),
}

impl ServiceError {
    /// Helper to convert database errors with context preserved.
    pub fn db_error(err: impl Into<DbErr>) -> Self {
        ServiceError::DatabaseError(err.into())
    }
}

impl From<validator::ValidationErrors> for ServiceError {
    fn from(err: validator::ValidationErrors) -> Self {
        ServiceError::ValidationError(err.to_string())
    }
}

impl From<config::ConfigError> for ServiceError {
    fn from(err: config::ConfigError) -> Self {
        ServiceError::InternalError(format!("Configuration error: {}", err))
    }
}
