//! # Centralized Error Handling
//!
//! Defines [`CoreError`], the error type shared by configuration loading and
//! the store layer. Store failures are surfaced to callers unchanged and
//! opaque; no retries happen at this level.

use thiserror::Error;

/// Convenience type alias for `Result<T, CoreError>`.
pub type Result<T> = std::result::Result<T, CoreError>;

/// Error type for configuration and store operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Configuration error during startup or environment loading.
    #[error("configuration error: {0}")]
    Config(String),

    /// Requested record does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// A uniqueness constraint was violated (duplicate login or email).
    #[error("conflict: {0}")]
    Conflict(String),

    /// Stored data could not be decoded into the domain model.
    #[error("decoding error: {0}")]
    Decoding(String),

    /// Underlying storage failure (connection, query, constraint other
    /// than uniqueness).
    #[error("storage error: {0}")]
    Store(String),
}

/// Convert `sqlx::Error` to `CoreError`.
impl From<sqlx::Error> for CoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => CoreError::NotFound("database record not found".to_string()),
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                CoreError::Conflict(db_err.message().to_string())
            }
            sqlx::Error::Database(db_err) => {
                CoreError::Store(format!("database error: {}", db_err.message()))
            }
            _ => CoreError::Store(format!("database error: {}", err)),
        }
    }
}

/// Convert `serde_json::Error` to `CoreError`.
impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        CoreError::Decoding(format!("JSON error: {}", err))
    }
}

/// Convert environment-variable errors to `CoreError`.
impl From<lib_utils::envs::Error> for CoreError {
    fn from(err: lib_utils::envs::Error) -> Self {
        CoreError::Config(err.to_string())
    }
}
