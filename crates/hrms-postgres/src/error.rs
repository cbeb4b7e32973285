//! Error types for the PostgreSQL storage backend.

use hrms_storage::StorageError;
use sqlx_core::error::Error as SqlxError;

/// Checks if a sqlx error is a uniqueness constraint violation.
pub fn is_unique_violation(err: &SqlxError) -> bool {
    if let SqlxError::Database(db_err) = err {
        db_err.is_unique_violation()
    } else {
        false
    }
}

/// Errors specific to the PostgreSQL storage backend.
#[derive(Debug, thiserror::Error)]
pub enum PostgresError {
    /// Database error from the driver.
    #[error("Database error: {0}")]
    Database(#[from] SqlxError),

    /// Row data could not be (de)serialized.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration error.
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Pool error.
    #[error("Pool error: {message}")]
    Pool { message: String },
}

impl PostgresError {
    /// Creates a new configuration error.
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Creates a new pool error.
    #[must_use]
    pub fn pool(message: impl Into<String>) -> Self {
        Self::Pool {
            message: message.into(),
        }
    }
}

impl From<PostgresError> for StorageError {
    fn from(err: PostgresError) -> Self {
        match err {
            PostgresError::Database(e) => {
                if matches!(
                    e,
                    SqlxError::PoolTimedOut | SqlxError::PoolClosed | SqlxError::Io(_)
                ) {
                    StorageError::connection_error(e.to_string())
                } else {
                    StorageError::database(e.to_string())
                }
            }
            PostgresError::Serialization(e) => StorageError::Serialization(e),
            PostgresError::Config { message } => {
                StorageError::database(format!("Configuration error: {message}"))
            }
            PostgresError::Pool { message } => {
                StorageError::connection_error(format!("Pool error: {message}"))
            }
        }
    }
}

/// Maps a sqlx error from an INSERT or UPDATE into the backend-agnostic
/// error space, turning uniqueness violations into `AlreadyExists` with the
/// caller's entity context.
pub(crate) fn unique_conflict(
    err: SqlxError,
    entity: &str,
    detail: impl Into<String>,
) -> StorageError {
    if is_unique_violation(&err) {
        return StorageError::already_exists(entity, detail);
    }
    PostgresError::from(err).into()
}

/// Maps any other sqlx error into the backend-agnostic error space.
pub(crate) fn db_error(err: SqlxError) -> StorageError {
    PostgresError::from(err).into()
}

/// Result type alias for PostgreSQL operations.
pub type Result<T> = std::result::Result<T, PostgresError>;
