//! Common error types for the PC catalog

use crate::validation::ValidationErrors;
use thiserror::Error;

/// Common result type for catalog operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across the catalog crates
#[derive(Error, Debug)]
pub enum Error {
    /// Record failed field validation; nothing was written
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    /// Insert of a key that already exists
    #[error("Duplicate key: {entity} '{key}' already exists")]
    DuplicateKey { entity: &'static str, key: String },

    /// Requested record not found
    #[error("Not found: {entity} '{key}'")]
    NotFound { entity: &'static str, key: String },

    /// Backing store cannot be reached
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    /// Database operation error (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(sqlx::Error),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Record input that is not valid JSON for its entity
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// True for errors the caller can fix by correcting its input
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Error::Validation(_)
                | Error::DuplicateKey { .. }
                | Error::NotFound { .. }
                | Error::Serialization(_)
        )
    }
}

/// Connection-level failures become `StorageUnavailable`; everything else
/// stays a plain database error.
impl From<sqlx::Error> for Error {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed => Error::StorageUnavailable(err.to_string()),
            // SQLITE_CANTOPEN
            sqlx::Error::Database(ref db_err)
                if db_err.code().as_deref() == Some("14")
                    || db_err.message().contains("unable to open database") =>
            {
                Error::StorageUnavailable(err.to_string())
            }
            other => Error::Database(other),
        }
    }
}

impl From<ValidationErrors> for Error {
    fn from(errors: ValidationErrors) -> Self {
        Error::Validation(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::Violation;

    #[test]
    fn test_pool_errors_are_storage_unavailable() {
        let err: Error = sqlx::Error::PoolTimedOut.into();
        assert!(matches!(err, Error::StorageUnavailable(_)));

        let err: Error = sqlx::Error::PoolClosed.into();
        assert!(matches!(err, Error::StorageUnavailable(_)));
    }

    #[test]
    fn test_row_not_found_stays_database_error() {
        let err: Error = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, Error::Database(_)));
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_display_messages() {
        let err = Error::DuplicateKey {
            entity: "processor",
            key: "Ryzen 7 7800X3D".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Duplicate key: processor 'Ryzen 7 7800X3D' already exists"
        );

        let err = Error::Validation(ValidationErrors::from(vec![Violation::new(
            "tdp_w",
            "TDP must be between 1 and 500 W",
        )]));
        assert_eq!(
            err.to_string(),
            "Validation failed: tdp_w: TDP must be between 1 and 500 W"
        );
        assert!(err.is_recoverable());
    }
}
