//! Error types for the storefront catalog.

use thiserror::Error;

/// Result type alias using the catalog's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for catalog operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation failed (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Whether the error was raised by a constraint the database enforces
    /// (foreign key, unique, not-null or check).
    pub fn is_constraint_violation(&self) -> bool {
        match self {
            Error::Database(sqlx::Error::Database(db_err)) => matches!(
                db_err.kind(),
                sqlx::error::ErrorKind::ForeignKeyViolation
                    | sqlx::error::ErrorKind::UniqueViolation
                    | sqlx::error::ErrorKind::NotNullViolation
                    | sqlx::error::ErrorKind::CheckViolation
            ),
            _ => false,
        }
    }
}
