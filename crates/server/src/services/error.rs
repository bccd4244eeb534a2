//! Service error types.

use thiserror::Error;

use freshkeep_core::EmailError;

use crate::db::RepositoryError;

/// Errors returned by the business services.
///
/// The message of every variant except `Repository` is safe to show to API
/// clients.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// A referenced entity doesn't exist.
    #[error("{0}")]
    NotFound(String),

    /// The request itself is malformed.
    #[error("{0}")]
    InvalidArgument(String),

    /// The request is well-formed but its preconditions don't hold.
    #[error("{0}")]
    IllegalState(String),

    /// No caller identity was supplied.
    #[error("caller identity required")]
    Unauthenticated,

    /// Password hashing failed.
    #[error("password hashing error")]
    PasswordHash,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

impl From<EmailError> for ServiceError {
    fn from(e: EmailError) -> Self {
        Self::InvalidArgument(format!("invalid email: {e}"))
    }
}
