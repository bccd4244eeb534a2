//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that is turned into a GraphQL error
//! carrying an `extensions.code`. Server-side failures are captured to Sentry
//! and reported to clients only as "Internal server error".

use async_graphql::ErrorExtensions;
use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::ServiceError;

/// Application-level error type for the API boundary.
#[derive(Debug, Error)]
pub enum AppError {
    /// Business operation failed.
    #[error(transparent)]
    Service(#[from] ServiceError),

    /// Request argument could not be parsed.
    #[error("{0}")]
    InvalidArgument(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<RepositoryError> for AppError {
    fn from(e: RepositoryError) -> Self {
        Self::Service(ServiceError::Repository(e))
    }
}

impl AppError {
    /// Machine-readable code exposed as `extensions.code`.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Service(ServiceError::NotFound(_)) => "NOT_FOUND",
            Self::Service(ServiceError::InvalidArgument(_)) | Self::InvalidArgument(_) => {
                "INVALID_ARGUMENT"
            }
            Self::Service(ServiceError::IllegalState(_)) => "ILLEGAL_STATE",
            Self::Service(ServiceError::Unauthenticated) => "UNAUTHENTICATED",
            Self::Service(ServiceError::Repository(_) | ServiceError::PasswordHash)
            | Self::Internal(_) => "INTERNAL",
        }
    }

    /// Whether this error is a server-side failure.
    #[must_use]
    pub const fn is_internal(&self) -> bool {
        matches!(
            self,
            Self::Service(ServiceError::Repository(_) | ServiceError::PasswordHash)
                | Self::Internal(_)
        )
    }

    /// Message safe to show to API clients.
    #[must_use]
    pub fn client_message(&self) -> String {
        match self {
            _ if self.is_internal() => "Internal server error".to_owned(),
            Self::Service(ServiceError::Unauthenticated) => {
                "Caller identity required: set the X-User-Id header".to_owned()
            }
            _ => self.to_string(),
        }
    }
}

impl ErrorExtensions for AppError {
    fn extend(&self) -> async_graphql::Error {
        // Capture server errors to Sentry
        if self.is_internal() {
            let event_id = sentry::capture_error(self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let code = self.code();
        async_graphql::Error::new(self.client_message()).extend_with(|_, e| e.set("code", code))
    }
}

/// Converts fallible service results into GraphQL results.
pub trait GraphqlResultExt<T> {
    /// Map the error through [`AppError`] and attach its code.
    ///
    /// # Errors
    ///
    /// Returns the converted error if `self` is `Err`.
    fn into_graphql(self) -> async_graphql::Result<T>;
}

impl<T, E: Into<AppError>> GraphqlResultExt<T> for Result<T, E> {
    fn into_graphql(self) -> async_graphql::Result<T> {
        self.map_err(|e| {
            let err: AppError = e.into();
            err.extend()
        })
    }
}

/// Set the Sentry user context from a user ID.
///
/// Call this once the caller is known to associate errors with users.
pub fn set_sentry_user(user_id: &impl ToString) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            ..Default::default()
        }));
    });
}
