//! Application-wide error type.
//!
//! Domain errors convert into [`AppError`]; the HTTP layer turns it into a
//! status code plus a stable `error` string.

use thiserror::Error;

/// Result type alias using `AppError`.
pub type AppResult<T> = Result<T, AppError>;

/// Errors surfaced to API clients.
#[derive(Debug, Error)]
pub enum AppError {
    /// Missing, invalid or expired credentials.
    #[error("Authentication failed: {0}")]
    Unauthorized(String),

    /// The resource does not exist or belongs to someone else.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The request was malformed or failed a field rule.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Duplicate email or username.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// The database or speech service is not wired in or not reachable.
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// The database failed mid-request.
    #[error("Database error: {0}")]
    Database(String),

    /// Anything else.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// HTTP status for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Unauthorized(_) => 401,
            Self::NotFound(_) => 404,
            Self::Validation(_) => 400,
            Self::Conflict(_) => 409,
            Self::ServiceUnavailable(_) => 503,
            Self::Database(_) | Self::Internal(_) => 500,
        }
    }

    /// Machine-readable code for the `error` field.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Unauthorized(_) => "UNAUTHORIZED",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Conflict(_) => "CONFLICT",
            Self::ServiceUnavailable(_) => "SERVICE_UNAVAILABLE",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// The message without the category prefix, for the `message` field.
    #[must_use]
    pub fn detail(&self) -> &str {
        match self {
            Self::Unauthorized(m)
            | Self::NotFound(m)
            | Self::Validation(m)
            | Self::Conflict(m)
            | Self::ServiceUnavailable(m)
            | Self::Database(m)
            | Self::Internal(m) => m,
        }
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
