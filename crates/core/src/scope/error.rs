//! Batch scoping error types.

use thiserror::Error;

/// Errors that can occur while scoping a collection.
#[derive(Debug, Error)]
pub enum ScopeError {
    /// The requested batch is not in the reference batch set.
    #[error("Unknown batch: {0}")]
    UnknownBatch(String),
}

impl ScopeError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownBatch(_) => "SCOPE_MISMATCH",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            Self::UnknownBatch(_) => 404,
        }
    }
}

impl From<ScopeError> for institute_shared::AppError {
    fn from(err: ScopeError) -> Self {
        Self::NotFound(err.to_string())
    }
}
