//! Audit trail error types.

use thiserror::Error;

/// Errors that can occur while recording or querying audit entries.
#[derive(Debug, Error)]
pub enum AuditError {
    // ========== Validation Errors ==========
    /// Action is not part of the audit taxonomy.
    #[error("Unknown audit action: {0}")]
    UnknownAction(String),

    /// Entity type is not part of the audit taxonomy.
    #[error("Unknown entity type: {0}")]
    UnknownEntityType(String),

    /// Amount in the details map could not be read as a decimal.
    #[error("Invalid amount in audit details: {0}")]
    InvalidAmount(String),

    /// Amount cannot be negative.
    #[error("Audit amount cannot be negative: {0}")]
    NegativeAmount(String),

    /// Student reference in the details map is not a valid ID.
    #[error("Invalid student ID in audit details: {0}")]
    InvalidStudentId(String),

    /// The affected record ID is missing.
    #[error("Audit entry must reference an entity")]
    MissingEntity,

    // ========== Storage Errors ==========
    /// Audit storage failed.
    #[error("Audit storage error: {0}")]
    Storage(String),
}

impl AuditError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownAction(_) => "UNKNOWN_AUDIT_ACTION",
            Self::UnknownEntityType(_) => "UNKNOWN_ENTITY_TYPE",
            Self::InvalidAmount(_) => "INVALID_AMOUNT",
            Self::NegativeAmount(_) => "NEGATIVE_AMOUNT",
            Self::InvalidStudentId(_) => "INVALID_STUDENT_ID",
            Self::MissingEntity => "MISSING_ENTITY",
            Self::Storage(_) => "AUDIT_STORAGE_ERROR",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            Self::Storage(_) => 500,
            _ => 400,
        }
    }

    /// Returns true if the input was rejected before any state was touched.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        !matches!(self, Self::Storage(_))
    }
}

impl From<AuditError> for institute_shared::AppError {
    fn from(err: AuditError) -> Self {
        match err {
            AuditError::Storage(msg) => Self::Database(msg),
            other => Self::Validation(other.to_string()),
        }
    }
}
