//! Ledger error types.

use institute_shared::types::AuditEntryId;
use rust_decimal::Decimal;
use thiserror::Error;

/// Errors that can occur during ledger assembly.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// An entry carries a negative amount.
    #[error("Audit entry {entry_id} has a negative amount: {amount}")]
    NegativeAmount {
        /// The offending entry.
        entry_id: AuditEntryId,
        /// The amount it carries.
        amount: Decimal,
    },

    /// A running total left the representable decimal range.
    #[error("Ledger totals overflow at audit entry {entry_id}")]
    AmountOverflow {
        /// The entry whose amount overflowed a total.
        entry_id: AuditEntryId,
    },

    /// Sort option is not recognised.
    #[error("Unknown sort option: {0}")]
    UnknownSortOption(String),
}

impl LedgerError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NegativeAmount { .. } => "NEGATIVE_AMOUNT",
            Self::AmountOverflow { .. } => "AMOUNT_OVERFLOW",
            Self::UnknownSortOption(_) => "UNKNOWN_SORT_OPTION",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            Self::AmountOverflow { .. } => 422,
            Self::NegativeAmount { .. } | Self::UnknownSortOption(_) => 400,
        }
    }
}

impl From<LedgerError> for institute_shared::AppError {
    fn from(err: LedgerError) -> Self {
        Self::Validation(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = LedgerError::NegativeAmount {
            entry_id: AuditEntryId::from_uuid(uuid::Uuid::nil()),
            amount: Decimal::new(-5000, 2),
        };
        assert_eq!(
            err.to_string(),
            "Audit entry 00000000-0000-0000-0000-000000000000 has a negative amount: -50.00"
        );
        assert_eq!(err.error_code(), "NEGATIVE_AMOUNT");
        assert_eq!(
            LedgerError::UnknownSortOption("oldest".into()).http_status_code(),
            400
        );

        let overflow = LedgerError::AmountOverflow {
            entry_id: AuditEntryId::from_uuid(uuid::Uuid::nil()),
        };
        assert_eq!(overflow.error_code(), "AMOUNT_OVERFLOW");
        assert_eq!(overflow.http_status_code(), 422);
    }
}
