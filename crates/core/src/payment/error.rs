//! Payment error types.

use std::fmt;

use chrono::NaiveDate;
use institute_shared::types::{PaymentId, PlacementId, StudentId};
use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;

use crate::audit::{AuditAction, AuditError};
use crate::records::Payment;

/// The committed payment a new payment collides with.
///
/// Carries everything the caller needs to show the operator before they
/// decide whether to force the payment through.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DuplicateConflict {
    /// ID of the existing payment.
    pub payment_id: PaymentId,
    /// Student both payments belong to.
    pub student_id: StudentId,
    /// Receipt number of the existing payment.
    pub receipt_number: String,
    /// Amount of the existing payment.
    pub amount: Decimal,
    /// Calendar day of the existing payment.
    pub payment_date: NaiveDate,
}

impl From<&Payment> for DuplicateConflict {
    fn from(payment: &Payment) -> Self {
        Self {
            payment_id: payment.id,
            student_id: payment.student_id,
            receipt_number: payment.receipt_number.clone(),
            amount: payment.amount,
            payment_date: payment.payment_date,
        }
    }
}

impl fmt::Display for DuplicateConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "receipt {} already records {:.2} on {}",
            self.receipt_number, self.amount, self.payment_date
        )
    }
}

/// Errors that can occur in payment operations.
#[derive(Debug, Error)]
pub enum PaymentError {
    // ========== Conflict Errors ==========
    /// A committed payment with the same student, amount, and day exists.
    #[error("Duplicate payment: {0}")]
    Duplicate(DuplicateConflict),

    // ========== Validation Errors ==========
    /// Payment amounts must be greater than zero.
    #[error("Payment amount must be positive, got {0}")]
    NonPositiveAmount(Decimal),

    /// Installment would pay more than the placement still owes.
    #[error("Installment of {requested} exceeds outstanding balance of {outstanding}")]
    ExceedsOutstanding {
        /// Amount still owed on the placement.
        outstanding: Decimal,
        /// Amount of the rejected installment.
        requested: Decimal,
    },

    /// Action does not reduce the balance.
    #[error("{0} is not a debit action")]
    NotADebit(AuditAction),

    // ========== Not Found Errors ==========
    /// Payment does not exist.
    #[error("Payment not found: {0}")]
    PaymentNotFound(PaymentId),

    /// Placement does not exist.
    #[error("Placement not found: {0}")]
    PlacementNotFound(PlacementId),

    // ========== Storage Errors ==========
    /// Payment storage failed.
    #[error("Payment storage error: {0}")]
    Storage(String),

    /// Audit trail rejected or failed to store the entry.
    #[error(transparent)]
    Audit(#[from] AuditError),
}

impl PaymentError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Duplicate(_) => "DUPLICATE_PAYMENT",
            Self::NonPositiveAmount(_) => "NON_POSITIVE_AMOUNT",
            Self::ExceedsOutstanding { .. } => "EXCEEDS_OUTSTANDING",
            Self::NotADebit(_) => "NOT_A_DEBIT",
            Self::PaymentNotFound(_) => "PAYMENT_NOT_FOUND",
            Self::PlacementNotFound(_) => "PLACEMENT_NOT_FOUND",
            Self::Storage(_) => "PAYMENT_STORAGE_ERROR",
            Self::Audit(err) => err.error_code(),
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            Self::Duplicate(_) => 409,
            Self::NonPositiveAmount(_)
            | Self::ExceedsOutstanding { .. }
            | Self::NotADebit(_) => 400,
            Self::PaymentNotFound(_) | Self::PlacementNotFound(_) => 404,
            Self::Storage(_) => 500,
            Self::Audit(err) => err.http_status_code(),
        }
    }

    /// Returns the conflicting payment, if this is a duplicate rejection.
    #[must_use]
    pub fn conflict(&self) -> Option<&DuplicateConflict> {
        match self {
            Self::Duplicate(conflict) => Some(conflict),
            _ => None,
        }
    }
}

impl From<PaymentError> for institute_shared::AppError {
    fn from(err: PaymentError) -> Self {
        match err {
            PaymentError::Duplicate(_) => Self::Conflict(err.to_string()),
            PaymentError::PaymentNotFound(_) | PaymentError::PlacementNotFound(_) => {
                Self::NotFound(err.to_string())
            }
            PaymentError::Storage(msg) => Self::Database(msg),
            PaymentError::Audit(inner) => inner.into(),
            other => Self::Validation(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use institute_shared::AppError;
    use rust_decimal_macros::dec;

    fn conflict() -> DuplicateConflict {
        DuplicateConflict {
            payment_id: PaymentId::new(),
            student_id: StudentId::new(),
            receipt_number: "RCT-2024-0003".to_string(),
            amount: dec!(5000),
            payment_date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
        }
    }

    #[test]
    fn test_duplicate_message_names_receipt() {
        let err = PaymentError::Duplicate(conflict());
        assert_eq!(
            err.to_string(),
            "Duplicate payment: receipt RCT-2024-0003 already records 5000.00 on 2024-06-01"
        );
        assert_eq!(err.http_status_code(), 409);
        assert_eq!(err.conflict().map(|c| c.receipt_number.as_str()), Some("RCT-2024-0003"));
    }

    #[test]
    fn test_app_error_mapping() {
        assert!(matches!(
            AppError::from(PaymentError::Duplicate(conflict())),
            AppError::Conflict(_)
        ));
        assert!(matches!(
            AppError::from(PaymentError::NonPositiveAmount(dec!(0))),
            AppError::Validation(_)
        ));
        assert!(matches!(
            AppError::from(PaymentError::PaymentNotFound(PaymentId::new())),
            AppError::NotFound(_)
        ));
        assert!(matches!(
            AppError::from(PaymentError::Audit(AuditError::Storage("poisoned".into()))),
            AppError::Database(_)
        ));
    }

    #[test]
    fn test_audit_errors_keep_their_code() {
        let err = PaymentError::from(AuditError::MissingEntity);
        assert_eq!(err.error_code(), "MISSING_ENTITY");
        assert_eq!(err.http_status_code(), 400);
    }

    #[test]
    fn test_conflict_serializes_camel_case() {
        let json = serde_json::to_value(conflict()).unwrap();
        assert_eq!(json["receiptNumber"], "RCT-2024-0003");
        assert_eq!(json["paymentDate"], "2024-06-01");
    }
}
