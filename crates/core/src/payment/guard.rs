//! Duplicate payment detection.

use chrono::NaiveDate;
use institute_shared::types::StudentId;
use rust_decimal::Decimal;
use tracing::warn;

use super::error::{DuplicateConflict, PaymentError};
use crate::records::{Payment, PaymentStatus};

/// Blocks a new fee payment that repeats a committed one.
///
/// A duplicate is an existing payment for the same student, with the same
/// amount (numeric equality, so `5000` matches `5000.00`), on the same
/// calendar day, in status `completed`.
///
/// The check is a pre-check over whatever view of payments the caller
/// passes in. It is not atomic with the eventual write; the payment store
/// re-checks under its own lock.
pub struct DuplicatePaymentGuard;

impl DuplicatePaymentGuard {
    /// Returns the first committed payment the new one would duplicate.
    #[must_use]
    pub fn check_duplicate(
        payments: &[Payment],
        student_id: StudentId,
        amount: Decimal,
        date: NaiveDate,
    ) -> Option<&Payment> {
        payments
            .iter()
            .find(|p| Self::is_duplicate_of(p, student_id, amount, date))
    }

    /// Returns true if `existing` blocks a new payment with these values.
    #[must_use]
    pub fn is_duplicate_of(
        existing: &Payment,
        student_id: StudentId,
        amount: Decimal,
        date: NaiveDate,
    ) -> bool {
        existing.status == PaymentStatus::Completed
            && existing.student_id == student_id
            && existing.amount == amount
            && existing.payment_date == date
    }

    /// Rejects a new payment that duplicates a committed one.
    ///
    /// # Errors
    ///
    /// Returns [`PaymentError::Duplicate`] carrying the matched payment.
    pub fn ensure_unique(
        payments: &[Payment],
        student_id: StudentId,
        amount: Decimal,
        date: NaiveDate,
    ) -> Result<(), PaymentError> {
        match Self::check_duplicate(payments, student_id, amount, date) {
            Some(existing) => {
                warn!(
                    student_id = %student_id,
                    amount = %amount,
                    payment_date = %date,
                    existing_receipt = %existing.receipt_number,
                    "Duplicate payment blocked"
                );
                Err(PaymentError::Duplicate(DuplicateConflict::from(existing)))
            }
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use institute_shared::types::PaymentId;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, day).unwrap()
    }

    fn payment(student_id: StudentId, amount: Decimal, day: u32, status: PaymentStatus) -> Payment {
        Payment {
            id: PaymentId::new(),
            student_id,
            amount,
            payment_date: date(day),
            status,
            receipt_number: "RCT-2024-0001".to_string(),
            payment_method: Some("cash".to_string()),
            bank_account: None,
            cheque_number: None,
            remarks: None,
            batch_id: None,
        }
    }

    #[test]
    fn test_exact_match_is_rejected_with_identity() {
        let student = StudentId::new();
        let payments = vec![payment(student, dec!(5000), 1, PaymentStatus::Completed)];

        let found = DuplicatePaymentGuard::check_duplicate(&payments, student, dec!(5000), date(1));
        assert_eq!(found.map(|p| p.id), Some(payments[0].id));

        let err = DuplicatePaymentGuard::ensure_unique(&payments, student, dec!(5000), date(1))
            .unwrap_err();
        let conflict = err.conflict().unwrap();
        assert_eq!(conflict.payment_id, payments[0].id);
        assert_eq!(conflict.receipt_number, "RCT-2024-0001");
    }

    #[rstest]
    #[case::different_day(dec!(5000), 2)]
    #[case::different_amount(dec!(5001), 1)]
    #[case::one_paisa_off(dec!(4999.99), 1)]
    fn test_near_misses_pass(#[case] amount: Decimal, #[case] day: u32) {
        let student = StudentId::new();
        let payments = vec![payment(student, dec!(5000), 1, PaymentStatus::Completed)];

        assert!(
            DuplicatePaymentGuard::check_duplicate(&payments, student, amount, date(day))
                .is_none()
        );
        assert!(
            DuplicatePaymentGuard::ensure_unique(&payments, student, amount, date(day)).is_ok()
        );
    }

    #[test]
    fn test_scale_does_not_matter() {
        let student = StudentId::new();
        let payments = vec![payment(student, dec!(5000), 1, PaymentStatus::Completed)];
        assert!(
            DuplicatePaymentGuard::check_duplicate(&payments, student, dec!(5000.00), date(1))
                .is_some()
        );
    }

    #[rstest]
    #[case(PaymentStatus::Pending)]
    #[case(PaymentStatus::Failed)]
    #[case(PaymentStatus::Refunded)]
    fn test_uncommitted_payments_do_not_block(#[case] status: PaymentStatus) {
        let student = StudentId::new();
        let payments = vec![payment(student, dec!(5000), 1, status)];
        assert!(
            DuplicatePaymentGuard::check_duplicate(&payments, student, dec!(5000), date(1))
                .is_none()
        );
    }

    #[test]
    fn test_other_students_do_not_block() {
        let payments = vec![payment(StudentId::new(), dec!(5000), 1, PaymentStatus::Completed)];
        assert!(
            DuplicatePaymentGuard::check_duplicate(&payments, StudentId::new(), dec!(5000), date(1))
                .is_none()
        );
    }
}
