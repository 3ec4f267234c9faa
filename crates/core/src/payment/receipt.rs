//! Receipt numbering.

use crate::records::Payment;

/// Human-facing receipt numbers of the form `RCT-2024-0001`.
///
/// Receipt numbers are a display convenience. The payment ID is the key.
pub struct ReceiptNumber;

impl ReceiptNumber {
    /// Formats a receipt number; the sequence is zero-padded to four digits.
    #[must_use]
    pub fn format(prefix: &str, year: i32, sequence: u64) -> String {
        format!("{prefix}-{year}-{sequence:04}")
    }

    /// Numbers the next payment as one more than the payments in scope.
    ///
    /// Two writers counting the same scope at once get the same number; use
    /// the store's sequence where that matters.
    #[must_use]
    pub fn next_for(prefix: &str, payments_in_scope: &[Payment], year: i32) -> String {
        let count = u64::try_from(payments_in_scope.len()).unwrap_or(u64::MAX);
        Self::format(prefix, year, count.saturating_add(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::PaymentStatus;
    use chrono::NaiveDate;
    use institute_shared::types::{PaymentId, StudentId};
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[rstest]
    #[case(1, "RCT-2024-0001")]
    #[case(42, "RCT-2024-0042")]
    #[case(9999, "RCT-2024-9999")]
    #[case(12345, "RCT-2024-12345")]
    fn test_format(#[case] sequence: u64, #[case] expected: &str) {
        assert_eq!(ReceiptNumber::format("RCT", 2024, sequence), expected);
    }

    #[test]
    fn test_next_for_counts_scope() {
        let payments: Vec<Payment> = (0..3)
            .map(|_| Payment {
                id: PaymentId::new(),
                student_id: StudentId::new(),
                amount: dec!(100),
                payment_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                status: PaymentStatus::Completed,
                receipt_number: String::new(),
                payment_method: None,
                bank_account: None,
                cheque_number: None,
                remarks: None,
                batch_id: None,
            })
            .collect();

        assert_eq!(ReceiptNumber::next_for("RCT", &payments, 2025), "RCT-2025-0004");
        assert_eq!(ReceiptNumber::next_for("FEE", &[], 2025), "FEE-2025-0001");
    }
}
