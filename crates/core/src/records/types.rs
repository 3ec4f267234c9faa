//! Record types supplied by the storage boundary.

use chrono::NaiveDate;
use institute_shared::types::{BatchId, PaymentId, PlacementId, StudentId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A student enrolled in an academic batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    /// The student ID.
    pub id: StudentId,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Batch the student currently belongs to.
    pub batch_id: BatchId,
}

impl Student {
    /// Returns the display label captured on audit entries ("First Last").
    #[must_use]
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
            .trim()
            .to_string()
    }
}

/// Payment status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    /// Money received and committed.
    Completed,
    /// Awaiting clearance (e.g. an uncleared cheque).
    Pending,
    /// Payment attempt failed.
    Failed,
    /// Payment was returned to the payer.
    Refunded,
}

impl PaymentStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Completed => "completed",
            Self::Pending => "pending",
            Self::Failed => "failed",
            Self::Refunded => "refunded",
        }
    }
}

/// A committed fee payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    /// The payment ID.
    pub id: PaymentId,
    /// Paying student.
    pub student_id: StudentId,
    /// Amount paid.
    pub amount: Decimal,
    /// Calendar day the payment was made.
    pub payment_date: NaiveDate,
    /// Payment status.
    pub status: PaymentStatus,
    /// Human-facing receipt number (`RCT-2024-0001`).
    pub receipt_number: String,
    /// Payment method (`cash`, `upi`, `card`, `bank_transfer`, `cheque`).
    #[serde(default)]
    pub payment_method: Option<String>,
    /// Receiving bank account, for non-cash methods.
    #[serde(default)]
    pub bank_account: Option<String>,
    /// Cheque number, for cheque payments.
    #[serde(default)]
    pub cheque_number: Option<String>,
    /// Free-form remarks.
    #[serde(default)]
    pub remarks: Option<String>,
    /// Batch recorded on the payment itself, if any.
    #[serde(default)]
    pub batch_id: Option<BatchId>,
}

/// Input for creating a new fee payment.
#[derive(Debug, Clone)]
pub struct NewPayment {
    /// Paying student.
    pub student_id: StudentId,
    /// Display label of the paying student.
    pub student_name: String,
    /// Amount paid (must be positive).
    pub amount: Decimal,
    /// Calendar day of payment.
    pub payment_date: NaiveDate,
    /// Status to commit with.
    pub status: PaymentStatus,
    /// Payment method.
    pub payment_method: Option<String>,
    /// Receiving bank account.
    pub bank_account: Option<String>,
    /// Cheque number.
    pub cheque_number: Option<String>,
    /// Free-form remarks.
    pub remarks: Option<String>,
}

/// One installment paid toward a placement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Installment {
    /// Installment amount.
    pub amount: Decimal,
    /// Calendar day the installment was paid.
    pub paid_on: NaiveDate,
    /// Payment method.
    #[serde(default)]
    pub payment_method: Option<String>,
    /// Receiving bank account.
    #[serde(default)]
    pub bank_account: Option<String>,
    /// Free-form remarks.
    #[serde(default)]
    pub remarks: Option<String>,
}

/// An international job placement and its payment plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Placement {
    /// The placement ID.
    pub id: PlacementId,
    /// Placed student.
    pub student_id: StudentId,
    /// Destination country.
    pub country: String,
    /// Agreed placement cost.
    pub total_cost: Decimal,
    /// Installments received so far.
    #[serde(default)]
    pub installments: Vec<Installment>,
}

impl Placement {
    /// Sum of all installments received.
    #[must_use]
    pub fn paid_total(&self) -> Decimal {
        self.installments.iter().map(|i| i.amount).sum()
    }

    /// Amount still owed, never below zero.
    #[must_use]
    pub fn outstanding(&self) -> Decimal {
        (self.total_cost - self.paid_total()).max(Decimal::ZERO)
    }
}
