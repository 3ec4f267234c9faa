//! Audit trail domain types.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use institute_shared::types::{AuditEntryId, BatchId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::details::AuditDetails;
use super::error::AuditError;

/// Kind of mutation an audit entry describes.
///
/// The taxonomy is closed; anything else is rejected at parse time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditAction {
    /// A record was created.
    Create,
    /// A record was amended.
    Update,
    /// A record was removed.
    Delete,
    /// A fee payment was received.
    Payment,
    /// A placement installment was received.
    PlacementPayment,
    /// Money was paid out to a placement company.
    CompanyPaymentDebit,
    /// Money was returned to a student.
    Refund,
    /// Manual correction reducing the balance.
    Adjustment,
    /// Scholarship granted against fees.
    Scholarship,
    /// Discount granted against fees.
    Discount,
}

impl AuditAction {
    /// Every action, in taxonomy order.
    pub const ALL: [Self; 10] = [
        Self::Create,
        Self::Update,
        Self::Delete,
        Self::Payment,
        Self::PlacementPayment,
        Self::CompanyPaymentDebit,
        Self::Refund,
        Self::Adjustment,
        Self::Scholarship,
        Self::Discount,
    ];

    /// Returns the canonical wire name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "CREATE",
            Self::Update => "UPDATE",
            Self::Delete => "DELETE",
            Self::Payment => "PAYMENT",
            Self::PlacementPayment => "PLACEMENT_PAYMENT",
            Self::CompanyPaymentDebit => "COMPANY_PAYMENT_DEBIT",
            Self::Refund => "REFUND",
            Self::Adjustment => "ADJUSTMENT",
            Self::Scholarship => "SCHOLARSHIP",
            Self::Discount => "DISCOUNT",
        }
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AuditAction {
    type Err = AuditError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|a| a.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| AuditError::UnknownAction(s.to_string()))
    }
}

/// Kind of record an audit entry refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntityType {
    /// A student record.
    Student,
    /// A fee payment.
    Payment,
    /// An international placement.
    Placement,
    /// An institute expense.
    Expense,
}

impl EntityType {
    /// Every entity type.
    pub const ALL: [Self; 4] = [Self::Student, Self::Payment, Self::Placement, Self::Expense];

    /// Returns the canonical wire name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Student => "STUDENT",
            Self::Payment => "PAYMENT",
            Self::Placement => "PLACEMENT",
            Self::Expense => "EXPENSE",
        }
    }

    /// Returns the label used in narration ("Student", "Payment", ...).
    #[must_use]
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::Student => "Student",
            Self::Payment => "Payment",
            Self::Placement => "Placement",
            Self::Expense => "Expense",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityType {
    type Err = AuditError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| AuditError::UnknownEntityType(s.to_string()))
    }
}

/// One immutable record of a domain mutation.
///
/// `entity_name`, `details`, and `batch_id` are captured at write time and
/// never re-derived, so an entry survives deletion of the record it names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEntry {
    /// The entry ID.
    pub id: AuditEntryId,
    /// What happened.
    pub action: AuditAction,
    /// Kind of record affected.
    pub entity_type: EntityType,
    /// ID of the record affected.
    pub entity_id: Uuid,
    /// Display label of the record at write time.
    pub entity_name: String,
    /// Free-form attributes captured at write time.
    #[serde(default)]
    pub details: AuditDetails,
    /// Amount moved, absent for pure record events.
    #[serde(default)]
    pub amount: Option<Decimal>,
    /// Creation instant; the ledger's only ordering key.
    pub timestamp: DateTime<Utc>,
    /// Batch scope inferred at write time.
    #[serde(default)]
    pub batch_id: Option<BatchId>,
}

impl AuditEntry {
    /// Returns the amount, treating an absent amount as zero.
    #[must_use]
    pub fn amount_or_zero(&self) -> Decimal {
        self.amount.unwrap_or(Decimal::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("PAYMENT", AuditAction::Payment)]
    #[case("placement_payment", AuditAction::PlacementPayment)]
    #[case(" COMPANY_PAYMENT_DEBIT ", AuditAction::CompanyPaymentDebit)]
    #[case("Scholarship", AuditAction::Scholarship)]
    fn test_action_parses(#[case] raw: &str, #[case] expected: AuditAction) {
        assert_eq!(raw.parse::<AuditAction>().unwrap(), expected);
    }

    #[test]
    fn test_unknown_action_is_rejected() {
        let err = "VOID".parse::<AuditAction>().unwrap_err();
        assert!(matches!(err, AuditError::UnknownAction(ref s) if s == "VOID"));
    }

    #[test]
    fn test_entity_type_parses() {
        assert_eq!("expense".parse::<EntityType>().unwrap(), EntityType::Expense);
        assert!(matches!(
            "INVOICE".parse::<EntityType>(),
            Err(AuditError::UnknownEntityType(_))
        ));
    }

    #[test]
    fn test_wire_names_match_serde() {
        for action in AuditAction::ALL {
            let json = serde_json::to_string(&action).unwrap();
            assert_eq!(json, format!("\"{}\"", action.as_str()));
        }
        for entity in EntityType::ALL {
            let json = serde_json::to_string(&entity).unwrap();
            assert_eq!(json, format!("\"{}\"", entity.as_str()));
        }
    }

    #[test]
    fn test_entry_deserializes_camel_case() {
        let json = r#"{
            "id": "0190a6f2-7b3c-7d4e-8f00-000000000001",
            "action": "PAYMENT",
            "entityType": "PAYMENT",
            "entityId": "0190a6f2-7b3c-7d4e-8f00-000000000002",
            "entityName": "Asha Rao",
            "details": {"paymentMethod": "upi"},
            "amount": "5000",
            "timestamp": "2024-06-01T10:00:00Z",
            "batchId": "2024-25"
        }"#;
        let entry: AuditEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.action, AuditAction::Payment);
        assert_eq!(entry.amount_or_zero(), Decimal::new(5000, 0));
        assert_eq!(entry.batch_id, Some(BatchId::new("2024-25")));
    }
}
