//! Fixed classification table for audit actions.

use serde::{Deserialize, Serialize};

use super::NarrationFormatter;
use crate::audit::AuditAction;

/// Effect of an entry on the running balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Money in; increases the balance.
    Credit,
    /// Money out or waived; decreases the balance.
    Debit,
    /// Record-keeping only; no balance effect.
    NonFinancial,
}

impl Direction {
    /// Returns true for credits and debits.
    #[must_use]
    pub const fn is_financial(self) -> bool {
        !matches!(self, Self::NonFinancial)
    }
}

/// Direction and display label for one action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Classification {
    /// Balance effect.
    pub direction: Direction,
    /// Ledger "Type" label.
    pub label: &'static str,
}

impl NarrationFormatter {
    /// Classifies an action.
    #[must_use]
    pub const fn classify(action: AuditAction) -> Classification {
        let (direction, label) = match action {
            AuditAction::Payment => (Direction::Credit, "Receipt"),
            AuditAction::PlacementPayment => (Direction::Credit, "Placement Receipt"),
            AuditAction::CompanyPaymentDebit => (Direction::Debit, "Company Payment"),
            AuditAction::Refund => (Direction::Debit, "Refund"),
            AuditAction::Adjustment => (Direction::Debit, "Adjustment"),
            AuditAction::Scholarship => (Direction::Debit, "Scholarship"),
            AuditAction::Discount => (Direction::Debit, "Discount"),
            AuditAction::Create => (Direction::NonFinancial, "Entry"),
            AuditAction::Update => (Direction::NonFinancial, "Amendment"),
            AuditAction::Delete => (Direction::NonFinancial, "Removal"),
        };
        Classification { direction, label }
    }

    /// Returns true if the action moves the balance.
    #[must_use]
    pub const fn is_financial(action: AuditAction) -> bool {
        Self::classify(action).direction.is_financial()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(AuditAction::Payment, Direction::Credit, "Receipt")]
    #[case(AuditAction::PlacementPayment, Direction::Credit, "Placement Receipt")]
    #[case(AuditAction::CompanyPaymentDebit, Direction::Debit, "Company Payment")]
    #[case(AuditAction::Refund, Direction::Debit, "Refund")]
    #[case(AuditAction::Adjustment, Direction::Debit, "Adjustment")]
    #[case(AuditAction::Scholarship, Direction::Debit, "Scholarship")]
    #[case(AuditAction::Discount, Direction::Debit, "Discount")]
    #[case(AuditAction::Create, Direction::NonFinancial, "Entry")]
    #[case(AuditAction::Update, Direction::NonFinancial, "Amendment")]
    #[case(AuditAction::Delete, Direction::NonFinancial, "Removal")]
    fn test_classification_table(
        #[case] action: AuditAction,
        #[case] direction: Direction,
        #[case] label: &str,
    ) {
        let c = NarrationFormatter::classify(action);
        assert_eq!(c.direction, direction);
        assert_eq!(c.label, label);
    }

    #[test]
    fn test_financial_actions() {
        let financial: Vec<_> = AuditAction::ALL
            .into_iter()
            .filter(|a| NarrationFormatter::is_financial(*a))
            .collect();
        assert_eq!(financial.len(), 7);
        assert!(!financial.contains(&AuditAction::Create));
    }
}
