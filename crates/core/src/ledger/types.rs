//! Ledger view types.
//!
//! These are derived on every read and never persisted.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::LedgerError;
use crate::audit::AuditEntry;
use crate::narration::Direction;

/// Display ordering for ledger lines.
///
/// Ordering is cosmetic: balances are always computed chronologically first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LedgerSort {
    /// Most recent first.
    #[default]
    DateNewest,
    /// Oldest first (true chronological order).
    DateOldest,
    /// Entity name, A to Z.
    NameAsc,
    /// Entity name, Z to A.
    NameDesc,
}

impl LedgerSort {
    /// Every option.
    pub const ALL: [Self; 4] = [Self::DateNewest, Self::DateOldest, Self::NameAsc, Self::NameDesc];

    /// Returns the option's wire name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::DateNewest => "date-newest",
            Self::DateOldest => "date-oldest",
            Self::NameAsc => "name-asc",
            Self::NameDesc => "name-desc",
        }
    }
}

impl fmt::Display for LedgerSort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LedgerSort {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|o| o.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| LedgerError::UnknownSortOption(s.to_string()))
    }
}

/// One audit entry placed in the ledger.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerLine {
    /// Position in chronological order, starting at 1.
    pub serial_number: usize,
    /// The underlying entry.
    pub entry: AuditEntry,
    /// Balance effect of the entry.
    pub direction: Direction,
    /// Ledger "Type" label.
    pub label: &'static str,
    /// Human-readable particulars.
    pub narration: String,
    /// Amount credited; set only for credit entries.
    pub credit: Option<Decimal>,
    /// Amount debited; set only for debit entries.
    pub debit: Option<Decimal>,
    /// Running balance after this entry, clamped at zero for display.
    pub balance: Decimal,
}

/// Aggregate totals over a ledger.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerSummary {
    /// Sum of all credits.
    pub total_credits: Decimal,
    /// Sum of all debits.
    pub total_debits: Decimal,
    /// `max(0, total_credits - total_debits)`.
    pub closing_balance: Decimal,
    /// Number of lines.
    pub entry_count: usize,
}

impl LedgerSummary {
    /// Builds a summary from running totals.
    #[must_use]
    pub fn new(total_credits: Decimal, total_debits: Decimal, entry_count: usize) -> Self {
        Self {
            total_credits,
            total_debits,
            closing_balance: (total_credits - total_debits).max(Decimal::ZERO),
            entry_count,
        }
    }

    /// Credits minus debits without clamping; negative means money is owed back.
    #[must_use]
    pub fn net(&self) -> Decimal {
        self.total_credits - self.total_debits
    }
}

/// An assembled ledger: lines in display order plus totals.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Ledger {
    /// Lines in the requested display order.
    pub lines: Vec<LedgerLine>,
    /// Totals across all lines.
    pub summary: LedgerSummary,
}

impl Ledger {
    /// Returns true if no line was produced.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}
