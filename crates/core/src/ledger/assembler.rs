//! Ledger assembly from audit entries.

use std::cmp::Reverse;

use rust_decimal::Decimal;
use tracing::debug;

use super::error::LedgerError;
use super::types::{Ledger, LedgerLine, LedgerSort, LedgerSummary};
use crate::audit::{AuditEntry, EntityType};
use crate::narration::{Direction, NarrationFormatter};
use crate::records::BatchLookup;
use crate::scope::BatchScopeFilter;

/// Builds the ledger view.
///
/// Assembly is a pure function of its inputs: no I/O, no hidden state, safe
/// to call concurrently from any number of read paths.
pub struct LedgerAssembler;

impl LedgerAssembler {
    /// Assembles a ledger from audit entries.
    ///
    /// Balances are computed in one pass over the entries in timestamp order
    /// (ties keep their input order). The running balance is carried signed
    /// from line to line; only the displayed `balance` is clamped at zero.
    /// Lines are then re-ordered for display per `sort`, which never changes
    /// any computed value.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::NegativeAmount`] if any entry carries a negative
    /// amount, or [`LedgerError::AmountOverflow`] if a total leaves the
    /// representable range.
    pub fn assemble(
        entries: &[AuditEntry],
        sort: LedgerSort,
        financial_only: bool,
    ) -> Result<Ledger, LedgerError> {
        Self::validate(entries)?;

        let selected: Vec<&AuditEntry> = entries
            .iter()
            .filter(|e| !financial_only || Self::is_financial(e))
            .collect();

        let chronological = Self::chronological(selected);
        let (lines, summary) = Self::accumulate(&chronological)?;
        let lines = Self::order_for_display(lines, sort);

        debug!(
            entries = entries.len(),
            lines = summary.entry_count,
            total_credits = %summary.total_credits,
            total_debits = %summary.total_debits,
            closing_balance = %summary.closing_balance,
            sort = %sort,
            financial_only,
            "Ledger assembled"
        );

        Ok(Ledger { lines, summary })
    }

    /// Scopes entries to a batch, then assembles them.
    ///
    /// An unknown batch label follows the filter's fallback policy.
    ///
    /// # Errors
    ///
    /// Same as [`Self::assemble`].
    pub fn assemble_scoped<L: BatchLookup>(
        entries: &[AuditEntry],
        filter: &BatchScopeFilter<L>,
        batch: &str,
        sort: LedgerSort,
        financial_only: bool,
    ) -> Result<Ledger, LedgerError> {
        let scoped = filter.scope(entries, batch);
        Self::assemble(&scoped, sort, financial_only)
    }

    /// Returns true if the entry belongs in a financial-only ledger.
    #[must_use]
    pub fn is_financial(entry: &AuditEntry) -> bool {
        entry.entity_type == EntityType::Payment || NarrationFormatter::is_financial(entry.action)
    }

    fn validate(entries: &[AuditEntry]) -> Result<(), LedgerError> {
        match entries
            .iter()
            .find(|e| e.amount.is_some_and(|a| a < Decimal::ZERO))
        {
            Some(entry) => Err(LedgerError::NegativeAmount {
                entry_id: entry.id,
                amount: entry.amount_or_zero(),
            }),
            None => Ok(()),
        }
    }

    fn chronological(mut entries: Vec<&AuditEntry>) -> Vec<&AuditEntry> {
        entries.sort_by_key(|e| e.timestamp);
        entries
    }

    fn accumulate(
        entries: &[&AuditEntry],
    ) -> Result<(Vec<LedgerLine>, LedgerSummary), LedgerError> {
        let mut running = Decimal::ZERO;
        let mut total_credits = Decimal::ZERO;
        let mut total_debits = Decimal::ZERO;
        let mut lines = Vec::with_capacity(entries.len());

        for (position, entry) in entries.iter().enumerate() {
            let classification = NarrationFormatter::classify(entry.action);
            let amount = entry.amount_or_zero();
            let overflow = || LedgerError::AmountOverflow { entry_id: entry.id };

            let (credit, debit) = match classification.direction {
                Direction::Credit => {
                    running = running.checked_add(amount).ok_or_else(overflow)?;
                    total_credits = total_credits.checked_add(amount).ok_or_else(overflow)?;
                    (Some(amount), None)
                }
                Direction::Debit => {
                    running = running.checked_sub(amount).ok_or_else(overflow)?;
                    total_debits = total_debits.checked_add(amount).ok_or_else(overflow)?;
                    (None, Some(amount))
                }
                Direction::NonFinancial => (None, None),
            };

            lines.push(LedgerLine {
                serial_number: position + 1,
                entry: (*entry).clone(),
                direction: classification.direction,
                label: classification.label,
                narration: NarrationFormatter::narrate(entry),
                credit,
                debit,
                balance: running.max(Decimal::ZERO),
            });
        }

        let summary = LedgerSummary::new(total_credits, total_debits, lines.len());
        Ok((lines, summary))
    }

    fn order_for_display(mut lines: Vec<LedgerLine>, sort: LedgerSort) -> Vec<LedgerLine> {
        match sort {
            LedgerSort::DateOldest => {}
            LedgerSort::DateNewest => lines.reverse(),
            LedgerSort::NameAsc => {
                lines.sort_by_cached_key(|l| (l.entry.entity_name.to_lowercase(), l.serial_number));
            }
            LedgerSort::NameDesc => {
                lines.sort_by_cached_key(|l| {
                    (Reverse(l.entry.entity_name.to_lowercase()), l.serial_number)
                });
            }
        }
        lines
    }
}
