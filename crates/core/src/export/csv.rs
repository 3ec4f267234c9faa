//! CSV rendering of an assembled ledger.

use std::io::Write;

use ::csv::{Terminator, WriterBuilder};
use rust_decimal::Decimal;
use tracing::debug;

use super::error::ExportError;
use crate::ledger::{Ledger, LedgerLine};
use crate::narration::NarrationFormatter;

/// Column headers, in output order.
pub const HEADERS: [&str; 10] = [
    "Sr. No.",
    "Date",
    "Voucher No.",
    "Particulars",
    "Type",
    "Method/Bank",
    "Remarks",
    "Debit",
    "Credit",
    "Balance",
];

/// Date cell format (`05 Jun 2024`).
pub const DATE_FORMAT: &str = "%d %b %Y";

/// Writes a ledger as CSV.
///
/// Lines are written in the ledger's display order. The final row is a
/// totals row and is not a transaction.
pub struct LedgerCsv;

impl LedgerCsv {
    /// Renders the ledger to a CSV string.
    ///
    /// # Errors
    ///
    /// Returns an error if the CSV writer fails.
    pub fn render(ledger: &Ledger) -> Result<String, ExportError> {
        let mut buf = Vec::new();
        Self::write(ledger, &mut buf)?;
        Ok(String::from_utf8(buf)?)
    }

    /// Writes the ledger as CSV to `sink`.
    ///
    /// # Errors
    ///
    /// Returns an error if the CSV writer or the sink fails.
    pub fn write<W: Write>(ledger: &Ledger, sink: W) -> Result<(), ExportError> {
        let mut wtr = WriterBuilder::new()
            .terminator(Terminator::Any(b'\n'))
            .from_writer(sink);

        wtr.write_record(HEADERS)?;
        for line in &ledger.lines {
            wtr.write_record(Self::row(line))?;
        }

        let summary = &ledger.summary;
        let mut totals = vec![String::from("Total")];
        totals.extend(std::iter::repeat_n(String::new(), 6));
        totals.push(money(summary.total_debits));
        totals.push(money(summary.total_credits));
        totals.push(money(summary.closing_balance));
        wtr.write_record(&totals)?;

        wtr.flush()?;
        debug!(rows = ledger.lines.len(), "Ledger exported as CSV");
        Ok(())
    }

    fn row(line: &LedgerLine) -> [String; 10] {
        let entry = &line.entry;
        [
            line.serial_number.to_string(),
            entry.timestamp.format(DATE_FORMAT).to_string(),
            NarrationFormatter::voucher(entry).unwrap_or_default().to_string(),
            line.narration.clone(),
            line.label.to_string(),
            NarrationFormatter::method_display(&entry.details).unwrap_or_default(),
            NarrationFormatter::remarks(entry),
            line.debit.map(money).unwrap_or_default(),
            line.credit.map(money).unwrap_or_default(),
            money(line.balance),
        ]
    }
}

fn money(amount: Decimal) -> String {
    format!("{amount:.2}")
}
