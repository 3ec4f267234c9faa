//! CLI commands

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use tracing::info;

use institute_core::clock::{Clock, SystemClock};
use institute_core::export::LedgerCsv;
use institute_core::export::csv::DATE_FORMAT;
use institute_core::payment::{PaymentError, ReceiptNumber};
use institute_core::records::{Payment, Student, StudentDirectory};
use institute_core::{
    AuditEntry, BatchScopeFilter, DuplicatePaymentGuard, Ledger, LedgerAssembler, LedgerSort,
    NarrationFormatter,
};
use institute_shared::AppConfig;
use institute_shared::types::StudentId;

use crate::OutputFormat;
use crate::input::load_snapshot;

/// Exit code when the checked payment duplicates a committed one.
const DUPLICATE_EXIT_CODE: u8 = 2;

/// Arguments of the `ledger` command after configuration defaults apply.
pub struct LedgerArgs {
    pub entries: PathBuf,
    pub students: Option<PathBuf>,
    pub batch: String,
    pub sort: LedgerSort,
    pub financial_only: bool,
    pub format: OutputFormat,
    pub output: Option<PathBuf>,
}

/// Assemble the ledger for a batch and print it
pub fn ledger(config: &AppConfig, args: &LedgerArgs) -> Result<()> {
    let entries: Vec<AuditEntry> = load_snapshot(&args.entries)?;
    let students: StudentDirectory = match &args.students {
        Some(path) => load_snapshot::<Student>(path)?.into_iter().collect(),
        None => StudentDirectory::new(),
    };
    let filter = BatchScopeFilter::from_config(&config.scope, &students);

    let ledger = LedgerAssembler::assemble_scoped(
        &entries,
        &filter,
        &args.batch,
        args.sort,
        args.financial_only,
    )?;

    info!(
        batch = %args.batch,
        lines = ledger.summary.entry_count,
        closing_balance = %ledger.summary.closing_balance,
        "Ledger ready"
    );

    match &args.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            render(&ledger, args.format, BufWriter::new(file))
        }
        None => render(&ledger, args.format, io::stdout().lock()),
    }
}

/// Check a prospective payment against a payments snapshot
pub fn check_payment(
    config: &AppConfig,
    payments: &Path,
    student: StudentId,
    amount: Decimal,
    date: NaiveDate,
) -> Result<ExitCode> {
    let payments: Vec<Payment> = load_snapshot(payments)?;
    let check = PaymentCheck {
        student,
        amount,
        date,
        year: SystemClock.now().year(),
    };
    report_check(&config.receipt.prefix, &payments, &check, &mut io::stdout().lock())
}

/// A prospective payment and the year its receipt would carry.
struct PaymentCheck {
    student: StudentId,
    amount: Decimal,
    date: NaiveDate,
    year: i32,
}

fn report_check<W: Write>(
    prefix: &str,
    payments: &[Payment],
    check: &PaymentCheck,
    out: &mut W,
) -> Result<ExitCode> {
    match DuplicatePaymentGuard::ensure_unique(payments, check.student, check.amount, check.date) {
        Ok(()) => {
            let receipt = ReceiptNumber::next_for(prefix, payments, check.year);
            writeln!(out, "No duplicate found. Next receipt number: {receipt}")?;
            Ok(ExitCode::SUCCESS)
        }
        Err(PaymentError::Duplicate(conflict)) => {
            serde_json::to_writer_pretty(&mut *out, &conflict)?;
            writeln!(out)?;
            eprintln!(
                "Payment of {:.2} on {} duplicates receipt {}",
                conflict.amount, conflict.payment_date, conflict.receipt_number
            );
            Ok(ExitCode::from(DUPLICATE_EXIT_CODE))
        }
        Err(other) => Err(other.into()),
    }
}

fn render<W: Write>(ledger: &Ledger, format: OutputFormat, mut out: W) -> Result<()> {
    match format {
        OutputFormat::Csv => LedgerCsv::write(ledger, &mut out)?,
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut out, ledger)?;
            writeln!(out)?;
        }
        OutputFormat::Table => write_table(ledger, &mut out)?,
    }
    out.flush()?;
    Ok(())
}

fn write_table<W: Write>(ledger: &Ledger, out: &mut W) -> io::Result<()> {
    writeln!(
        out,
        "{:>5}  {:<11}  {:<15}  {:<17}  {:>12}  {:>12}  {:>12}  Particulars",
        "Sr.", "Date", "Voucher", "Type", "Debit", "Credit", "Balance"
    )?;
    for line in &ledger.lines {
        writeln!(
            out,
            "{:>5}  {:<11}  {:<15}  {:<17}  {:>12}  {:>12}  {:>12.2}  {}",
            line.serial_number,
            line.entry.timestamp.format(DATE_FORMAT).to_string(),
            NarrationFormatter::voucher(&line.entry).unwrap_or("-"),
            line.label,
            cell(line.debit),
            cell(line.credit),
            line.balance,
            line.narration,
        )?;
    }

    let summary = &ledger.summary;
    writeln!(
        out,
        "{:>5}  {:<11}  {:<15}  {:<17}  {:>12.2}  {:>12.2}  {:>12.2}",
        "", "Total", "", "", summary.total_debits, summary.total_credits, summary.closing_balance
    )
}

fn cell(amount: Option<Decimal>) -> String {
    amount.map_or_else(String::new, |a| format!("{a:.2}"))
}
