//! Institute Ledger CLI
//!
//! Assembles the ledger from an audit-trail snapshot and checks new payments
//! against a payment snapshot.

mod commands;
mod input;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use rust_decimal::Decimal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use institute_core::LedgerSort;
use institute_shared::AppConfig;
use institute_shared::types::StudentId;

#[derive(Parser)]
#[command(name = "institute-ledger")]
#[command(about = "Institute financial ledger tooling", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Output format for the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Aligned text table.
    Table,
    /// CSV with a trailing totals row.
    Csv,
    /// Pretty-printed JSON.
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Assemble and print the ledger
    Ledger {
        /// Audit entries snapshot (JSON array)
        #[arg(long)]
        entries: PathBuf,
        /// Students snapshot (JSON array) for entries without a recorded batch
        #[arg(long)]
        students: Option<PathBuf>,
        /// Academic batch, or "all"
        #[arg(long, default_value = "all")]
        batch: String,
        /// Display order (date-newest, date-oldest, name-asc, name-desc)
        #[arg(long)]
        sort: Option<LedgerSort>,
        /// Hide non-financial entries
        #[arg(long)]
        financial_only: bool,
        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Check whether a new payment duplicates a committed one
    CheckPayment {
        /// Payments snapshot (JSON array)
        #[arg(long)]
        payments: PathBuf,
        /// Paying student ID
        #[arg(long)]
        student: StudentId,
        /// Payment amount
        #[arg(long)]
        amount: Decimal,
        /// Payment date (YYYY-MM-DD)
        #[arg(long)]
        date: NaiveDate,
    },
}

fn main() -> anyhow::Result<ExitCode> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Load configuration
    let config = AppConfig::load().context("Failed to load configuration")?;

    // Initialize tracing; stdout is reserved for command output
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.logging.filter.as_str().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Ledger {
            entries,
            students,
            batch,
            sort,
            financial_only,
            format,
            output,
        } => {
            let sort = match sort {
                Some(sort) => sort,
                None => config
                    .ledger
                    .default_sort
                    .parse()
                    .context("Invalid ledger.default_sort in configuration")?,
            };
            commands::ledger(
                &config,
                &commands::LedgerArgs {
                    entries,
                    students,
                    batch,
                    sort,
                    financial_only: financial_only || config.ledger.financial_only,
                    format,
                    output,
                },
            )?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::CheckPayment {
            payments,
            student,
            amount,
            date,
        } => commands::check_payment(&config, &payments, student, amount, date),
    }
}
