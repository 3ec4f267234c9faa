//! Ledger export.

pub mod csv;
pub mod error;

pub use self::csv::LedgerCsv;
pub use error::ExportError;
