//! Chronological ledger assembly.
//!
//! This module turns audit entries into the ledger view:
//! - One chronological pass computing running balances and totals
//! - A separate, purely cosmetic re-ordering for display
//! - Summary totals with a zero-clamped closing balance
//!
//! Nothing here is persisted; the ledger is recomputed on every read.

pub mod assembler;
pub mod error;
pub mod types;


pub use assembler::LedgerAssembler;
pub use error::LedgerError;
pub use types::{Ledger, LedgerLine, LedgerSort, LedgerSummary};
