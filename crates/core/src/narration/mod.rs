//! Credit/debit classification and human-readable narration.
//!
//! Narration is presentation text only; nothing computes from it.

pub mod classify;
pub mod narrate;

pub use classify::{Classification, Direction};

/// Lookup and formatting for audit actions.
///
/// Consumed by the ledger assembler and by CSV export.
pub struct NarrationFormatter;
