//! Financial reconciliation engine for the institute administration tool.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! Storage is reached only through the repository traits defined here.
//!
//! # Modules
//!
//! - `audit` - Append-only audit trail and the event recorder
//! - `payment` - Duplicate-payment guard, receipt numbering, payment workflow
//! - `narration` - Credit/debit classification and ledger narration
//! - `ledger` - Chronological ledger assembly with running balances
//! - `scope` - Academic batch scoping for every record collection
//! - `export` - CSV rendering of an assembled ledger
//! - `records` - Student, payment, and placement records read by the engine
//! - `clock` - Time source seam

pub mod audit;
pub mod clock;
pub mod export;
pub mod ledger;
pub mod narration;
pub mod payment;
pub mod records;
pub mod scope;

pub use audit::{AuditAction, AuditEntry, AuditRecorder, EntityType};
pub use ledger::{Ledger, LedgerAssembler, LedgerSort};
pub use narration::NarrationFormatter;
pub use payment::{DuplicatePaymentGuard, PaymentService};
pub use scope::{BatchScope, BatchScopeFilter};
