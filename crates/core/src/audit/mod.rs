//! Append-only audit trail.
//!
//! Every domain mutation produces exactly one [`AuditEntry`]. Entries are
//! never updated or deleted by the engine; the ledger is derived from them
//! on every read.

pub mod details;
pub mod error;
pub mod query;
pub mod recorder;
pub mod repository;
pub mod types;

pub use details::AuditDetails;
pub use error::AuditError;
pub use query::AuditQuery;
pub use recorder::AuditRecorder;
pub use repository::{AuditRepository, InMemoryAuditRepository};
pub use types::{AuditAction, AuditEntry, EntityType};
