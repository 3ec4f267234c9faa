//! Payment integrity: duplicate guard, receipt numbering, and the payment
//! workflow that ties storage to the audit trail.
//!
//! The guard is a fast pre-check. Uniqueness is enforced again inside
//! [`PaymentStore::insert`], and [`PaymentService`] serializes creation per
//! student, so two identical submissions can never both commit.

pub mod error;
pub mod guard;
pub mod locks;
pub mod receipt;
pub mod service;
pub mod store;

pub use error::{DuplicateConflict, PaymentError};
pub use guard::DuplicatePaymentGuard;
pub use locks::StudentLocks;
pub use receipt::ReceiptNumber;
pub use service::{DebitRequest, PaymentService};
pub use store::{InMemoryPaymentStore, PaymentStore};
