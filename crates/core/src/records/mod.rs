//! Student, payment, and placement records as the engine sees them.
//!
//! The storage layer owns these records; only the fields the reconciliation
//! engine reads are modelled here.

pub mod directory;
pub mod types;

pub use directory::{BatchLookup, StudentDirectory};
pub use types::{Installment, NewPayment, Payment, PaymentStatus, Placement, Student};
