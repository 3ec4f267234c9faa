//! Academic batch scoping.
//!
//! The same filter narrows students, payments, placements, and audit entries
//! so that every view derived from them agrees on what "this batch" means.

pub mod error;
pub mod filter;

pub use error::ScopeError;
pub use filter::{BatchRef, BatchScope, BatchScopeFilter, BatchScoped};
