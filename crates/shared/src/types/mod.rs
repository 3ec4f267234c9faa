//! Common types used across the application.

pub mod batch;
pub mod id;


pub use batch::BatchId;
pub use id::*;
