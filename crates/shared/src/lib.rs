//! Shared types, errors, and configuration for the institute ledger.
//!
//! This crate provides common types used across all other crates:
//! - Typed IDs for type-safe record references
//! - Academic batch identifiers
//! - Application-wide error types
//! - Configuration management

pub mod config;
pub mod error;
pub mod types;

pub use config::AppConfig;
pub use error::{AppError, AppResult};
