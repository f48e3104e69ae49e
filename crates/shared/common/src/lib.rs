//! Common utilities shared across services.
//!
//! This crate provides:
//! - Unified error handling with a closed set of error kinds
//! - Configuration structures for database, tokens, and hashing

pub mod config;
pub mod error;

pub use config::*;
pub use error::{AppError, AppResult, OptionExt};
