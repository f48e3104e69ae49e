//! Domain layer - Core business entities and value objects.
//!
//! This crate contains pure domain logic with no infrastructure dependencies.
//! Account records, their redacted views, and the password value object live
//! here so both the service and any transport built on top share one model.

pub mod account;
pub mod constants;
pub mod error;
pub mod password;

pub use account::{
    Account, AccountChanges, AccountResponse, AccountUpdate, NewAccount, NewAccountRecord,
    Profile,
};
pub use constants::*;
pub use error::{DomainError, DomainResult};
pub use password::Password;
