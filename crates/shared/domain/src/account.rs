//! Account domain entity and related types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::constants::MIN_PASSWORD_LENGTH;
use crate::error::DomainResult;

/// Free-form profile fields attached to an account.
pub type Profile = serde_json::Map<String, serde_json::Value>;

/// Account domain entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub name: String,
    #[serde(default)]
    pub profile: Profile,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Build a fresh account from a store-ready record.
    pub fn new(id: Uuid, record: NewAccountRecord) -> Self {
        let now = Utc::now();
        Self {
            id,
            email: record.email,
            password_hash: record.password_hash,
            name: record.name,
            profile: record.profile,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply an update in place, bumping `updated_at`.
    pub fn apply(&mut self, update: AccountUpdate) {
        if let Some(email) = update.email {
            self.email = email;
        }
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(password_hash) = update.password_hash {
            self.password_hash = password_hash;
        }
        if let Some(profile) = update.profile {
            self.profile = profile;
        }
        self.updated_at = Utc::now();
    }
}

/// Registration input
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewAccount {
    /// Account email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    /// Raw password (minimum 8 characters)
    #[validate(length(min = MIN_PASSWORD_LENGTH, message = "Password must be at least 8 characters"))]
    pub password: String,
    /// Display name
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    /// Additional profile fields
    #[serde(default)]
    pub profile: Profile,
}

impl NewAccount {
    /// Registration input with an empty profile.
    pub fn new(email: impl Into<String>, password: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            name: name.into(),
            profile: Profile::new(),
        }
    }

    /// Attach profile fields.
    pub fn with_profile(mut self, profile: Profile) -> Self {
        self.profile = profile;
        self
    }

    /// Run field validation.
    pub fn check(&self) -> DomainResult<()> {
        self.validate()?;
        Ok(())
    }
}

/// Allow-listed edit input. Fields left as `None` are untouched.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct AccountChanges {
    /// New email address
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
    /// New display name
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: Option<String>,
    /// New raw password
    #[validate(length(min = MIN_PASSWORD_LENGTH, message = "Password must be at least 8 characters"))]
    pub password: Option<String>,
    /// Replacement profile fields
    pub profile: Option<Profile>,
}

impl AccountChanges {
    /// Run field validation.
    pub fn check(&self) -> DomainResult<()> {
        self.validate()?;
        Ok(())
    }

    /// True if nothing would change.
    pub fn is_empty(&self) -> bool {
        self.email.is_none() && self.name.is_none() && self.password.is_none() && self.profile.is_none()
    }
}

/// Store input for creation; the password is already hashed.
#[derive(Debug, Clone, PartialEq)]
pub struct NewAccountRecord {
    pub email: String,
    pub password_hash: String,
    pub name: String,
    pub profile: Profile,
}

/// Store input for updates; the password, if any, is already hashed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AccountUpdate {
    pub email: Option<String>,
    pub name: Option<String>,
    pub password_hash: Option<String>,
    pub profile: Option<Profile>,
}

/// Account response (safe to return to client)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountResponse {
    /// Unique account identifier
    pub id: Uuid,
    /// Account email address
    pub email: String,
    /// Display name
    pub name: String,
    /// Additional profile fields
    pub profile: Profile,
    /// Account creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp
    pub updated_at: DateTime<Utc>,
}

impl From<Account> for AccountResponse {
    fn from(account: Account) -> Self {
        Self {
            id: account.id,
            email: account.email,
            name: account.name,
            profile: account.profile,
            created_at: account.created_at,
            updated_at: account.updated_at,
        }
    }
}

impl From<&Account> for AccountResponse {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id,
            email: account.email.clone(),
            name: account.name.clone(),
            profile: account.profile.clone(),
            created_at: account.created_at,
            updated_at: account.updated_at,
        }
    }
}
