//! Account Service Library
//!
//! Registration, lookup, password-checked edits, token issuance, and
//! deletion of accounts. The crate is consumed as a library by whatever
//! transport sits in front of it; the bundled binary only covers schema
//! migrations and a startup self-check.

pub mod config;
pub mod infra;
pub mod repository;
pub mod security;
pub mod service;

use std::sync::Arc;

use tracing::{info, warn};

use common::{AppResult, DatabaseConfig};

use crate::config::AccountServiceConfig;
use crate::infra::Database;
use crate::repository::AccountStore;
use crate::security::{Argon2Hasher, JwtIssuer};
use crate::service::AccountManager;

pub use crate::repository::{AccountRepository, InMemoryAccountStore};
pub use crate::security::{Claims, SecretHasher, TokenIssuer, TokenKind, TokenPair};
pub use crate::service::AccountService;

/// Wire an AccountManager over PostgreSQL, applying pending migrations.
pub async fn connect(config: &AccountServiceConfig) -> AppResult<AccountManager> {
    let db = Database::connect(&config.database).await?;
    build_manager(config, Arc::new(AccountStore::new(db.get_connection())))
}

/// Wire an AccountManager over an arbitrary repository.
pub fn build_manager(
    config: &AccountServiceConfig,
    repo: Arc<dyn AccountRepository>,
) -> AppResult<AccountManager> {
    let hasher = Arc::new(Argon2Hasher::new(config.hashing)?);
    let tokens = Arc::new(JwtIssuer::new(&config.tokens)?);

    Ok(AccountManager::new(repo, hasher, tokens))
}

/// Validate configuration and database reachability without serving anything.
pub async fn check(config: &AccountServiceConfig) -> AppResult<()> {
    Argon2Hasher::new(config.hashing)?;
    JwtIssuer::new(&config.tokens)?;
    info!("Token and hashing configuration valid");

    let db = Database::connect_without_migrations(&config.database).await?;
    db.ping().await?;
    info!("Database reachable");

    let pending: Vec<String> = db
        .migration_status()
        .await?
        .into_iter()
        .filter(|(_, applied)| !applied)
        .map(|(name, _)| name)
        .collect();
    if pending.is_empty() {
        info!("Schema up to date");
    } else {
        warn!("Pending migrations: {}", pending.join(", "));
    }

    Ok(())
}

/// Run migrations (for CLI commands).
pub async fn run_migrations(config: &DatabaseConfig, action: MigrateAction) -> AppResult<()> {
    let db = Database::connect_without_migrations(config).await?;

    match action {
        MigrateAction::Up => {
            db.run_migrations().await?;
            info!("Migrations applied successfully");
        }
        MigrateAction::Down => {
            db.rollback_migration().await?;
            info!("Rolled back last migration");
        }
        MigrateAction::Status => {
            for (name, applied) in db.migration_status().await? {
                let marker = if applied { "[x]" } else { "[ ]" };
                println!("{} {}", marker, name);
            }
        }
        MigrateAction::Fresh => {
            db.fresh_migrations().await?;
            info!("Database reset and migrations applied");
        }
    }

    Ok(())
}

/// Migration action type.
#[derive(Debug, Clone, Copy)]
pub enum MigrateAction {
    Up,
    Down,
    Status,
    Fresh,
}
