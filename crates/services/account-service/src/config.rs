//! Account service configuration.

use std::env;

use common::{AppError, AppResult, DatabaseConfig, HashingConfig, TokenConfig};

/// Account service configuration.
#[derive(Debug, Clone)]
pub struct AccountServiceConfig {
    /// Database connection settings
    pub database: DatabaseConfig,
    /// Token signing secrets and lifetimes
    pub tokens: TokenConfig,
    /// Argon2 cost parameters
    pub hashing: HashingConfig,
}

impl AccountServiceConfig {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    /// Returns a config error when a token secret is missing or too weak.
    pub fn from_env() -> AppResult<Self> {
        Self::from_lookup(|name: &str| env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    /// Returns a config error when a variable is set but does not parse.
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database = database_from_lookup(&lookup)?;

        let tokens = TokenConfig {
            access_secret: lookup("ACCESS_TOKEN_SECRET")
                .ok_or_else(|| AppError::config("ACCESS_TOKEN_SECRET must be set"))?,
            refresh_secret: lookup("REFRESH_TOKEN_SECRET")
                .ok_or_else(|| AppError::config("REFRESH_TOKEN_SECRET must be set"))?,
            access_ttl_minutes: parse_opt(&lookup, "ACCESS_TOKEN_TTL_MINUTES")?,
            refresh_ttl_minutes: parse_opt(&lookup, "REFRESH_TOKEN_TTL_MINUTES")?,
        };
        tokens.validate()?;

        let hash_defaults = HashingConfig::default();
        let hashing = HashingConfig {
            memory_kib: parse_or(&lookup, "PASSWORD_HASH_MEMORY_KIB", hash_defaults.memory_kib)?,
            iterations: parse_or(&lookup, "PASSWORD_HASH_ITERATIONS", hash_defaults.iterations)?,
            parallelism: parse_or(&lookup, "PASSWORD_HASH_PARALLELISM", hash_defaults.parallelism)?,
        };

        Ok(Self {
            database,
            tokens,
            hashing,
        })
    }
}

/// Load only the database settings; migrations need nothing else.
pub fn database_from_env() -> AppResult<DatabaseConfig> {
    database_from_lookup(&|name: &str| env::var(name).ok())
}

fn database_from_lookup<F>(lookup: &F) -> AppResult<DatabaseConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let defaults = DatabaseConfig::default();
    Ok(DatabaseConfig {
        url: lookup("ACCOUNT_SERVICE_DATABASE_URL")
            .or_else(|| lookup("DATABASE_URL"))
            .unwrap_or(defaults.url),
        max_connections: parse_or(lookup, "DATABASE_MAX_CONNECTIONS", defaults.max_connections)?,
        min_connections: parse_or(lookup, "DATABASE_MIN_CONNECTIONS", defaults.min_connections)?,
    })
}

/// Unset is `None`; set but unparseable is an error naming the variable.
fn parse_opt<F, T>(lookup: &F, name: &str) -> AppResult<Option<T>>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    lookup(name)
        .map(|raw| {
            raw.trim()
                .parse()
                .map_err(|e| AppError::config(format!("{} has invalid value {:?}: {}", name, raw, e)))
        })
        .transpose()
}

fn parse_or<F, T>(lookup: &F, name: &str, default: T) -> AppResult<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    Ok(parse_opt(lookup, name)?.unwrap_or(default))
}
