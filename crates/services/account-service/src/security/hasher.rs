//! Argon2id secret hashing.
//!
//! Hashing and verification are CPU-bound, so both run on tokio's blocking
//! pool instead of stalling the async executor.

use argon2::{Algorithm, Argon2, Params, Version};
use async_trait::async_trait;

use common::{AppError, AppResult, HashingConfig};
use domain::Password;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// One-way hashing of raw secrets.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait SecretHasher: Send + Sync {
    /// Hash a raw secret into a self-describing hash string
    async fn hash(&self, raw: &str) -> AppResult<String>;

    /// Check a raw secret against a stored hash
    async fn verify(&self, raw: &str, hash: &str) -> AppResult<bool>;
}

/// Argon2id implementation of SecretHasher.
#[derive(Clone)]
pub struct Argon2Hasher {
    argon2: Argon2<'static>,
}

impl Argon2Hasher {
    /// Build a hasher from cost parameters.
    ///
    /// # Errors
    /// Returns a config error when Argon2 rejects the parameters.
    pub fn new(config: HashingConfig) -> AppResult<Self> {
        let params = Params::new(config.memory_kib, config.iterations, config.parallelism, None)
            .map_err(|e| AppError::config(format!("Invalid password hash parameters: {}", e)))?;

        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }
}

#[async_trait]
impl SecretHasher for Argon2Hasher {
    async fn hash(&self, raw: &str) -> AppResult<String> {
        let raw = raw.to_owned();
        let argon2 = self.argon2.clone();

        let password = tokio::task::spawn_blocking(move || Password::hash_with(&raw, &argon2))
            .await
            .map_err(|e| AppError::internal(format!("Password hashing task failed: {}", e)))??;

        Ok(password.into_string())
    }

    async fn verify(&self, raw: &str, hash: &str) -> AppResult<bool> {
        let raw = raw.to_owned();
        let stored = Password::from_hash(hash);

        let matches = tokio::task::spawn_blocking(move || stored.try_verify(&raw))
            .await
            .map_err(|e| AppError::internal(format!("Password verification task failed: {}", e)))??;

        Ok(matches)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::assert_ok;

    fn cheap() -> Argon2Hasher {
        Argon2Hasher::new(HashingConfig {
            memory_kib: 8,
            iterations: 1,
            parallelism: 1,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_hash_then_verify() {
        let hasher = cheap();
        let hash = hasher.hash("CorrectHorse1").await.unwrap();

        assert_ne!(hash, "CorrectHorse1");
        assert!(hasher.verify("CorrectHorse1", &hash).await.unwrap());
        assert!(!hasher.verify("WrongHorse11", &hash).await.unwrap());
    }

    #[tokio::test]
    async fn test_hash_encodes_configured_cost() {
        let hash = cheap().hash("CorrectHorse1").await.unwrap();
        assert!(hash.starts_with("$argon2id$v=19$m=8,t=1,p=1$"));
    }

    #[tokio::test]
    async fn test_short_secret_rejected() {
        let result = cheap().hash("short").await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_malformed_hash_is_error_not_mismatch() {
        let result = cheap().verify("CorrectHorse1", "plaintext-in-db").await;
        assert!(matches!(result, Err(AppError::Internal(_))));
    }

    #[test]
    fn test_invalid_params_rejected() {
        let invalid = Argon2Hasher::new(HashingConfig {
            memory_kib: 1,
            iterations: 0,
            parallelism: 1,
        });
        assert!(matches!(invalid, Err(AppError::Config(_))));
        assert_ok!(Argon2Hasher::new(HashingConfig::default()));
    }
}
