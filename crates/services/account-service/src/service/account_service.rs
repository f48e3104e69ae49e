//! Account service - registration, lookup, edit, authentication, removal.
//!
//! Every operation is a single pass over the repository: no state is kept
//! between calls and nothing is retried.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use common::{AppError, AppResult, OptionExt};
use domain::{Account, AccountChanges, AccountUpdate, NewAccount, NewAccountRecord};

use crate::repository::AccountRepository;
use crate::security::{Claims, SecretHasher, TokenIssuer, TokenKind, TokenPair};

/// Account service trait for dependency injection.
#[async_trait]
pub trait AccountService: Send + Sync {
    /// Register a new account; fails with `DuplicateEmail` if the email is taken
    async fn register(&self, input: NewAccount) -> AppResult<Account>;

    /// Get account by ID
    async fn get(&self, id: Uuid) -> AppResult<Account>;

    /// Apply allow-listed changes after verifying the current password
    async fn edit(
        &self,
        id: Uuid,
        current_password: &str,
        changes: AccountChanges,
    ) -> AppResult<Account>;

    /// Exchange email and password for an access/refresh token pair
    async fn authenticate(&self, email: &str, password: &str) -> AppResult<TokenPair>;

    /// Exchange a refresh token for a new token pair
    async fn refresh(&self, refresh_token: &str) -> AppResult<TokenPair>;

    /// Verify an access token and return its claims
    fn verify_access(&self, access_token: &str) -> AppResult<Claims>;

    /// Delete an account, returning its state before deletion
    async fn remove(&self, id: Uuid) -> AppResult<Account>;
}

/// Concrete implementation of AccountService.
pub struct AccountManager {
    repo: Arc<dyn AccountRepository>,
    hasher: Arc<dyn SecretHasher>,
    tokens: Arc<dyn TokenIssuer>,
}

impl AccountManager {
    /// Create new account service from its collaborators
    pub fn new(
        repo: Arc<dyn AccountRepository>,
        hasher: Arc<dyn SecretHasher>,
        tokens: Arc<dyn TokenIssuer>,
    ) -> Self {
        Self {
            repo,
            hasher,
            tokens,
        }
    }

    /// Load the account and check `password` against its stored hash.
    async fn verified_account_by_id(&self, id: Uuid, password: &str) -> AppResult<Account> {
        let account = self.repo.find_by_id(id).await?.ok_or_not_found()?;
        self.check_password(&account, password).await?;
        Ok(account)
    }

    async fn check_password(&self, account: &Account, password: &str) -> AppResult<()> {
        if self.hasher.verify(password, &account.password_hash).await? {
            Ok(())
        } else {
            tracing::warn!(account_id = %account.id, "Password verification failed");
            Err(AppError::InvalidCredentials)
        }
    }
}

#[async_trait]
impl AccountService for AccountManager {
    async fn register(&self, input: NewAccount) -> AppResult<Account> {
        input.check()?;

        let password_hash = self.hasher.hash(&input.password).await?;

        // Uniqueness is enforced by the store, not by a prior lookup
        let account = self
            .repo
            .create(NewAccountRecord {
                email: input.email,
                password_hash,
                name: input.name,
                profile: input.profile,
            })
            .await?;

        tracing::info!(account_id = %account.id, "Account registered");
        Ok(account)
    }

    async fn get(&self, id: Uuid) -> AppResult<Account> {
        tracing::debug!(account_id = %id, "Fetching account");
        self.repo.find_by_id(id).await?.ok_or_not_found()
    }

    async fn edit(
        &self,
        id: Uuid,
        current_password: &str,
        changes: AccountChanges,
    ) -> AppResult<Account> {
        let account = self.verified_account_by_id(id, current_password).await?;

        changes.check()?;
        if changes.is_empty() {
            return Ok(account);
        }

        let password_hash = match changes.password.as_deref() {
            Some(raw) => Some(self.hasher.hash(raw).await?),
            None => None,
        };

        let update = AccountUpdate {
            email: changes.email,
            name: changes.name,
            password_hash,
            profile: changes.profile,
        };

        let updated = self.repo.update_by_id(id, update).await?.ok_or_not_found()?;

        tracing::info!(account_id = %id, "Account updated");
        Ok(updated)
    }

    async fn authenticate(&self, email: &str, password: &str) -> AppResult<TokenPair> {
        let account = self.repo.find_by_email(email).await?.ok_or_not_found()?;
        self.check_password(&account, password).await?;

        tracing::debug!(account_id = %account.id, "Issuing token pair");
        self.tokens.issue_pair(account.id)
    }

    async fn refresh(&self, refresh_token: &str) -> AppResult<TokenPair> {
        let claims = self.tokens.verify(refresh_token, TokenKind::Refresh)?;

        // Deleted accounts must not keep minting tokens
        let account = self.repo.find_by_id(claims.sub).await?.ok_or_not_found()?;

        self.tokens.issue_pair(account.id)
    }

    fn verify_access(&self, access_token: &str) -> AppResult<Claims> {
        self.tokens.verify(access_token, TokenKind::Access)
    }

    async fn remove(&self, id: Uuid) -> AppResult<Account> {
        let account = self.repo.delete_by_id(id).await?.ok_or_not_found()?;

        tracing::info!(account_id = %id, "Account removed");
        Ok(account)
    }
}
