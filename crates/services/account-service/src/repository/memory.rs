//! In-process account repository.
//!
//! Holds every account in a map behind one async `RwLock`. Email uniqueness
//! is checked and the write applied under the same write guard, so two
//! concurrent registrations for one email cannot both succeed.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use common::{AppError, AppResult};
use domain::{Account, AccountUpdate, NewAccountRecord};

use super::AccountRepository;

/// Map-backed AccountRepository for tests and database-less embedding.
#[derive(Default)]
pub struct InMemoryAccountStore {
    accounts: RwLock<HashMap<Uuid, Account>>,
}

impl InMemoryAccountStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored accounts
    pub async fn len(&self) -> usize {
        self.accounts.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.accounts.read().await.is_empty()
    }
}

fn email_taken(accounts: &HashMap<Uuid, Account>, email: &str, except: Option<Uuid>) -> bool {
    accounts
        .values()
        .any(|a| a.email == email && Some(a.id) != except)
}

#[async_trait]
impl AccountRepository for InMemoryAccountStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Account>> {
        Ok(self.accounts.read().await.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<Account>> {
        Ok(self
            .accounts
            .read()
            .await
            .values()
            .find(|a| a.email == email)
            .cloned())
    }

    async fn create(&self, record: NewAccountRecord) -> AppResult<Account> {
        let mut accounts = self.accounts.write().await;

        if email_taken(&accounts, &record.email, None) {
            return Err(AppError::DuplicateEmail);
        }

        let account = Account::new(Uuid::new_v4(), record);
        accounts.insert(account.id, account.clone());
        Ok(account)
    }

    async fn update_by_id(&self, id: Uuid, update: AccountUpdate) -> AppResult<Option<Account>> {
        let mut accounts = self.accounts.write().await;

        if let Some(email) = &update.email {
            if email_taken(&accounts, email, Some(id)) {
                return Err(AppError::DuplicateEmail);
            }
        }

        Ok(accounts.get_mut(&id).map(|account| {
            account.apply(update);
            account.clone()
        }))
    }

    async fn delete_by_id(&self, id: Uuid) -> AppResult<Option<Account>> {
        Ok(self.accounts.write().await.remove(&id))
    }
}
