//! Account repository backed by SeaORM.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QuerySelect, Set, SqlErr, TransactionTrait,
};
use uuid::Uuid;

use super::entities::account::{self, ActiveModel, Entity as AccountEntity};
use common::{AppError, AppResult};
use domain::{Account, AccountUpdate, NewAccountRecord};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Account repository trait for dependency injection.
///
/// Implementations own email uniqueness: `create` and `update_by_id` must
/// fail with `AppError::DuplicateEmail` rather than store a second account
/// under an existing email.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Find account by ID
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Account>>;

    /// Find account by email address
    async fn find_by_email(&self, email: &str) -> AppResult<Option<Account>>;

    /// Create a new account
    async fn create(&self, record: NewAccountRecord) -> AppResult<Account>;

    /// Apply an update; `None` if no account has this ID
    async fn update_by_id(&self, id: Uuid, update: AccountUpdate) -> AppResult<Option<Account>>;

    /// Delete an account, returning its prior state; `None` if nothing was deleted
    async fn delete_by_id(&self, id: Uuid) -> AppResult<Option<Account>>;
}

/// Concrete implementation of AccountRepository over PostgreSQL.
pub struct AccountStore {
    db: DatabaseConnection,
}

impl AccountStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

/// The unique index on `email` is the only unique constraint a write can hit.
fn map_write_err(err: DbErr) -> AppError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => AppError::DuplicateEmail,
        _ => AppError::from(err),
    }
}

#[async_trait]
impl AccountRepository for AccountStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Account>> {
        let result = AccountEntity::find_by_id(id).one(&self.db).await?;

        Ok(result.map(Account::from))
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<Account>> {
        let result = AccountEntity::find()
            .filter(account::Column::Email.eq(email))
            .one(&self.db)
            .await?;

        Ok(result.map(Account::from))
    }

    async fn create(&self, record: NewAccountRecord) -> AppResult<Account> {
        let now = Utc::now();
        let active_model = ActiveModel {
            id: Set(Uuid::new_v4()),
            email: Set(record.email),
            password_hash: Set(record.password_hash),
            name: Set(record.name),
            profile: Set(serde_json::Value::Object(record.profile)),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = active_model.insert(&self.db).await.map_err(map_write_err)?;
        Ok(Account::from(model))
    }

    async fn update_by_id(&self, id: Uuid, update: AccountUpdate) -> AppResult<Option<Account>> {
        let Some(model) = AccountEntity::find_by_id(id).one(&self.db).await? else {
            return Ok(None);
        };

        let mut active: ActiveModel = model.into();

        if let Some(email) = update.email {
            active.email = Set(email);
        }
        if let Some(name) = update.name {
            active.name = Set(name);
        }
        if let Some(password_hash) = update.password_hash {
            active.password_hash = Set(password_hash);
        }
        if let Some(profile) = update.profile {
            active.profile = Set(serde_json::Value::Object(profile));
        }
        active.updated_at = Set(Utc::now());

        match active.update(&self.db).await {
            Ok(model) => Ok(Some(Account::from(model))),
            // Deleted between the read and the write
            Err(DbErr::RecordNotUpdated) => Ok(None),
            Err(e) => Err(map_write_err(e)),
        }
    }

    async fn delete_by_id(&self, id: Uuid) -> AppResult<Option<Account>> {
        let txn = self.db.begin().await?;

        let Some(model) = AccountEntity::find_by_id(id)
            .lock_exclusive()
            .one(&txn)
            .await?
        else {
            return Ok(None);
        };

        let result = AccountEntity::delete_by_id(id).exec(&txn).await?;
        if result.rows_affected == 0 {
            return Ok(None);
        }

        txn.commit().await?;
        Ok(Some(Account::from(model)))
    }
}
