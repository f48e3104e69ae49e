//! Account service behaviour over the in-memory store with real hashing and signing.

use std::sync::Arc;

use serde_json::json;
use uuid::Uuid;

use account_service_lib::repository::InMemoryAccountStore;
use account_service_lib::security::{Argon2Hasher, JwtIssuer, SecretHasher, TokenIssuer, TokenKind};
use account_service_lib::service::{AccountManager, AccountService};
use common::{AppError, HashingConfig, TokenConfig};
use domain::{AccountChanges, AccountResponse, NewAccount, Profile};

const ACCESS_SECRET: &str = "integration-access-secret-0123456789";
const REFRESH_SECRET: &str = "integration-refresh-secret-012345678";
const PASSWORD: &str = "initial-password-1";

struct Harness {
    service: AccountManager,
    tokens: Arc<JwtIssuer>,
    hasher: Arc<Argon2Hasher>,
}

fn harness() -> Harness {
    let hasher = Arc::new(
        Argon2Hasher::new(HashingConfig {
            memory_kib: 8,
            iterations: 1,
            parallelism: 1,
        })
        .unwrap(),
    );
    let tokens = Arc::new(JwtIssuer::new(&TokenConfig::new(ACCESS_SECRET, REFRESH_SECRET)).unwrap());
    let service = AccountManager::new(
        Arc::new(InMemoryAccountStore::new()),
        hasher.clone(),
        tokens.clone(),
    );

    Harness {
        service,
        tokens,
        hasher,
    }
}

fn signup(email: &str) -> NewAccount {
    NewAccount::new(email, PASSWORD, "Support Agent")
}

#[tokio::test]
async fn test_register_twice_is_duplicate_email() {
    let h = harness();
    h.service.register(signup("twice@example.com")).await.unwrap();

    let result = h.service.register(signup("twice@example.com")).await;

    assert!(matches!(result, Err(AppError::DuplicateEmail)));
}

#[tokio::test]
async fn test_concurrent_registration_has_one_winner() {
    let h = Arc::new(harness());

    let tasks: Vec<_> = (0..8)
        .map(|_| {
            let h = h.clone();
            tokio::spawn(async move { h.service.register(signup("race@example.com")).await })
        })
        .collect();

    let mut winners = 0;
    for task in tasks {
        match task.await.unwrap() {
            Ok(_) => winners += 1,
            Err(AppError::DuplicateEmail) => {}
            Err(e) => panic!("unexpected error: {e}"),
        }
    }

    assert_eq!(winners, 1);
}

#[tokio::test]
async fn test_register_then_authenticate_yields_tokens_for_same_account() {
    let h = harness();
    let account = h.service.register(signup("login@example.com")).await.unwrap();

    let pair = h
        .service
        .authenticate("login@example.com", PASSWORD)
        .await
        .unwrap();

    let access = h.tokens.verify(&pair.access_token, TokenKind::Access).unwrap();
    let refresh = h.tokens.verify(&pair.refresh_token, TokenKind::Refresh).unwrap();
    assert_eq!(access.sub, account.id);
    assert_eq!(refresh.sub, account.id);
    assert_eq!(pair.token_type, "Bearer");
}

#[tokio::test]
async fn test_authenticate_failures() {
    let h = harness();
    h.service.register(signup("known@example.com")).await.unwrap();

    let wrong_password = h
        .service
        .authenticate("known@example.com", "not-the-password")
        .await;
    let unknown_email = h
        .service
        .authenticate("unknown@example.com", PASSWORD)
        .await;

    assert!(matches!(wrong_password, Err(AppError::InvalidCredentials)));
    assert!(matches!(unknown_email, Err(AppError::NotFound)));
}

#[tokio::test]
async fn test_password_change_switches_accepted_password() {
    let h = harness();
    let account = h.service.register(signup("rotate@example.com")).await.unwrap();

    let changes = AccountChanges {
        password: Some("rotated-password-2".to_string()),
        ..Default::default()
    };
    h.service.edit(account.id, PASSWORD, changes).await.unwrap();

    assert!(h
        .service
        .authenticate("rotate@example.com", "rotated-password-2")
        .await
        .is_ok());
    assert!(matches!(
        h.service.authenticate("rotate@example.com", PASSWORD).await,
        Err(AppError::InvalidCredentials)
    ));
}

#[tokio::test]
async fn test_edit_with_wrong_password_leaves_hash_unchanged() {
    let h = harness();
    let account = h.service.register(signup("guarded@example.com")).await.unwrap();

    let changes = AccountChanges {
        password: Some("attacker-password".to_string()),
        name: Some("Attacker".to_string()),
        ..Default::default()
    };
    let result = h.service.edit(account.id, "guess-password", changes).await;

    assert!(matches!(result, Err(AppError::InvalidCredentials)));
    let stored = h.service.get(account.id).await.unwrap();
    assert_eq!(stored.password_hash, account.password_hash);
    assert_eq!(stored.name, "Support Agent");
}

#[tokio::test]
async fn test_edit_missing_account() {
    let h = harness();

    let result = h
        .service
        .edit(Uuid::new_v4(), PASSWORD, AccountChanges::default())
        .await;

    assert!(matches!(result, Err(AppError::NotFound)));
}

#[tokio::test]
async fn test_edit_applies_profile_and_email() {
    let h = harness();
    let account = h.service.register(signup("before@example.com")).await.unwrap();

    let Some(profile) = json!({ "team": "escalations" }).as_object().cloned() else {
        panic!("literal is an object");
    };
    let changes = AccountChanges {
        email: Some("after@example.com".to_string()),
        profile: Some(profile),
        ..Default::default()
    };
    let updated = h.service.edit(account.id, PASSWORD, changes).await.unwrap();

    assert_eq!(updated.email, "after@example.com");
    assert_eq!(updated.profile["team"], "escalations");
    assert!(h.service.authenticate("after@example.com", PASSWORD).await.is_ok());
}

#[tokio::test]
async fn test_edit_to_taken_email_is_duplicate() {
    let h = harness();
    h.service.register(signup("owner@example.com")).await.unwrap();
    let other = h.service.register(signup("other@example.com")).await.unwrap();

    let changes = AccountChanges {
        email: Some("owner@example.com".to_string()),
        ..Default::default()
    };
    let result = h.service.edit(other.id, PASSWORD, changes).await;

    assert!(matches!(result, Err(AppError::DuplicateEmail)));
}

#[tokio::test]
async fn test_remove_then_get_is_not_found() {
    let h = harness();
    let account = h.service.register(signup("leaving@example.com")).await.unwrap();

    let removed = h.service.remove(account.id).await.unwrap();

    assert_eq!(removed.id, account.id);
    assert!(matches!(h.service.get(account.id).await, Err(AppError::NotFound)));
    assert!(matches!(h.service.remove(account.id).await, Err(AppError::NotFound)));
}

#[tokio::test]
async fn test_remove_unknown_is_not_found() {
    let h = harness();
    assert!(matches!(
        h.service.remove(Uuid::new_v4()).await,
        Err(AppError::NotFound)
    ));
}

#[tokio::test]
async fn test_only_hash_is_stored() {
    let h = harness();
    let mut profile = Profile::new();
    profile.insert("shift".to_string(), json!("night"));
    let account = h
        .service
        .register(signup("hash@example.com").with_profile(profile))
        .await
        .unwrap();

    let fetched = h.service.get(account.id).await.unwrap();

    assert_ne!(fetched.password_hash, PASSWORD);
    assert!(!fetched.password_hash.contains(PASSWORD));
    assert!(h.hasher.verify(PASSWORD, &fetched.password_hash).await.unwrap());

    let exposed = serde_json::to_string(&AccountResponse::from(&fetched)).unwrap();
    assert!(!exposed.contains(&fetched.password_hash));
    assert_eq!(fetched.profile["shift"], "night");
}

#[tokio::test]
async fn test_refresh_issues_new_pair() {
    let h = harness();
    let account = h.service.register(signup("refresh@example.com")).await.unwrap();
    let pair = h
        .service
        .authenticate("refresh@example.com", PASSWORD)
        .await
        .unwrap();

    let renewed = h.service.refresh(&pair.refresh_token).await.unwrap();

    assert_eq!(h.service.verify_access(&renewed.access_token).unwrap().sub, account.id);
}

#[tokio::test]
async fn test_refresh_rejects_access_token_and_removed_accounts() {
    let h = harness();
    let account = h.service.register(signup("revoked@example.com")).await.unwrap();
    let pair = h
        .service
        .authenticate("revoked@example.com", PASSWORD)
        .await
        .unwrap();

    assert!(matches!(
        h.service.refresh(&pair.access_token).await,
        Err(AppError::InvalidToken)
    ));

    h.service.remove(account.id).await.unwrap();
    assert!(matches!(
        h.service.refresh(&pair.refresh_token).await,
        Err(AppError::NotFound)
    ));
}

#[tokio::test]
async fn test_verify_access_rejects_refresh_token() {
    let h = harness();
    h.service.register(signup("kinds@example.com")).await.unwrap();
    let pair = h
        .service
        .authenticate("kinds@example.com", PASSWORD)
        .await
        .unwrap();

    assert!(matches!(
        h.service.verify_access(&pair.refresh_token),
        Err(AppError::InvalidToken)
    ));
}

#[tokio::test]
async fn test_register_rejects_invalid_input() {
    let h = harness();

    let result = h
        .service
        .register(NewAccount::new("not-an-email", PASSWORD, "Agent"))
        .await;

    assert!(matches!(result, Err(AppError::Validation(_))));
}
