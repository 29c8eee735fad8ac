//! Account manager lifecycle tests: registration, sync isolation,
//! credential refresh, and status checks.

mod common;

use std::sync::atomic::Ordering;
use std::sync::Arc;

use chrono::Utc;

use brandlens::accounts::AccountManager;
use brandlens::error::EngineError;
use brandlens::providers::SocialProvider;
use brandlens::storage::Storage;

use common::{account_info, media_item, new_account, sqlite_storage, MockSocialProvider};

fn manager(
    storage: &Arc<dyn Storage>,
    provider: MockSocialProvider,
) -> (AccountManager, Arc<MockSocialProvider>) {
    let provider = Arc::new(provider);
    let manager = AccountManager::new(
        Arc::clone(storage),
        Arc::clone(&provider) as Arc<dyn SocialProvider>,
    );
    (manager, provider)
}

#[tokio::test]
async fn register_validates_credential_before_writing() {
    let storage = sqlite_storage().await;
    let provider = MockSocialProvider::new(account_info(1000), vec![]).failing_for("bad-token");
    let (manager, _) = manager(&storage, provider);

    let err = manager
        .register_account("B1", "acme", "bad-token", None)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidCredential));

    // Validation failure performs no write.
    assert!(storage.list_active_accounts("B1").await.unwrap().is_empty());
}

#[tokio::test]
async fn register_persists_account_and_runs_initial_sync() {
    let storage = sqlite_storage().await;
    let media = vec![media_item("m1", 10, 1, 0), media_item("m2", 5, 0, 1)];
    let provider = MockSocialProvider::new(account_info(1000), media);
    let (manager, _) = manager(&storage, provider);

    let account = manager
        .register_account("B1", "acme", "good-token", Some("refresh"))
        .await
        .unwrap();

    assert!(account.is_active);
    assert_eq!(account.account_kind, "business");
    assert!(account.last_synced_at.is_some());
    assert!(account.last_error.is_none());
    assert_eq!(storage.count_content(account.id).await.unwrap(), 2);
}

#[tokio::test]
async fn failed_initial_sync_does_not_roll_back_registration() {
    let storage = sqlite_storage().await;
    // Validation succeeds; only the media fetch fails.
    let provider = Arc::new(MediaOnlyFailure(MockSocialProvider::new(
        account_info(1000),
        vec![],
    )));
    let manager = AccountManager::new(
        Arc::clone(&storage),
        Arc::clone(&provider) as Arc<dyn SocialProvider>,
    );

    let account = manager
        .register_account("B1", "acme", "half-token", None)
        .await
        .unwrap();

    assert!(account.is_active);
    assert!(account.last_synced_at.is_none());
    assert!(account.last_error.is_some());
}

/// Wrapper that fails only the media fetch, never validation.
struct MediaOnlyFailure(MockSocialProvider);

#[async_trait::async_trait]
impl SocialProvider for MediaOnlyFailure {
    async fn fetch_account_info(
        &self,
        _access_token: &str,
    ) -> brandlens::providers::ProviderResult<brandlens::providers::SocialAccountInfo> {
        Ok(self.0.info.clone())
    }

    async fn fetch_recent_media(
        &self,
        _access_token: &str,
        _limit: usize,
    ) -> brandlens::providers::ProviderResult<Vec<brandlens::providers::SocialMediaItem>> {
        Err(brandlens::providers::ProviderError::Unavailable(
            "provider returned status 500".into(),
        ))
    }

    async fn refresh_token(
        &self,
        refresh_token: &str,
    ) -> brandlens::providers::ProviderResult<brandlens::providers::TokenRefresh> {
        self.0.refresh_token(refresh_token).await
    }
}

#[tokio::test]
async fn syncing_twice_does_not_duplicate_content() {
    let storage = sqlite_storage().await;
    let media = vec![media_item("m1", 10, 1, 0), media_item("m2", 5, 0, 1)];
    let provider = MockSocialProvider::new(account_info(1000), media);
    let (manager, _) = manager(&storage, provider);

    let account = storage
        .insert_account(&new_account("B1", "acme", "tok"))
        .await
        .unwrap();

    manager.sync_content("B1", true).await.unwrap();
    manager.sync_content("B1", true).await.unwrap();

    assert_eq!(storage.count_content(account.id).await.unwrap(), 2);
}

#[tokio::test]
async fn one_failing_account_does_not_abort_the_others() {
    let storage = sqlite_storage().await;
    let media = vec![media_item("m1", 10, 1, 0)];
    let provider = MockSocialProvider::new(account_info(1000), media).failing_for("broken");
    let (manager, _) = manager(&storage, provider);

    let good = storage
        .insert_account(&new_account("B1", "good", "tok-good"))
        .await
        .unwrap();
    let bad = storage
        .insert_account(&new_account("B1", "bad", "broken"))
        .await
        .unwrap();

    let report = manager.sync_content("B1", true).await.unwrap();

    assert_eq!(report.synced_count(), 1);
    assert_eq!(report.failed_count(), 1);

    let good = storage.get_account(good.id).await.unwrap().unwrap();
    assert!(good.last_synced_at.is_some());
    assert!(good.last_error.is_none());

    let bad = storage.get_account(bad.id).await.unwrap().unwrap();
    assert!(bad.last_synced_at.is_none());
    assert!(bad.last_error.is_some());
}

#[tokio::test]
async fn non_forced_sync_respects_cooldown() {
    let storage = sqlite_storage().await;
    let provider = MockSocialProvider::new(account_info(1000), vec![media_item("m", 1, 0, 0)]);
    let (manager, provider) = manager(&storage, provider);

    let account = storage
        .insert_account(&new_account("B1", "acme", "tok"))
        .await
        .unwrap();
    storage
        .record_sync_success(account.id, Utc::now().timestamp())
        .await
        .unwrap();

    let report = manager.sync_content("B1", false).await.unwrap();
    assert_eq!(report.synced_count(), 0);
    assert_eq!(provider.media_calls.load(Ordering::SeqCst), 0);

    let report = manager.sync_content("B1", true).await.unwrap();
    assert_eq!(report.synced_count(), 1);
    assert_eq!(provider.media_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn deactivation_is_idempotent() {
    let storage = sqlite_storage().await;
    let provider = MockSocialProvider::new(account_info(1000), vec![]);
    let (manager, _) = manager(&storage, provider);

    let account = storage
        .insert_account(&new_account("B1", "acme", "tok"))
        .await
        .unwrap();

    manager.deactivate_account(account.id).await.unwrap();
    // Second deactivation is a no-op success.
    manager.deactivate_account(account.id).await.unwrap();
    assert!(storage.list_active_accounts("B1").await.unwrap().is_empty());

    // The row survives as a soft-deleted record.
    let row = storage.get_account(account.id).await.unwrap().unwrap();
    assert!(!row.is_active);

    let err = manager.deactivate_account(9999).await.unwrap_err();
    assert!(matches!(err, EngineError::NotFound(_)));
}

#[tokio::test]
async fn refresh_rotates_tokens() {
    let storage = sqlite_storage().await;
    let provider = MockSocialProvider::new(account_info(1000), vec![]);
    let (manager, _) = manager(&storage, provider);

    let account = storage
        .insert_account(&new_account("B1", "acme", "tok"))
        .await
        .unwrap();

    let refreshed = manager.refresh_credential(account.id).await.unwrap();
    assert_eq!(refreshed.access_token, "rotated-refresh-tok");
    assert!(refreshed.last_error.is_none());
}

#[tokio::test]
async fn refresh_failure_records_error_and_propagates() {
    let storage = sqlite_storage().await;
    let provider = MockSocialProvider::new(account_info(1000), vec![]);
    provider.refresh_ok.store(false, Ordering::SeqCst);
    let (manager, _) = manager(&storage, provider);

    let account = storage
        .insert_account(&new_account("B1", "acme", "tok"))
        .await
        .unwrap();

    let err = manager.refresh_credential(account.id).await.unwrap_err();
    assert!(matches!(err, EngineError::ProviderUnavailable(_)));

    // Error recorded, account not deactivated.
    let row = storage.get_account(account.id).await.unwrap().unwrap();
    assert!(row.last_error.is_some());
    assert!(row.is_active);
}

#[tokio::test]
async fn status_short_circuits_on_locally_expired_token() {
    let storage = sqlite_storage().await;
    let provider = MockSocialProvider::new(account_info(1000), vec![]);
    let (manager, provider) = manager(&storage, provider);

    let mut expired = new_account("B1", "acme", "tok");
    expired.token_expires_at = Utc::now().timestamp() - 60;
    let account = storage.insert_account(&expired).await.unwrap();

    let status = manager.check_account_status(account.id).await.unwrap();
    assert!(status.connected);
    assert!(!status.token_valid);
    // No provider round-trip for a locally expired token.
    assert_eq!(provider.info_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn status_checks_live_credential_when_not_expired() {
    let storage = sqlite_storage().await;
    let provider = MockSocialProvider::new(account_info(1000), vec![]);
    let (manager, provider) = manager(&storage, provider);

    let account = storage
        .insert_account(&new_account("B1", "acme", "tok"))
        .await
        .unwrap();

    let status = manager.check_account_status(account.id).await.unwrap();
    assert!(status.connected);
    assert!(status.token_valid);
    assert_eq!(provider.info_calls.load(Ordering::SeqCst), 1);
}
