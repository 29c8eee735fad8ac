use crate::models::{AnalyticsConfig, ContentRecord, NewSocialAccount, SocialAccount};
use anyhow::Result;
use async_trait::async_trait;

/// Persistence for analytics configs, social accounts, and synced content.
///
/// Accounts are soft-deleted only; `deactivate_account` flips `is_active`
/// and keeps the row for audit history. Content records are keyed by
/// `(account_id, media_id)` so repeated syncs upsert instead of duplicating.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Initialize the storage (create tables, etc.)
    async fn init(&self) -> Result<()>;

    // --- analytics config ---

    async fn upsert_config(&self, config: &AnalyticsConfig) -> Result<()>;

    async fn get_config(&self, brand_id: &str) -> Result<Option<AnalyticsConfig>>;

    // --- social accounts ---

    async fn insert_account(&self, account: &NewSocialAccount) -> Result<SocialAccount>;

    async fn get_account(&self, account_id: i64) -> Result<Option<SocialAccount>>;

    /// Active accounts for a brand, oldest first.
    async fn list_active_accounts(&self, brand_id: &str) -> Result<Vec<SocialAccount>>;

    /// Soft delete. Returns false when the account does not exist;
    /// deactivating an already-inactive account is a no-op success.
    async fn deactivate_account(&self, account_id: i64) -> Result<bool>;

    async fn update_tokens(
        &self,
        account_id: i64,
        access_token: &str,
        refresh_token: Option<&str>,
        token_expires_at: i64,
    ) -> Result<()>;

    /// Set `last_synced_at` and clear `last_error`.
    async fn record_sync_success(&self, account_id: i64, synced_at: i64) -> Result<()>;

    /// Record `last_error`, leaving `last_synced_at` untouched.
    async fn record_account_error(&self, account_id: i64, error: &str) -> Result<()>;

    // --- content tracking ---

    /// Upsert synced content items for an account. Returns the number of
    /// items written.
    async fn upsert_content(&self, account_id: i64, items: &[ContentRecord]) -> Result<u64>;

    async fn count_content(&self, account_id: i64) -> Result<i64>;
}
