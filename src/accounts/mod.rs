//! Social account lifecycle management
//!
//! Registration validates the credential against the provider before any
//! write. Content sync walks every active account of a brand and isolates
//! per-account failures: one account's provider error is recorded on that
//! account and never aborts the others.

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tracing::{info, warn};

use crate::engine::policy::{DEFAULT_TOKEN_LIFETIME, RECENT_MEDIA_LIMIT, SYNC_COOLDOWN};
use crate::error::{EngineError, EngineResult};
use crate::models::{ContentRecord, NewSocialAccount, SocialAccount};
use crate::providers::{ProviderError, SocialMediaItem, SocialProvider};
use crate::storage::Storage;

/// Connection status for one account, combining local expiry inspection
/// with a live provider check.
#[derive(Debug, Clone, Serialize)]
pub struct AccountStatus {
    pub connected: bool,
    pub token_valid: bool,
    pub last_sync: Option<i64>,
    pub error: Option<String>,
}

/// Outcome of syncing one account.
#[derive(Debug, Clone, Serialize)]
pub struct AccountSyncOutcome {
    pub account_id: i64,
    pub username: String,
    pub synced: bool,
    /// Items upserted; 0 when skipped or failed.
    pub items: u64,
    pub error: Option<String>,
}

/// Success envelope for a brand-wide sync. Individual account failures are
/// reported here, never raised.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SyncReport {
    pub outcomes: Vec<AccountSyncOutcome>,
}

impl SyncReport {
    pub fn synced_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.synced).count()
    }

    pub fn failed_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.error.is_some()).count()
    }
}

pub struct AccountManager {
    storage: Arc<dyn Storage>,
    provider: Arc<dyn SocialProvider>,
}

impl AccountManager {
    pub fn new(storage: Arc<dyn Storage>, provider: Arc<dyn SocialProvider>) -> Self {
        Self { storage, provider }
    }

    /// Active accounts for a brand, possibly empty.
    pub async fn list_accounts(&self, brand_id: &str) -> EngineResult<Vec<SocialAccount>> {
        Ok(self.storage.list_active_accounts(brand_id).await?)
    }

    /// Register a new social account for a brand.
    ///
    /// The credential is validated with a single provider read; validation
    /// failure writes nothing. On success the account is persisted active
    /// and an initial content sync runs best-effort: a sync failure is
    /// recorded as the account's last_error and does not roll back the
    /// registration.
    pub async fn register_account(
        &self,
        brand_id: &str,
        username: &str,
        access_token: &str,
        refresh_token: Option<&str>,
    ) -> EngineResult<SocialAccount> {
        let info = self
            .provider
            .fetch_account_info(access_token)
            .await
            .map_err(|err| match err {
                ProviderError::InvalidCredential => EngineError::InvalidCredential,
                other => other.into(),
            })?;

        let account_kind = match info.account_type.as_deref() {
            Some("creator") => "creator",
            _ => "business",
        };

        let new_account = NewSocialAccount {
            brand_id: brand_id.to_string(),
            username: username.to_string(),
            account_id: info.id.clone(),
            access_token: access_token.to_string(),
            refresh_token: refresh_token.map(str::to_string),
            token_expires_at: Utc::now().timestamp() + DEFAULT_TOKEN_LIFETIME.as_secs() as i64,
            account_kind: account_kind.to_string(),
        };

        let account = self.storage.insert_account(&new_account).await?;
        info!(
            brand_id,
            account_id = account.id,
            username, "registered social account"
        );

        // Initial sync is best-effort; the registration stands either way.
        match self.sync_account(&account).await {
            Ok(_) => {
                self.storage
                    .record_sync_success(account.id, Utc::now().timestamp())
                    .await?;
            }
            Err(err) => {
                warn!(
                    account_id = account.id,
                    error = %err,
                    "initial content sync failed after registration"
                );
                self.storage
                    .record_account_error(account.id, &err.to_string())
                    .await?;
            }
        }

        self.storage
            .get_account(account.id)
            .await?
            .ok_or_else(|| EngineError::NotFound(format!("account {}", account.id)))
    }

    /// Soft-delete an account. Idempotent: deactivating an inactive account
    /// is a no-op success; only an unknown id is an error.
    pub async fn deactivate_account(&self, account_id: i64) -> EngineResult<()> {
        if self.storage.get_account(account_id).await?.is_none() {
            return Err(EngineError::NotFound(format!("account {account_id}")));
        }
        self.storage.deactivate_account(account_id).await?;
        info!(account_id, "deactivated social account");
        Ok(())
    }

    /// Sync recent content for every active account of a brand.
    ///
    /// Returns a success envelope describing per-account outcomes; a single
    /// account's failure never propagates. Without `force`, accounts synced
    /// within the cooldown window are skipped.
    pub async fn sync_content(&self, brand_id: &str, force: bool) -> EngineResult<SyncReport> {
        let accounts = self.storage.list_active_accounts(brand_id).await?;
        let now = Utc::now().timestamp();
        let cooldown = SYNC_COOLDOWN.as_secs() as i64;

        let mut report = SyncReport::default();
        for account in accounts {
            if !force {
                if let Some(last) = account.last_synced_at {
                    if now - last < cooldown {
                        report.outcomes.push(AccountSyncOutcome {
                            account_id: account.id,
                            username: account.username.clone(),
                            synced: false,
                            items: 0,
                            error: None,
                        });
                        continue;
                    }
                }
            }

            match self.sync_account(&account).await {
                Ok(items) => {
                    self.storage
                        .record_sync_success(account.id, Utc::now().timestamp())
                        .await?;
                    report.outcomes.push(AccountSyncOutcome {
                        account_id: account.id,
                        username: account.username.clone(),
                        synced: true,
                        items,
                        error: None,
                    });
                }
                Err(err) => {
                    // Failure is isolated to this account; last_synced_at
                    // stays untouched.
                    warn!(
                        account_id = account.id,
                        error = %err,
                        "content sync failed for account"
                    );
                    self.storage
                        .record_account_error(account.id, &err.to_string())
                        .await?;
                    report.outcomes.push(AccountSyncOutcome {
                        account_id: account.id,
                        username: account.username.clone(),
                        synced: false,
                        items: 0,
                        error: Some(err.to_string()),
                    });
                }
            }
        }

        Ok(report)
    }

    /// Exchange the refresh credential for a new token pair.
    ///
    /// On failure the error is recorded on the account and re-raised; the
    /// account is never deactivated here. Whether repeated failures warrant
    /// deactivation is the caller's decision.
    pub async fn refresh_credential(&self, account_id: i64) -> EngineResult<SocialAccount> {
        let account = self
            .storage
            .get_account(account_id)
            .await?
            .ok_or_else(|| EngineError::NotFound(format!("account {account_id}")))?;

        let refresh_token = account
            .refresh_token
            .as_deref()
            .ok_or(EngineError::InvalidCredential)?;

        match self.provider.refresh_token(refresh_token).await {
            Ok(refreshed) => {
                self.storage
                    .update_tokens(
                        account_id,
                        &refreshed.access_token,
                        refreshed.refresh_token.as_deref(),
                        refreshed.expires_at,
                    )
                    .await?;
                info!(account_id, "refreshed social account credential");
                self.storage
                    .get_account(account_id)
                    .await?
                    .ok_or_else(|| EngineError::NotFound(format!("account {account_id}")))
            }
            Err(err) => {
                self.storage
                    .record_account_error(account_id, &err.to_string())
                    .await?;
                Err(err.into())
            }
        }
    }

    /// Combined local and live status check. A locally-expired token short
    /// circuits to invalid without a provider round-trip.
    pub async fn check_account_status(&self, account_id: i64) -> EngineResult<AccountStatus> {
        let account = self
            .storage
            .get_account(account_id)
            .await?
            .ok_or_else(|| EngineError::NotFound(format!("account {account_id}")))?;

        if !account.is_active {
            return Ok(AccountStatus {
                connected: false,
                token_valid: false,
                last_sync: account.last_synced_at,
                error: account.last_error,
            });
        }

        if account.token_expires_at <= Utc::now().timestamp() {
            return Ok(AccountStatus {
                connected: true,
                token_valid: false,
                last_sync: account.last_synced_at,
                error: Some("access token expired".to_string()),
            });
        }

        match self.provider.fetch_account_info(&account.access_token).await {
            Ok(_) => Ok(AccountStatus {
                connected: true,
                token_valid: true,
                last_sync: account.last_synced_at,
                error: account.last_error,
            }),
            Err(err) => Ok(AccountStatus {
                connected: true,
                token_valid: false,
                last_sync: account.last_synced_at,
                error: Some(err.to_string()),
            }),
        }
    }

    /// Fetch recent media for one account and upsert it into content
    /// tracking. Returns the number of items written.
    async fn sync_account(&self, account: &SocialAccount) -> EngineResult<u64> {
        let media = self
            .provider
            .fetch_recent_media(&account.access_token, RECENT_MEDIA_LIMIT)
            .await?;

        let records: Vec<ContentRecord> = media.iter().map(content_record).collect();
        let written = self.storage.upsert_content(account.id, &records).await?;
        Ok(written)
    }
}

fn content_record(item: &SocialMediaItem) -> ContentRecord {
    ContentRecord {
        media_id: item.id.clone(),
        media_type: item.media_type.clone(),
        caption: item.caption.clone(),
        permalink: item.permalink.clone(),
        thumbnail_url: item.thumbnail_url.clone(),
        posted_at: item.timestamp.timestamp(),
        like_count: item.like_count,
        comment_count: item.comments_count,
    }
}
