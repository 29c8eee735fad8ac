//! Shared fixtures: in-memory storage plus scriptable provider doubles.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Days, Utc};

use brandlens::models::{DateRange, NewSocialAccount};
use brandlens::providers::{
    ProviderError, ProviderResult, SocialAccountInfo, SocialMediaItem, SocialProvider,
    TokenRefresh, WebsiteProvider, WebsiteReport,
};
use brandlens::storage::{SqliteStorage, Storage};

pub async fn sqlite_storage() -> Arc<dyn Storage> {
    // One connection so the in-memory database is shared.
    let storage = SqliteStorage::new("sqlite::memory:", 1).await.unwrap();
    storage.init().await.unwrap();
    Arc::new(storage)
}

pub fn trailing_range() -> DateRange {
    let today = Utc::now().date_naive();
    DateRange {
        start_date: today.checked_sub_days(Days::new(6)).unwrap(),
        end_date: today,
    }
}

pub fn sample_report() -> WebsiteReport {
    serde_json::from_value(serde_json::json!({
        "sessions": 1000,
        "visitors": 800,
        "page_views": 3000,
        "bounce_rate": 0.42,
        "avg_session_duration": 95.0,
        "conversions": 20,
        "pages": [
            {"path": "/pricing", "title": "Pricing", "views": 900},
            {"path": "/", "title": "Home", "views": 1200}
        ],
        "daily": []
    }))
    .unwrap()
}

pub fn account_info(followers: i64) -> SocialAccountInfo {
    serde_json::from_value(serde_json::json!({
        "id": "17841400000000000",
        "username": "acme",
        "followers_count": followers,
        "follows_count": 12,
        "media_count": 40,
        "account_type": "business"
    }))
    .unwrap()
}

/// A media item posted at noon UTC, `days_ago` days before today.
pub fn media_item(id: &str, likes: i64, comments: i64, days_ago: u64) -> SocialMediaItem {
    let day = Utc::now().date_naive().checked_sub_days(Days::new(days_ago)).unwrap();
    let ts = day.and_hms_opt(12, 0, 0).unwrap().and_utc();
    serde_json::from_value(serde_json::json!({
        "id": id,
        "media_type": "IMAGE",
        "caption": format!("post {id}"),
        "permalink": format!("https://social.example/p/{id}"),
        "timestamp": ts.to_rfc3339(),
        "like_count": likes,
        "comments_count": comments
    }))
    .unwrap()
}

pub fn new_account(brand_id: &str, username: &str, token: &str) -> NewSocialAccount {
    NewSocialAccount {
        brand_id: brand_id.to_string(),
        username: username.to_string(),
        account_id: format!("acct-{username}"),
        access_token: token.to_string(),
        refresh_token: Some(format!("refresh-{token}")),
        token_expires_at: Utc::now().timestamp() + 3600,
        account_kind: "business".to_string(),
    }
}

pub struct MockWebsiteProvider {
    pub report: WebsiteReport,
    pub calls: AtomicUsize,
    pub fail_with_timeout: AtomicBool,
}

impl MockWebsiteProvider {
    pub fn new(report: WebsiteReport) -> Self {
        Self {
            report,
            calls: AtomicUsize::new(0),
            fail_with_timeout: AtomicBool::new(false),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl WebsiteProvider for MockWebsiteProvider {
    async fn fetch_report(
        &self,
        _property_id: &str,
        _range: &DateRange,
    ) -> ProviderResult<WebsiteReport> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_with_timeout.load(Ordering::SeqCst) {
            return Err(ProviderError::Timeout);
        }
        Ok(self.report.clone())
    }
}

pub struct MockSocialProvider {
    pub info: SocialAccountInfo,
    pub media: Vec<SocialMediaItem>,
    pub info_calls: AtomicUsize,
    pub media_calls: AtomicUsize,
    /// Tokens whose calls fail with `Unavailable`.
    pub failing_tokens: Vec<String>,
    pub fail_with_timeout: AtomicBool,
    pub refresh_ok: AtomicBool,
}

impl MockSocialProvider {
    pub fn new(info: SocialAccountInfo, media: Vec<SocialMediaItem>) -> Self {
        Self {
            info,
            media,
            info_calls: AtomicUsize::new(0),
            media_calls: AtomicUsize::new(0),
            failing_tokens: Vec::new(),
            fail_with_timeout: AtomicBool::new(false),
            refresh_ok: AtomicBool::new(true),
        }
    }

    pub fn failing_for(mut self, token: &str) -> Self {
        self.failing_tokens.push(token.to_string());
        self
    }
}

#[async_trait]
impl SocialProvider for MockSocialProvider {
    async fn fetch_account_info(&self, access_token: &str) -> ProviderResult<SocialAccountInfo> {
        self.info_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_with_timeout.load(Ordering::SeqCst) {
            return Err(ProviderError::Timeout);
        }
        if self.failing_tokens.iter().any(|t| t == access_token) {
            return Err(ProviderError::InvalidCredential);
        }
        Ok(self.info.clone())
    }

    async fn fetch_recent_media(
        &self,
        access_token: &str,
        limit: usize,
    ) -> ProviderResult<Vec<SocialMediaItem>> {
        self.media_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_with_timeout.load(Ordering::SeqCst) {
            return Err(ProviderError::Timeout);
        }
        if self.failing_tokens.iter().any(|t| t == access_token) {
            return Err(ProviderError::Unavailable("provider returned status 500".into()));
        }
        Ok(self.media.iter().take(limit).cloned().collect())
    }

    async fn refresh_token(&self, refresh_token: &str) -> ProviderResult<TokenRefresh> {
        if !self.refresh_ok.load(Ordering::SeqCst) {
            return Err(ProviderError::Unavailable("refresh rejected".into()));
        }
        Ok(TokenRefresh {
            access_token: format!("rotated-{refresh_token}"),
            refresh_token: Some(format!("next-{refresh_token}")),
            expires_at: Utc::now().timestamp() + 3600,
        })
    }
}
