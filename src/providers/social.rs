use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;

use crate::providers::{status_error, ProviderResult};

/// Account-level info returned by the social provider.
#[derive(Debug, Clone, Deserialize)]
pub struct SocialAccountInfo {
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub followers_count: i64,
    #[serde(default)]
    pub follows_count: i64,
    #[serde(default)]
    pub media_count: i64,
    /// `business` or `creator`; absent on older API versions.
    #[serde(default)]
    pub account_type: Option<String>,
}

/// One recent content item from the social provider.
#[derive(Debug, Clone, Deserialize)]
pub struct SocialMediaItem {
    pub id: String,
    pub media_type: String,
    #[serde(default)]
    pub caption: Option<String>,
    pub permalink: String,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub like_count: i64,
    #[serde(default)]
    pub comments_count: i64,
}

/// Result of exchanging a refresh credential.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenRefresh {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// Unix timestamp at which the new access token expires.
    pub expires_at: i64,
}

#[async_trait]
pub trait SocialProvider: Send + Sync {
    async fn fetch_account_info(&self, access_token: &str) -> ProviderResult<SocialAccountInfo>;

    /// Most recent content items, newest first, up to `limit`.
    async fn fetch_recent_media(
        &self,
        access_token: &str,
        limit: usize,
    ) -> ProviderResult<Vec<SocialMediaItem>>;

    async fn refresh_token(&self, refresh_token: &str) -> ProviderResult<TokenRefresh>;
}

/// HTTP client for the social media provider's graph-style API.
pub struct HttpSocialProvider {
    client: Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct MediaEnvelope {
    data: Vec<SocialMediaItem>,
}

#[derive(Debug, Deserialize)]
struct RefreshEnvelope {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    /// Seconds until expiry, as the provider reports it.
    expires_in: i64,
}

impl HttpSocialProvider {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent("brandlens/0.1.0")
            .timeout(timeout)
            .build()
            .context("failed to build HTTP client for social provider")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl SocialProvider for HttpSocialProvider {
    async fn fetch_account_info(&self, access_token: &str) -> ProviderResult<SocialAccountInfo> {
        let url = format!("{}/me", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[
                (
                    "fields",
                    "id,username,followers_count,follows_count,media_count,account_type",
                ),
                ("access_token", access_token),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(status_error(status));
        }

        Ok(response.json::<SocialAccountInfo>().await?)
    }

    async fn fetch_recent_media(
        &self,
        access_token: &str,
        limit: usize,
    ) -> ProviderResult<Vec<SocialMediaItem>> {
        let url = format!("{}/me/media", self.base_url);
        let limit = limit.to_string();
        let response = self
            .client
            .get(&url)
            .query(&[
                (
                    "fields",
                    "id,media_type,caption,permalink,thumbnail_url,timestamp,like_count,comments_count",
                ),
                ("limit", limit.as_str()),
                ("access_token", access_token),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(status_error(status));
        }

        let envelope = response.json::<MediaEnvelope>().await?;
        Ok(envelope.data)
    }

    async fn refresh_token(&self, refresh_token: &str) -> ProviderResult<TokenRefresh> {
        let url = format!("{}/refresh_access_token", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[
                ("grant_type", "refresh_token"),
                ("access_token", refresh_token),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(status_error(status));
        }

        let envelope = response.json::<RefreshEnvelope>().await?;
        Ok(TokenRefresh {
            access_token: envelope.access_token,
            refresh_token: envelope.refresh_token,
            expires_at: Utc::now().timestamp() + envelope.expires_in,
        })
    }
}
