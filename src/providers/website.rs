use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde::Deserialize;

use crate::models::DateRange;
use crate::providers::{status_error, ProviderResult};

/// Raw website report as returned by the analytics provider, validated at
/// the boundary. Breakdown rows are optional; the engine substitutes a
/// declared placeholder split when the provider omits them.
#[derive(Debug, Clone, Deserialize)]
pub struct WebsiteReport {
    pub sessions: i64,
    pub visitors: i64,
    pub page_views: i64,
    /// Fraction in [0, 1].
    #[serde(default)]
    pub bounce_rate: f64,
    /// Seconds.
    #[serde(default)]
    pub avg_session_duration: f64,
    /// Completed goal events in the range.
    #[serde(default)]
    pub conversions: i64,
    #[serde(default)]
    pub pages: Vec<ReportPageRow>,
    #[serde(default)]
    pub traffic_sources: Option<Vec<ReportSourceRow>>,
    #[serde(default)]
    pub devices: Option<Vec<ReportDeviceRow>>,
    /// Daily rows covering the requested range; days may be missing.
    #[serde(default)]
    pub daily: Vec<ReportDailyRow>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReportPageRow {
    pub path: String,
    #[serde(default)]
    pub title: String,
    pub views: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReportSourceRow {
    pub source: String,
    pub visitors: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReportDeviceRow {
    pub device: String,
    /// Share of sessions, 0-100.
    pub percentage: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReportDailyRow {
    pub date: NaiveDate,
    pub visitors: i64,
    pub page_views: i64,
}

#[async_trait]
pub trait WebsiteProvider: Send + Sync {
    /// Fetch the raw report for a property over an inclusive date range.
    async fn fetch_report(&self, property_id: &str, range: &DateRange)
        -> ProviderResult<WebsiteReport>;
}

/// HTTP client for the website analytics provider.
pub struct HttpWebsiteProvider {
    client: Client,
    base_url: String,
}

impl HttpWebsiteProvider {
    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> Result<Self> {
        let mut headers = reqwest::header::HeaderMap::new();
        let mut auth = reqwest::header::HeaderValue::from_str(&format!("Bearer {api_key}"))
            .context("website provider API key contains invalid header characters")?;
        auth.set_sensitive(true);
        headers.insert(reqwest::header::AUTHORIZATION, auth);

        let client = Client::builder()
            .user_agent("brandlens/0.1.0")
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .context("failed to build HTTP client for website provider")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl WebsiteProvider for HttpWebsiteProvider {
    async fn fetch_report(
        &self,
        property_id: &str,
        range: &DateRange,
    ) -> ProviderResult<WebsiteReport> {
        let url = format!("{}/v1/properties/{}/report", self.base_url, property_id);
        let response = self
            .client
            .get(&url)
            .query(&[
                ("start_date", range.start_date.to_string()),
                ("end_date", range.end_date.to_string()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(status_error(status));
        }

        let report = response.json::<WebsiteReport>().await?;
        Ok(report)
    }
}
