//! Analytics aggregation engine
//!
//! Orchestrates cache-first reads against the two providers, transforms raw
//! payloads into the domain model, and composes the combined view. The only
//! mandated concurrency is the two-way fan-out inside
//! `get_combined_analytics`; everything else runs sequentially.

pub mod combined;
pub mod policy;

mod social;
mod website;

use std::sync::Arc;

use anyhow::Context;
use chrono::{Days, NaiveDate, Utc};
use serde_json::Value;
use tracing::{debug, warn};

use crate::cache::{AnalyticsCache, DataKind};
use crate::error::{EngineError, EngineResult};
use crate::models::{CombinedAnalytics, DateRange, SocialAnalytics, WebsiteAnalytics};
use crate::providers::{SocialProvider, WebsiteProvider};
use crate::storage::Storage;

pub use combined::build_combined;
pub use policy::*;

pub struct AnalyticsEngine {
    storage: Arc<dyn Storage>,
    website: Arc<dyn WebsiteProvider>,
    social: Arc<dyn SocialProvider>,
    cache: Arc<AnalyticsCache>,
}

impl AnalyticsEngine {
    pub fn new(
        storage: Arc<dyn Storage>,
        website: Arc<dyn WebsiteProvider>,
        social: Arc<dyn SocialProvider>,
        cache: Arc<AnalyticsCache>,
    ) -> Self {
        Self {
            storage,
            website,
            social,
            cache,
        }
    }

    pub fn cache(&self) -> &AnalyticsCache {
        &self.cache
    }

    /// Cache-first website analytics for a brand over a date range.
    pub async fn get_website_analytics(
        &self,
        brand_id: &str,
        range: &DateRange,
    ) -> EngineResult<WebsiteAnalytics> {
        if let Some(hit) = self.cached(brand_id, DataKind::Website) {
            debug!(brand_id, "website analytics served from cache");
            return Ok(hit);
        }

        let config = self
            .storage
            .get_config(brand_id)
            .await?
            .filter(|c| c.tracking_enabled)
            .ok_or(EngineError::ConfigurationMissing)?;

        let report = tokio::time::timeout(
            policy::PROVIDER_TIMEOUT,
            self.website.fetch_report(&config.property_id, range),
        )
        .await
        .map_err(|_| EngineError::ProviderTimeout)??;

        let analytics = website::build_website_analytics(&report, Utc::now().date_naive());
        self.store(brand_id, DataKind::Website, &analytics)?;
        Ok(analytics)
    }

    /// Cache-first social analytics for the brand's single active account.
    pub async fn get_social_analytics(&self, brand_id: &str) -> EngineResult<SocialAnalytics> {
        if let Some(hit) = self.cached(brand_id, DataKind::Social) {
            debug!(brand_id, "social analytics served from cache");
            return Ok(hit);
        }

        let accounts = self.storage.list_active_accounts(brand_id).await?;
        let account = accounts.first().ok_or(EngineError::NoLinkedAccount)?;

        let info = tokio::time::timeout(
            policy::PROVIDER_TIMEOUT,
            self.social.fetch_account_info(&account.access_token),
        )
        .await
        .map_err(|_| EngineError::ProviderTimeout)??;

        let media = tokio::time::timeout(
            policy::PROVIDER_TIMEOUT,
            self.social
                .fetch_recent_media(&account.access_token, policy::RECENT_MEDIA_LIMIT),
        )
        .await
        .map_err(|_| EngineError::ProviderTimeout)??;

        let analytics = social::build_social_analytics(&info, &media, Utc::now().date_naive());
        self.store(brand_id, DataKind::Social, &analytics)?;
        Ok(analytics)
    }

    /// Fetch website and social results concurrently and compose the
    /// combined view. The first failure from either branch propagates and
    /// no partial result is returned; callers needing graceful degradation
    /// call the two single-source reads themselves.
    pub async fn get_combined_analytics(
        &self,
        brand_id: &str,
        range: &DateRange,
    ) -> EngineResult<CombinedAnalytics> {
        let (website, social) = tokio::try_join!(
            self.get_website_analytics(brand_id, range),
            self.get_social_analytics(brand_id),
        )?;

        Ok(build_combined(&website, &social))
    }

    /// Drop the brand's website cache entry and re-prime it.
    pub async fn refresh_website_analytics(
        &self,
        brand_id: &str,
        range: &DateRange,
    ) -> EngineResult<WebsiteAnalytics> {
        self.cache.invalidate(brand_id, DataKind::Website);
        self.get_website_analytics(brand_id, range).await
    }

    fn cached<T: serde::de::DeserializeOwned>(&self, brand_id: &str, kind: DataKind) -> Option<T> {
        let payload = self.cache.get(brand_id, kind)?;
        match serde_json::from_value(payload) {
            Ok(value) => Some(value),
            Err(err) => {
                // Shape drift across versions; treat as a miss.
                warn!(brand_id, ?kind, error = %err, "discarding undecodable cache entry");
                None
            }
        }
    }

    fn store<T: serde::Serialize>(&self, brand_id: &str, kind: DataKind, value: &T) -> EngineResult<()> {
        let payload: Value =
            serde_json::to_value(value).context("failed to serialize analytics payload")?;
        self.cache
            .put(brand_id, kind, payload, policy::ANALYTICS_CACHE_TTL);
        Ok(())
    }
}

/// Round to two decimal places at the output boundary. Never applied
/// mid-computation so rounding error cannot compound across trend points.
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// The 7 trailing UTC days ending at `today`, oldest first.
pub(crate) fn trailing_week(today: NaiveDate) -> Vec<NaiveDate> {
    (0..policy::TREND_DAYS as u64)
        .rev()
        .map(|back| today.checked_sub_days(Days::new(back)).unwrap_or(today))
        .collect()
}
