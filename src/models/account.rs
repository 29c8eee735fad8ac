use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Per-brand website tracking configuration. One row per brand.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AnalyticsConfig {
    pub brand_id: String,
    /// External website-property identifier at the analytics provider.
    pub property_id: String,
    pub tracking_enabled: bool,
}

/// A brand's linked social account.
///
/// Accounts are never hard-deleted; deactivation flips `is_active` and keeps
/// the row for audit history. At most one active account per brand is used
/// for analytics reads.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SocialAccount {
    pub id: i64,
    pub brand_id: String,
    pub username: String,
    /// Provider-side account identifier.
    pub account_id: String,
    #[serde(skip_serializing)]
    pub access_token: String,
    #[serde(skip_serializing)]
    pub refresh_token: Option<String>,
    /// Unix timestamp after which the access token is considered expired.
    pub token_expires_at: i64,
    /// `business` or `creator`.
    pub account_kind: String,
    pub is_active: bool,
    pub last_synced_at: Option<i64>,
    pub last_error: Option<String>,
}

/// Fields required to insert a new social account row.
#[derive(Debug, Clone)]
pub struct NewSocialAccount {
    pub brand_id: String,
    pub username: String,
    pub account_id: String,
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub token_expires_at: i64,
    pub account_kind: String,
}

/// A synced content item, keyed by the provider's media id so repeated
/// syncs upsert instead of duplicating.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ContentRecord {
    pub media_id: String,
    pub media_type: String,
    pub caption: Option<String>,
    pub permalink: String,
    pub thumbnail_url: Option<String>,
    /// Unix timestamp of the post.
    pub posted_at: i64,
    pub like_count: i64,
    pub comment_count: i64,
}
