//! Analytics value objects
//!
//! These are the normalized, provider-agnostic results produced by the
//! aggregation engine. `WebsiteAnalytics` and `SocialAnalytics` live inside
//! cache entries; `CombinedAnalytics` is always derived fresh from the two.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Inclusive UTC date range for website report queries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopPage {
    pub path: String,
    pub title: String,
    pub views: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrafficSource {
    pub source: String,
    pub visitors: i64,
    /// Share of total visitors, 0-100.
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceShare {
    pub device: String,
    /// Share of sessions, 0-100.
    pub percentage: f64,
}

/// One day of the trailing website performance trend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebsiteTrendPoint {
    pub date: NaiveDate,
    pub visitors: i64,
    pub page_views: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebsiteAnalytics {
    pub visitors: i64,
    pub page_views: i64,
    /// Fraction in [0, 1].
    pub bounce_rate: f64,
    /// Seconds.
    pub avg_session_duration: f64,
    /// Fraction; completed goal events over sessions, 0 when no sessions.
    pub conversion_rate: f64,
    pub top_pages: Vec<TopPage>,
    pub traffic_sources: Vec<TrafficSource>,
    pub devices: Vec<DeviceShare>,
    /// Always exactly 7 points, oldest first, zero-filled.
    pub trend: Vec<WebsiteTrendPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopPost {
    pub media_id: String,
    /// Caption excerpt, truncated for display.
    pub caption: String,
    pub permalink: String,
    pub likes: i64,
    pub comments: i64,
    /// Percentage; unclamped, can exceed 100 for viral content.
    pub engagement_rate: f64,
    /// Unix timestamp of the post.
    pub posted_at: i64,
}

/// One day of the trailing engagement trend (likes + comments).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SocialTrendPoint {
    pub date: NaiveDate,
    pub engagement: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentTypeShare {
    pub media_type: String,
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SocialAnalytics {
    pub followers: i64,
    pub follower_growth: i64,
    pub total_likes: i64,
    pub total_comments: i64,
    /// Percentage; mean of per-post rates across the fetched window.
    pub engagement_rate: f64,
    /// Always exactly 7 points, oldest first, zero-filled.
    pub trend: Vec<SocialTrendPoint>,
    pub top_posts: Vec<TopPost>,
    pub content_types: Vec<ContentTypeShare>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentSource {
    Website,
    Social,
}

/// Cross-source ranked content entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombinedTopContent {
    pub source: ContentSource,
    pub title: String,
    /// Page path for website entries, permalink for social entries.
    pub reference: String,
    /// View count for website entries, likes+comments for social entries.
    /// The two are compared raw, without renormalizing to a common scale.
    pub performance: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombinedTrendPoint {
    pub date: NaiveDate,
    pub website_visitors: i64,
    pub social_engagement: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombinedOverview {
    pub total_visitors: i64,
    pub total_followers: i64,
    pub avg_engagement_rate: f64,
    /// visitors + followers.
    pub total_reach: i64,
    pub conversion_rate: f64,
}

/// Derived merge of a website and a social result. Never cached on its own
/// so its two inputs cannot drift apart in staleness.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombinedAnalytics {
    pub overview: CombinedOverview,
    pub trend: Vec<CombinedTrendPoint>,
    pub top_content: Vec<CombinedTopContent>,
}
