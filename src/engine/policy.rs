//! Named policy constants
//!
//! Central declarations so tests can assert on them directly instead of
//! chasing inline literals.

use std::time::Duration;

/// TTL applied to every cached analytics payload. Owned by the engine, not
/// the cache store.
pub const ANALYTICS_CACHE_TTL: Duration = Duration::from_secs(60 * 60);

/// Upper bound on every provider call issued by the engine.
pub const PROVIDER_TIMEOUT: Duration = Duration::from_secs(10);

/// Ranked pages kept from a website report.
pub const TOP_PAGES_LIMIT: usize = 20;

/// Recent content items requested from the social provider.
pub const RECENT_MEDIA_LIMIT: usize = 20;

/// Ranked posts kept in a social analytics result.
pub const TOP_POSTS_LIMIT: usize = 10;

/// Entries taken from each source when building the cross-source ranking.
pub const TOP_CONTENT_PER_SOURCE: usize = 5;

/// Overall size of the cross-source ranking.
pub const COMBINED_TOP_LIMIT: usize = 10;

/// Length of every trend series, in trailing UTC days.
pub const TREND_DAYS: usize = 7;

/// Divisor for per-post engagement when the account reports no followers.
/// A placeholder policy; only the rate's shape (non-negative, finite) is
/// contractual.
pub const ASSUMED_AUDIENCE_SIZE: i64 = 1000;

/// Caption excerpt length for ranked posts, in characters.
pub const CAPTION_EXCERPT_CHARS: usize = 100;

/// Non-forced syncs skip accounts synced more recently than this.
pub const SYNC_COOLDOWN: Duration = Duration::from_secs(15 * 60);

/// Assumed access-token lifetime at registration, when the provider does
/// not report one.
pub const DEFAULT_TOKEN_LIFETIME: Duration = Duration::from_secs(60 * 60 * 24 * 60);

/// Placeholder traffic-source split applied when the provider report has no
/// source breakdown. Percentages sum to 100.
pub const FALLBACK_TRAFFIC_SPLIT: &[(&str, f64)] = &[
    ("Organic Search", 40.0),
    ("Direct", 25.0),
    ("Social", 20.0),
    ("Referral", 15.0),
];

/// Placeholder device split applied when the provider report has no device
/// breakdown. Percentages sum to 100.
pub const FALLBACK_DEVICE_SPLIT: &[(&str, f64)] = &[
    ("Mobile", 55.0),
    ("Desktop", 35.0),
    ("Tablet", 10.0),
];
