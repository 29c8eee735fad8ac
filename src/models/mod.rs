pub mod account;
pub mod analytics;

pub use account::{AnalyticsConfig, ContentRecord, NewSocialAccount, SocialAccount};
pub use analytics::{
    CombinedAnalytics, CombinedOverview, CombinedTopContent, CombinedTrendPoint, ContentSource,
    ContentTypeShare, DateRange, DeviceShare, SocialAnalytics, SocialTrendPoint, TopPage, TopPost,
    TrafficSource, WebsiteAnalytics, WebsiteTrendPoint,
};
