//! Combined view builder
//!
//! Pure merge of a website and a social result for the same brand. The two
//! trend series are each built over a trailing 7-day UTC window, but they
//! are cached independently, so a read straddling midnight can see windows
//! one day apart. The merge pairs by date on the website axis, never by
//! position.

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::engine::policy::{COMBINED_TOP_LIMIT, TOP_CONTENT_PER_SOURCE};
use crate::models::{
    CombinedAnalytics, CombinedOverview, CombinedTopContent, CombinedTrendPoint, ContentSource,
    SocialAnalytics, WebsiteAnalytics,
};

pub fn build_combined(website: &WebsiteAnalytics, social: &SocialAnalytics) -> CombinedAnalytics {
    CombinedAnalytics {
        overview: overview(website, social),
        trend: merged_trend(website, social),
        top_content: top_content(website, social),
    }
}

fn overview(website: &WebsiteAnalytics, social: &SocialAnalytics) -> CombinedOverview {
    CombinedOverview {
        total_visitors: website.visitors,
        total_followers: social.followers,
        avg_engagement_rate: social.engagement_rate,
        total_reach: website.visitors + social.followers,
        conversion_rate: website.conversion_rate,
    }
}

/// Pair the two trends on the website axis. A social series whose window
/// is shifted by a day contributes its overlapping days; days it does not
/// cover read as zero, the same as days without posts.
fn merged_trend(website: &WebsiteAnalytics, social: &SocialAnalytics) -> Vec<CombinedTrendPoint> {
    let social_by_date: HashMap<NaiveDate, i64> = social
        .trend
        .iter()
        .map(|point| (point.date, point.engagement))
        .collect();

    website
        .trend
        .iter()
        .map(|w| CombinedTrendPoint {
            date: w.date,
            website_visitors: w.visitors,
            social_engagement: social_by_date.get(&w.date).copied().unwrap_or(0),
        })
        .collect()
}

/// Top 5 website pages and top 5 social posts merged into one list, sorted
/// descending by the raw per-source performance number (view count vs.
/// likes+comments, not renormalized to a common scale) and truncated.
fn top_content(website: &WebsiteAnalytics, social: &SocialAnalytics) -> Vec<CombinedTopContent> {
    let mut entries: Vec<CombinedTopContent> = website
        .top_pages
        .iter()
        .take(TOP_CONTENT_PER_SOURCE)
        .map(|page| CombinedTopContent {
            source: ContentSource::Website,
            title: if page.title.is_empty() {
                page.path.clone()
            } else {
                page.title.clone()
            },
            reference: page.path.clone(),
            performance: page.views,
        })
        .collect();

    entries.extend(social.top_posts.iter().take(TOP_CONTENT_PER_SOURCE).map(|post| {
        CombinedTopContent {
            source: ContentSource::Social,
            title: post.caption.clone(),
            reference: post.permalink.clone(),
            performance: post.likes + post.comments,
        }
    }));

    entries.sort_by(|a, b| b.performance.cmp(&a.performance));
    entries.truncate(COMBINED_TOP_LIMIT);
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use crate::models::{SocialTrendPoint, TopPage, TopPost, WebsiteTrendPoint};

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn week() -> Vec<NaiveDate> {
        (23..=29).map(|d| date(&format!("2026-08-{d}"))).collect()
    }

    fn website() -> WebsiteAnalytics {
        WebsiteAnalytics {
            visitors: 800,
            page_views: 3000,
            bounce_rate: 0.4,
            avg_session_duration: 90.0,
            conversion_rate: 0.02,
            top_pages: (0..8)
                .map(|i| TopPage {
                    path: format!("/p{i}"),
                    title: format!("Page {i}"),
                    views: 1000 - i * 100,
                })
                .collect(),
            traffic_sources: vec![],
            devices: vec![],
            trend: week()
                .into_iter()
                .map(|d| WebsiteTrendPoint {
                    date: d,
                    visitors: 10,
                    page_views: 20,
                })
                .collect(),
        }
    }

    fn social() -> SocialAnalytics {
        SocialAnalytics {
            followers: 5000,
            follower_growth: 0,
            total_likes: 900,
            total_comments: 100,
            engagement_rate: 3.5,
            trend: week()
                .into_iter()
                .map(|d| SocialTrendPoint {
                    date: d,
                    engagement: 5,
                })
                .collect(),
            top_posts: (0..8)
                .map(|i| TopPost {
                    media_id: format!("m{i}"),
                    caption: format!("Post {i}"),
                    permalink: format!("https://social.example/m{i}"),
                    likes: 950 - i * 100,
                    comments: 0,
                    engagement_rate: 1.0,
                    posted_at: 0,
                })
                .collect(),
            content_types: vec![],
        }
    }

    #[test]
    fn overview_arithmetic() {
        let combined = build_combined(&website(), &social());
        assert_eq!(combined.overview.total_reach, 5800);
        assert_eq!(combined.overview.total_visitors, 800);
        assert_eq!(combined.overview.total_followers, 5000);
        assert_eq!(combined.overview.conversion_rate, 0.02);
        assert_eq!(combined.overview.avg_engagement_rate, 3.5);
    }

    #[test]
    fn merged_trend_pairs_by_date() {
        let combined = build_combined(&website(), &social());
        assert_eq!(combined.trend.len(), 7);
        for point in &combined.trend {
            assert_eq!(point.website_visitors, 10);
            assert_eq!(point.social_engagement, 5);
        }
        assert_eq!(combined.trend[6].date, date("2026-08-29"));
    }

    #[test]
    fn top_content_interleaves_both_sources() {
        let combined = build_combined(&website(), &social());

        assert_eq!(combined.top_content.len(), 10);
        // Website pages: 1000, 900, ... Social posts: 950, 850, ...
        assert_eq!(combined.top_content[0].performance, 1000);
        assert_eq!(combined.top_content[0].source, ContentSource::Website);
        assert_eq!(combined.top_content[1].performance, 950);
        assert_eq!(combined.top_content[1].source, ContentSource::Social);

        // Sorted descending throughout.
        for pair in combined.top_content.windows(2) {
            assert!(pair[0].performance >= pair[1].performance);
        }
    }

    #[test]
    fn merged_trend_follows_website_dates_when_social_window_lags() {
        // Social result cached before midnight: its window ends one day
        // before the website's.
        let mut lagging = social();
        for point in &mut lagging.trend {
            point.date = point.date.pred_opt().unwrap();
        }

        let combined = build_combined(&website(), &lagging);

        assert_eq!(combined.trend.len(), 7);
        assert_eq!(combined.trend[6].date, date("2026-08-29"));
        // Overlapping days pair by date; the day the social window does
        // not cover reads as zero.
        assert_eq!(combined.trend[0].social_engagement, 5);
        assert_eq!(combined.trend[6].social_engagement, 0);
        assert!(combined.trend.iter().all(|p| p.website_visitors == 10));
    }

    #[test]
    fn top_content_takes_five_per_source() {
        let combined = build_combined(&website(), &social());
        let websites = combined
            .top_content
            .iter()
            .filter(|e| e.source == ContentSource::Website)
            .count();
        assert_eq!(websites, 5);
    }
}
