//! Social media transformation
//!
//! Pure functions from provider account info plus recent media to the
//! normalized `SocialAnalytics` value object. Engagement rates stay raw
//! fractions through the whole computation and are rounded to two decimal
//! places only when written into the output struct.

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::engine::policy::{ASSUMED_AUDIENCE_SIZE, CAPTION_EXCERPT_CHARS, TOP_POSTS_LIMIT};
use crate::engine::{round2, trailing_week};
use crate::models::{ContentTypeShare, SocialAnalytics, SocialTrendPoint, TopPost};
use crate::providers::{SocialAccountInfo, SocialMediaItem};

pub(crate) fn build_social_analytics(
    info: &SocialAccountInfo,
    media: &[SocialMediaItem],
    today: NaiveDate,
) -> SocialAnalytics {
    let audience = if info.followers_count > 0 {
        info.followers_count
    } else {
        ASSUMED_AUDIENCE_SIZE
    };

    let total_likes: i64 = media.iter().map(|m| m.like_count).sum();
    let total_comments: i64 = media.iter().map(|m| m.comments_count).sum();

    let raw_rates: Vec<f64> = media.iter().map(|m| engagement_rate(m, audience)).collect();
    let account_rate = if raw_rates.is_empty() {
        0.0
    } else {
        raw_rates.iter().sum::<f64>() / raw_rates.len() as f64
    };

    SocialAnalytics {
        followers: info.followers_count,
        // Growth needs follower snapshots over time, which nothing records
        // yet; reported as flat until a history source exists.
        follower_growth: 0,
        total_likes,
        total_comments,
        engagement_rate: round2(account_rate),
        trend: trend(media, today),
        top_posts: top_posts(media, audience),
        content_types: content_types(media),
    }
}

/// Per-post engagement as a raw percentage. Zero audience yields zero,
/// never NaN or infinity. Unclamped above 100.
fn engagement_rate(item: &SocialMediaItem, audience: i64) -> f64 {
    if audience <= 0 {
        return 0.0;
    }
    (item.like_count + item.comments_count) as f64 / audience as f64 * 100.0
}

/// Top posts by likes+comments descending, ties broken by most recent
/// timestamp first.
fn top_posts(media: &[SocialMediaItem], audience: i64) -> Vec<TopPost> {
    let mut ranked: Vec<&SocialMediaItem> = media.iter().collect();
    ranked.sort_by(|a, b| {
        let ea = a.like_count + a.comments_count;
        let eb = b.like_count + b.comments_count;
        eb.cmp(&ea).then_with(|| b.timestamp.cmp(&a.timestamp))
    });

    ranked
        .into_iter()
        .take(TOP_POSTS_LIMIT)
        .map(|item| TopPost {
            media_id: item.id.clone(),
            caption: excerpt(item.caption.as_deref().unwrap_or_default()),
            permalink: item.permalink.clone(),
            likes: item.like_count,
            comments: item.comments_count,
            engagement_rate: round2(engagement_rate(item, audience)),
            posted_at: item.timestamp.timestamp(),
        })
        .collect()
}

fn excerpt(caption: &str) -> String {
    caption.chars().take(CAPTION_EXCERPT_CHARS).collect()
}

/// Trailing 7-day engagement trend: media bucketed into UTC calendar days,
/// likes+comments summed per day, zero for days with no posts. Always
/// exactly 7 points.
fn trend(media: &[SocialMediaItem], today: NaiveDate) -> Vec<SocialTrendPoint> {
    let mut by_day: HashMap<NaiveDate, i64> = HashMap::new();
    for item in media {
        let day = item.timestamp.date_naive();
        *by_day.entry(day).or_insert(0) += item.like_count + item.comments_count;
    }

    trailing_week(today)
        .into_iter()
        .map(|date| SocialTrendPoint {
            date,
            engagement: by_day.get(&date).copied().unwrap_or(0),
        })
        .collect()
}

fn content_types(media: &[SocialMediaItem]) -> Vec<ContentTypeShare> {
    let mut counts: HashMap<&str, i64> = HashMap::new();
    for item in media {
        *counts.entry(item.media_type.as_str()).or_insert(0) += 1;
    }

    let mut shares: Vec<ContentTypeShare> = counts
        .into_iter()
        .map(|(media_type, count)| ContentTypeShare {
            media_type: media_type.to_string(),
            count,
        })
        .collect();
    shares.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| a.media_type.cmp(&b.media_type))
    });
    shares
}
