//! Website report transformation
//!
//! Pure functions from a raw provider report to the normalized
//! `WebsiteAnalytics` value object. Date handling is UTC throughout; the
//! caller supplies "today" so the trailing trend window is testable.

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::engine::policy::{FALLBACK_DEVICE_SPLIT, FALLBACK_TRAFFIC_SPLIT, TOP_PAGES_LIMIT};
use crate::engine::{round2, trailing_week};
use crate::models::{DeviceShare, TopPage, TrafficSource, WebsiteAnalytics, WebsiteTrendPoint};
use crate::providers::WebsiteReport;

pub(crate) fn build_website_analytics(report: &WebsiteReport, today: NaiveDate) -> WebsiteAnalytics {
    WebsiteAnalytics {
        visitors: report.visitors,
        page_views: report.page_views,
        bounce_rate: round2(report.bounce_rate),
        avg_session_duration: report.avg_session_duration,
        conversion_rate: round2(conversion_rate(report.conversions, report.sessions)),
        top_pages: top_pages(report),
        traffic_sources: traffic_sources(report),
        devices: devices(report),
        trend: trend(report, today),
    }
}

/// Completed goal events over sessions; zero when there are no sessions,
/// never a division fault.
fn conversion_rate(conversions: i64, sessions: i64) -> f64 {
    if sessions <= 0 {
        return 0.0;
    }
    conversions as f64 / sessions as f64
}

/// Top pages by view count descending, ties broken by path so repeated
/// calls over identical input rank identically.
fn top_pages(report: &WebsiteReport) -> Vec<TopPage> {
    let mut pages: Vec<TopPage> = report
        .pages
        .iter()
        .map(|row| TopPage {
            path: row.path.clone(),
            title: row.title.clone(),
            views: row.views,
        })
        .collect();

    pages.sort_by(|a, b| b.views.cmp(&a.views).then_with(|| a.path.cmp(&b.path)));
    pages.truncate(TOP_PAGES_LIMIT);
    pages
}

fn traffic_sources(report: &WebsiteReport) -> Vec<TrafficSource> {
    match report.traffic_sources.as_deref() {
        Some(rows) if !rows.is_empty() => {
            let total: i64 = rows.iter().map(|r| r.visitors).sum();
            rows.iter()
                .map(|row| TrafficSource {
                    source: row.source.clone(),
                    visitors: row.visitors,
                    percentage: if total > 0 {
                        round2(row.visitors as f64 / total as f64 * 100.0)
                    } else {
                        0.0
                    },
                })
                .collect()
        }
        // Placeholder split when the provider reports no breakdown.
        _ => FALLBACK_TRAFFIC_SPLIT
            .iter()
            .map(|(source, share)| TrafficSource {
                source: source.to_string(),
                visitors: (report.visitors as f64 * share / 100.0).round() as i64,
                percentage: *share,
            })
            .collect(),
    }
}

fn devices(report: &WebsiteReport) -> Vec<DeviceShare> {
    match report.devices.as_deref() {
        Some(rows) if !rows.is_empty() => rows
            .iter()
            .map(|row| DeviceShare {
                device: row.device.clone(),
                percentage: round2(row.percentage),
            })
            .collect(),
        _ => FALLBACK_DEVICE_SPLIT
            .iter()
            .map(|(device, share)| DeviceShare {
                device: device.to_string(),
                percentage: *share,
            })
            .collect(),
    }
}

/// Trailing 7-day trend anchored at `today`, zero-filled for days the
/// report has no row.
fn trend(report: &WebsiteReport, today: NaiveDate) -> Vec<WebsiteTrendPoint> {
    let by_date: HashMap<NaiveDate, (i64, i64)> = report
        .daily
        .iter()
        .map(|row| (row.date, (row.visitors, row.page_views)))
        .collect();

    trailing_week(today)
        .into_iter()
        .map(|date| {
            let (visitors, page_views) = by_date.get(&date).copied().unwrap_or((0, 0));
            WebsiteTrendPoint {
                date,
                visitors,
                page_views,
            }
        })
        .collect()
}
