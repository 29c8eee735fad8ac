use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{Days, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::accounts::{AccountManager, AccountStatus, SyncReport};
use crate::engine::{policy, AnalyticsEngine};
use crate::error::EngineError;
use crate::models::{
    CombinedAnalytics, DateRange, SocialAccount, SocialAnalytics, WebsiteAnalytics,
};

pub struct AppState {
    pub engine: Arc<AnalyticsEngine>,
    pub accounts: Arc<AccountManager>,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Serialize)]
pub struct SuccessResponse {
    pub message: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn error_response(err: EngineError) -> ApiError {
    let status = match &err {
        EngineError::InvalidCredential => StatusCode::BAD_REQUEST,
        EngineError::NoLinkedAccount => StatusCode::NOT_FOUND,
        EngineError::NotFound(_) => StatusCode::NOT_FOUND,
        EngineError::ConfigurationMissing => StatusCode::NOT_FOUND,
        EngineError::ProviderTimeout => StatusCode::GATEWAY_TIMEOUT,
        EngineError::ProviderUnavailable(_) => StatusCode::BAD_GATEWAY,
        EngineError::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (
        status,
        Json(ErrorResponse {
            error: err.to_string(),
        }),
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricsSelector {
    Website,
    Social,
    #[default]
    All,
}

#[derive(Deserialize)]
pub struct AnalyticsQuery {
    pub brand_id: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub metrics: MetricsSelector,
}

/// Per-source analytics envelope. Only the `all` path degrades gracefully:
/// a failed source is reported in its error field while the other is still
/// returned. `combined` is present only when both sources succeeded.
#[derive(Serialize)]
pub struct AnalyticsResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<WebsiteAnalytics>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website_error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub social: Option<SocialAnalytics>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub social_error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub combined: Option<CombinedAnalytics>,
}

fn requested_range(query: &AnalyticsQuery) -> DateRange {
    let today = Utc::now().date_naive();
    let default_start = today
        .checked_sub_days(Days::new(policy::TREND_DAYS as u64 - 1))
        .unwrap_or(today);
    DateRange {
        start_date: query.start_date.unwrap_or(default_start),
        end_date: query.end_date.unwrap_or(today),
    }
}

/// Fetch analytics for a brand: website, social, or both.
pub async fn get_analytics(
    State(state): State<Arc<AppState>>,
    Query(query): Query<AnalyticsQuery>,
) -> Result<Json<AnalyticsResponse>, ApiError> {
    let range = requested_range(&query);

    match query.metrics {
        MetricsSelector::Website => {
            let website = state
                .engine
                .get_website_analytics(&query.brand_id, &range)
                .await
                .map_err(error_response)?;
            Ok(Json(AnalyticsResponse {
                website: Some(website),
                website_error: None,
                social: None,
                social_error: None,
                combined: None,
            }))
        }
        MetricsSelector::Social => {
            let social = state
                .engine
                .get_social_analytics(&query.brand_id)
                .await
                .map_err(error_response)?;
            Ok(Json(AnalyticsResponse {
                website: None,
                website_error: None,
                social: Some(social),
                social_error: None,
                combined: None,
            }))
        }
        MetricsSelector::All => {
            let (website, social) = tokio::join!(
                state.engine.get_website_analytics(&query.brand_id, &range),
                state.engine.get_social_analytics(&query.brand_id),
            );

            let (website, website_error) = match website {
                Ok(w) => (Some(w), None),
                Err(e) => (None, Some(e.to_string())),
            };
            let (social, social_error) = match social {
                Ok(s) => (Some(s), None),
                Err(e) => (None, Some(e.to_string())),
            };

            let combined = match (&website, &social) {
                (Some(w), Some(s)) => Some(crate::engine::build_combined(w, s)),
                _ => None,
            };

            Ok(Json(AnalyticsResponse {
                website,
                website_error,
                social,
                social_error,
                combined,
            }))
        }
    }
}

#[derive(Deserialize)]
pub struct SyncRequest {
    pub brand_id: String,
    #[serde(default)]
    pub force_sync: bool,
}

#[derive(Serialize)]
pub struct WebsiteRefreshSummary {
    pub refreshed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Per-source sync summary. Neither source's failure aborts the other.
#[derive(Serialize)]
pub struct SyncResponse {
    pub social: SyncReport,
    pub website: WebsiteRefreshSummary,
}

/// Trigger a content sync and a website cache refresh for a brand.
pub async fn sync_analytics(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<SyncRequest>,
) -> Result<Json<SyncResponse>, ApiError> {
    let social = state
        .accounts
        .sync_content(&payload.brand_id, payload.force_sync)
        .await
        .map_err(error_response)?;

    // A successful sync supersedes any cached social result.
    if social.synced_count() > 0 {
        state
            .engine
            .cache()
            .invalidate(&payload.brand_id, crate::cache::DataKind::Social);
    }

    let today = Utc::now().date_naive();
    let range = DateRange {
        start_date: today
            .checked_sub_days(Days::new(policy::TREND_DAYS as u64 - 1))
            .unwrap_or(today),
        end_date: today,
    };
    let website = match state
        .engine
        .refresh_website_analytics(&payload.brand_id, &range)
        .await
    {
        Ok(_) => WebsiteRefreshSummary {
            refreshed: true,
            error: None,
        },
        Err(e) => WebsiteRefreshSummary {
            refreshed: false,
            error: Some(e.to_string()),
        },
    };

    Ok(Json(SyncResponse { social, website }))
}

#[derive(Deserialize)]
pub struct ListAccountsQuery {
    pub brand_id: String,
}

pub async fn list_accounts(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListAccountsQuery>,
) -> Result<Json<Vec<SocialAccount>>, ApiError> {
    let accounts = state
        .accounts
        .list_accounts(&query.brand_id)
        .await
        .map_err(error_response)?;
    Ok(Json(accounts))
}

#[derive(Deserialize)]
pub struct RegisterAccountRequest {
    pub brand_id: String,
    pub username: String,
    pub access_token: String,
    pub refresh_token: Option<String>,
}

pub async fn register_account(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RegisterAccountRequest>,
) -> Result<(StatusCode, Json<SocialAccount>), ApiError> {
    if payload.access_token.is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "access_token cannot be empty".to_string(),
            }),
        ));
    }

    let account = state
        .accounts
        .register_account(
            &payload.brand_id,
            &payload.username,
            &payload.access_token,
            payload.refresh_token.as_deref(),
        )
        .await
        .map_err(error_response)?;

    Ok((StatusCode::CREATED, Json(account)))
}

pub async fn deactivate_account(
    State(state): State<Arc<AppState>>,
    Path(account_id): Path<i64>,
) -> Result<Json<SuccessResponse>, ApiError> {
    state
        .accounts
        .deactivate_account(account_id)
        .await
        .map_err(error_response)?;

    Ok(Json(SuccessResponse {
        message: "Account deactivated".to_string(),
    }))
}

pub async fn refresh_account(
    State(state): State<Arc<AppState>>,
    Path(account_id): Path<i64>,
) -> Result<Json<SocialAccount>, ApiError> {
    let account = state
        .accounts
        .refresh_credential(account_id)
        .await
        .map_err(error_response)?;

    Ok(Json(account))
}

pub async fn account_status(
    State(state): State<Arc<AppState>>,
    Path(account_id): Path<i64>,
) -> Result<Json<AccountStatus>, ApiError> {
    let status = state
        .accounts
        .check_account_status(account_id)
        .await
        .map_err(error_response)?;

    Ok(Json(status))
}

/// Health check endpoint
pub async fn health_check() -> Json<SuccessResponse> {
    Json(SuccessResponse {
        message: "OK".to_string(),
    })
}
