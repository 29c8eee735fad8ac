use axum::{
    middleware,
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use crate::auth::{auth_middleware, AuthService};

use super::handlers::{
    account_status, deactivate_account, get_analytics, health_check, list_accounts,
    refresh_account, register_account, sync_analytics, AppState,
};

pub fn create_api_router(state: Arc<AppState>, auth_service: Arc<AuthService>) -> Router {
    let protected_routes = Router::new()
        .route("/api/analytics", get(get_analytics))
        .route("/api/analytics/sync", post(sync_analytics))
        .route("/api/social-accounts", get(list_accounts))
        .route("/api/social-accounts", post(register_account))
        .route("/api/social-accounts/{id}", delete(deactivate_account))
        .route("/api/social-accounts/{id}/refresh", post(refresh_account))
        .route("/api/social-accounts/{id}/status", get(account_status))
        .route_layer(middleware::from_fn(move |headers, req, next| {
            let auth = Arc::clone(&auth_service);
            auth_middleware(auth, headers, req, next)
        }))
        .with_state(state);

    Router::new()
        .route("/health", get(health_check))
        .merge(protected_routes)
        .layer(CorsLayer::permissive())
}
