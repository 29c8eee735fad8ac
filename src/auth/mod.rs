//! API key gate for the analytics API.
//!
//! Requests present their key in the `X-API-Key` header. The gate is open
//! when auth is disabled in config, and also when it is enabled with no
//! keys configured yet, so a fresh checkout is usable before any key has
//! been provisioned.

use axum::{
    extract::Request,
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;

use crate::config::AuthConfig;

pub struct AuthService {
    keys: Vec<String>,
}

impl AuthService {
    pub fn from_config(config: &AuthConfig) -> Self {
        let keys = if config.enabled {
            config.api_keys.clone()
        } else {
            Vec::new()
        };
        Self { keys }
    }

    /// True when no keys are in force and every request is admitted.
    pub fn is_open(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn validate_key(&self, key: &str) -> bool {
        self.is_open() || self.keys.iter().any(|k| k == key)
    }
}

pub async fn auth_middleware(
    auth: Arc<AuthService>,
    headers: HeaderMap,
    request: Request,
    next: Next,
) -> Response {
    let presented = headers
        .get("X-API-Key")
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();

    if auth.validate_key(presented) {
        next.run(request).await
    } else {
        (StatusCode::UNAUTHORIZED, "invalid or missing API key").into_response()
    }
}
