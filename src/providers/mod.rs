//! External provider clients
//!
//! Each provider exposes a narrow read API behind a trait so the engine and
//! tests can inject their own implementations. The HTTP implementations
//! validate provider JSON into typed DTOs at the boundary; nothing loosely
//! typed crosses into the domain model.

pub mod social;
pub mod website;

use thiserror::Error;

pub use social::{HttpSocialProvider, SocialAccountInfo, SocialMediaItem, SocialProvider, TokenRefresh};
pub use website::{
    HttpWebsiteProvider, ReportDailyRow, ReportDeviceRow, ReportPageRow, ReportSourceRow,
    WebsiteProvider, WebsiteReport,
};

#[derive(Debug, Error)]
pub enum ProviderError {
    /// Request exceeded the client timeout.
    #[error("provider request timed out")]
    Timeout,

    /// Provider rejected the credential (401/403).
    #[error("provider rejected the credential")]
    InvalidCredential,

    /// Transport failure or non-success status.
    #[error("provider unavailable: {0}")]
    Unavailable(String),

    /// Response did not match the expected shape.
    #[error("malformed provider response: {0}")]
    Malformed(String),
}

pub type ProviderResult<T> = Result<T, ProviderError>;

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            return ProviderError::Timeout;
        }
        if err.is_decode() {
            return ProviderError::Malformed(err.to_string());
        }
        ProviderError::Unavailable(err.to_string())
    }
}

impl From<ProviderError> for crate::error::EngineError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::Timeout => crate::error::EngineError::ProviderTimeout,
            ProviderError::InvalidCredential => crate::error::EngineError::InvalidCredential,
            ProviderError::Unavailable(msg) => crate::error::EngineError::ProviderUnavailable(msg),
            ProviderError::Malformed(msg) => crate::error::EngineError::ProviderUnavailable(msg),
        }
    }
}

/// Map a non-success HTTP status to a provider error.
pub(crate) fn status_error(status: reqwest::StatusCode) -> ProviderError {
    if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
        ProviderError::InvalidCredential
    } else {
        ProviderError::Unavailable(format!("provider returned status {status}"))
    }
}
