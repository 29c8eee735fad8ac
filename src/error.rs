use thiserror::Error;

/// Error taxonomy for the analytics engine and account manager.
///
/// `ProviderTimeout` and `ProviderUnavailable` are transient and safe to
/// retry with backoff at the caller layer; this engine does not retry.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Credential rejected by the provider; not retryable without new
    /// credentials.
    #[error("invalid credential")]
    InvalidCredential,

    /// Brand has no active social account linked.
    #[error("no linked social account for brand")]
    NoLinkedAccount,

    /// Provider call exceeded its time bound.
    #[error("provider request timed out")]
    ProviderTimeout,

    #[error("provider unavailable: {0}")]
    ProviderUnavailable(String),

    #[error("not found: {0}")]
    NotFound(String),

    /// Brand has no analytics configuration for website tracking.
    #[error("website tracking is not configured for this brand")]
    ConfigurationMissing,

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type EngineResult<T> = Result<T, EngineError>;
