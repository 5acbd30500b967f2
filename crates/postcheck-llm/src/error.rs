//! Errors from a single provider call.
//!
//! Every variant describes why one chat completion did not produce a
//! decodable response. Callers that want to retry can ask
//! [`ProviderError::is_transient`] and [`ProviderError::retry_after`];
//! nothing in this crate retries on its own.

use std::time::Duration;

use thiserror::Error;

/// Why a provider call failed.
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Non-2xx response not covered by a more specific variant, or a 429
    /// whose body says the account is out of credits.
    #[error("request failed: {0}")]
    RequestFailed(String),

    /// HTTP 401/403. Carries the provider's message when it sent one.
    #[error("authentication failed: {0}")]
    AuthFailed(String),

    /// HTTP 429.
    #[error("rate limited: retry after {retry_after_ms}ms")]
    RateLimited {
        /// From the `retry-after` header or body; 1000 when neither says.
        retry_after_ms: u64,
    },

    /// HTTP 404, usually a misspelled model name.
    #[error("model not found: {0}")]
    ModelNotFound(String),

    /// No API key available for the provider.
    #[error("provider not configured: {0}")]
    NotConfigured(String),

    /// 2xx response whose body is not a chat completion.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// The client-side timeout elapsed.
    #[error("request timed out after {after_secs}s")]
    Timeout {
        /// Configured timeout for the provider.
        after_secs: u64,
    },

    /// Connection-level failure from reqwest.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
}

impl ProviderError {
    /// Whether the same request could succeed if sent again later.
    ///
    /// Auth, configuration, missing models and quota exhaustion are not
    /// transient.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::RateLimited { .. } | Self::Timeout { .. } => true,
            Self::Http(err) => err.is_connect() || err.is_request(),
            Self::RequestFailed(msg) => msg.starts_with("HTTP 5"),
            Self::AuthFailed(_)
            | Self::ModelNotFound(_)
            | Self::NotConfigured(_)
            | Self::InvalidResponse(_) => false,
        }
    }

    /// Provider-suggested wait before retrying, for rate limits.
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::RateLimited { retry_after_ms } => Some(Duration::from_millis(*retry_after_ms)),
            _ => None,
        }
    }
}

/// Result alias for provider operations.
pub type Result<T> = std::result::Result<T, ProviderError>;
