//! tabmonitor error types

use std::time::Duration;

/// tabmonitor error types
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    // Request errors
    /// A required request field was absent. The only failure reported to
    /// callers as `success: false`.
    #[error("missing required field '{0}' in request body")]
    InputMissing(&'static str),

    #[error("could not normalize URL '{url}': {reason}")]
    NormalizationFailed { url: String, reason: String },

    // Provider/network errors
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("rate limited, retry after {retry_after:?}")]
    RateLimited { retry_after: Option<Duration> },

    #[error("authentication failed")]
    AuthenticationFailed,

    #[error("model not found: {0}")]
    ModelNotFound(String),

    #[error("no provider configured")]
    NoProvider,

    // Soft errors
    #[error("empty response from model")]
    EmptyResponse,

    // Data errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // Storage errors
    #[error("persistence error: {0}")]
    Persistence(String),

    // Configuration errors
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl RelayError {
    /// Whether this error came from the analysis provider (or its absence).
    ///
    /// Provider errors never reach callers; the analyzer substitutes a
    /// canned response instead.
    pub fn is_provider_error(&self) -> bool {
        matches!(
            self,
            RelayError::Http(_)
                | RelayError::Api { .. }
                | RelayError::RateLimited { .. }
                | RelayError::AuthenticationFailed
                | RelayError::ModelNotFound(_)
                | RelayError::NoProvider
                | RelayError::EmptyResponse
                | RelayError::Json(_)
        )
    }
}

/// Result type alias for tabmonitor operations
pub type Result<T> = std::result::Result<T, RelayError>;
