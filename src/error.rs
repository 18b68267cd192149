//! Error types for the recommendation pipeline and the HTTP surface.
//!
//! Provider failures are classified so callers can decide which fallback
//! tier to take; nothing in this module retries anything itself.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Failures from an external provider call or its output handling.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// A required credential is not configured.
    #[error("missing credential: {0} is not set")]
    MissingCredential(&'static str),

    /// The request exceeded the client's hard timeout.
    #[error("{provider} request timed out after {seconds}s")]
    Timeout { provider: &'static str, seconds: u64 },

    /// 401/403 from the provider. Never retried against the same provider.
    #[error("{provider} rejected the request (status {status}): check API credentials")]
    Auth { provider: &'static str, status: u16 },

    /// Any other non-2xx response, with the response body for diagnostics.
    #[error("{provider} returned status {status}: {body}")]
    Http {
        provider: &'static str,
        status: u16,
        body: String,
    },

    /// The model explicitly declined to answer. Distinct from a parse
    /// failure so callers never blindly retry the same prompt.
    #[error("model declined the request: {0}")]
    Refusal(String),

    /// Structured output failed both the direct parse and the raw-text
    /// fragment scan.
    #[error("structured output failed to parse: {reason} (preview: {preview})")]
    SchemaParse { reason: String, preview: String },

    /// Transport-level failure (DNS, connect, TLS, body read).
    #[error("network error calling {provider}: {source}")]
    Network {
        provider: &'static str,
        #[source]
        source: reqwest::Error,
    },
}

impl ProviderError {
    /// Classify a reqwest error, distinguishing client-side timeouts.
    pub fn from_reqwest(provider: &'static str, timeout_secs: u64, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ProviderError::Timeout {
                provider,
                seconds: timeout_secs,
            }
        } else {
            ProviderError::Network {
                provider,
                source: err,
            }
        }
    }

    /// Classify a non-success HTTP status.
    pub fn from_status(provider: &'static str, status: u16, body: String) -> Self {
        match status {
            401 | 403 => ProviderError::Auth { provider, status },
            _ => ProviderError::Http {
                provider,
                status,
                body,
            },
        }
    }
}

/// Errors surfaced to HTTP callers. Everything else in the pipeline
/// degrades to a 200 with simulated results and a note.
#[derive(Debug, Error)]
pub enum ApiError {
    /// A required request parameter is absent (400).
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),

    /// Unrecoverable server misconfiguration, e.g. a missing API key (500).
    #[error("{0}")]
    Configuration(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self {
            ApiError::MissingParameter(_) => StatusCode::BAD_REQUEST,
            ApiError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

/// Result type for API handlers.
pub type ApiResult<T> = Result<T, ApiError>;
