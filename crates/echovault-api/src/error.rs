//! Error types for the API client.

use thiserror::Error;

/// Errors that can occur when talking to the EchoVault API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Authentication failed or no session is present.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Resource not found.
    #[error("not found: {resource}/{id}")]
    NotFound { resource: String, id: String },

    /// Rate limited.
    #[error("rate limited{}", match retry_after_secs {
        Some(secs) => format!(" (retry after {}s)", secs),
        None => String::new(),
    })]
    RateLimited {
        /// Seconds to wait before retrying (from Retry-After header, optional).
        retry_after_secs: Option<u64>,
    },

    /// Structured error from the server.
    #[error("API error: {error} - {message}")]
    Api { error: String, message: String },

    /// Response the client could not make sense of.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}
