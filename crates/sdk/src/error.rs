//! Error types for the UNHCR SDK.

use serde::{Deserialize, Serialize};

/// Result type for SDK operations.
pub type UnhcrResult<T> = Result<T, UnhcrError>;

/// Error types that can occur when calling the UNHCR API.
///
/// Every variant that comes back from a request describes the same thing, an
/// upstream request that failed. [`UnhcrError::status`] gives the HTTP status
/// when the failure happened after a response was received.
#[derive(Debug, thiserror::Error)]
pub enum UnhcrError {
    /// HTTP request failed before a usable response was received.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned a non-success status.
    #[error("API error (status {status}): {message}")]
    Api {
        status: u16,
        message: String,
        details: Option<String>,
    },

    /// API returned a success status with a body that is not JSON.
    #[error("Invalid JSON response (status {status}): {source}")]
    InvalidBody {
        status: u16,
        #[source]
        source: serde_json::Error,
    },

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl UnhcrError {
    /// HTTP status associated with this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http(e) => e.status().map(|s| s.as_u16()),
            Self::Api { status, .. } | Self::InvalidBody { status, .. } => Some(*status),
            Self::Config(_) | Self::InvalidUrl(_) => None,
        }
    }

    /// Create an API error from a status code and response body.
    pub fn from_response(status: u16, body: &str) -> Self {
        // Try to parse as ErrorResponse
        if let Ok(error_response) = serde_json::from_str::<ErrorResponse>(body) {
            Self::Api {
                status,
                message: error_response.message,
                details: error_response.details,
            }
        } else {
            Self::Api {
                status,
                message: body.trim().to_string(),
                details: None,
            }
        }
    }
}

/// Error body as the UNHCR API reports it on 4xx/5xx responses.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    #[serde(alias = "error")]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}
