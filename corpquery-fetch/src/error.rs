//! Fetch error types.

use reqwest::StatusCode;
use thiserror::Error;

/// Error type for fetch operations.
#[derive(Debug, Error)]
pub enum FetchError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The site answered with a status outside 2xx/3xx.
    #[error("HTTP {status} from {url}")]
    Status {
        /// Response status.
        status: StatusCode,
        /// Requested URL.
        url: String,
    },

    /// Request timed out.
    #[error("Request timed out after {0} seconds")]
    Timeout(u64),

    /// Invalid URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// A header value could not be encoded.
    #[error("Invalid header value for {name}: {reason}")]
    InvalidHeader {
        /// Header name.
        name: String,
        /// Why the value was rejected.
        reason: String,
    },

    /// Transport-level failure not raised by reqwest.
    #[error("Transport error: {0}")]
    Transport(String),
}

impl FetchError {
    /// Returns the HTTP status if this error came from a non-ok response.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Http(e) => e.status(),
            _ => None,
        }
    }
}

impl From<url::ParseError> for FetchError {
    fn from(err: url::ParseError) -> Self {
        Self::InvalidUrl(err.to_string())
    }
}
