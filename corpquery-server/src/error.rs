//! Server error types.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use corpquery_store::StoreError;
use serde_json::json;
use std::path::PathBuf;
use thiserror::Error;
use tracing::error;

/// Failures inside a route handler.
///
/// Every variant is reported to the caller as `500 {"error": "..."}`.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request body is not the expected JSON.
    #[error("Invalid request body: {0}")]
    BadRequest(#[from] serde_json::Error),

    /// Reading or writing records failed.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        error!(error = %self, "Request failed");
        let body = Json(json!({ "error": self.to_string() }));
        (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
    }
}

/// Failures loading the configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("Failed to read config {path}: {source}")]
    Io {
        /// Config file path.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// The file is not valid config JSON.
    #[error("Invalid config {path}: {source}")]
    Parse {
        /// Config file path.
        path: PathBuf,
        /// Underlying error.
        source: serde_json::Error,
    },
}
