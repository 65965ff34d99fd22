//! Core error types for `CorpQuery`.

use thiserror::Error;

/// Core error type for `CorpQuery` domain operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A stored or scraped value does not form a valid record.
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Timestamp could not be parsed as ISO-8601.
    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(#[from] chrono::ParseError),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
