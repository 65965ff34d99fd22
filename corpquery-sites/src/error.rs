//! Scraper errors.
//!
//! None of these reach API callers as errors: the scraper folds every one
//! of them into a captcha-required outcome carrying the message.

use corpquery_fetch::FetchError;
use corpquery_store::StoreError;
use thiserror::Error;

/// Errors raised while scraping a site.
#[derive(Debug, Error)]
pub enum SiteError {
    /// Request failed after retries.
    #[error("Fetch failed: {0}")]
    Fetch(#[from] FetchError),

    /// Persisting the record failed.
    #[error("Store failed: {0}")]
    Store(#[from] StoreError),

    /// A site URL could not be built.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// An extraction pattern does not compile.
    #[error("Invalid pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
}

impl From<url::ParseError> for SiteError {
    fn from(err: url::ParseError) -> Self {
        SiteError::InvalidUrl(err.to_string())
    }
}
