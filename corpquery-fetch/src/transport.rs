//! Transport abstraction for outbound requests.
//!
//! Scraping only ever issues GET requests and always needs the full body,
//! so the transport reads the body eagerly and hands back a plain value.

use async_trait::async_trait;
use reqwest::StatusCode;
use reqwest::header::{COOKIE, HeaderMap, HeaderName, HeaderValue, SET_COOKIE};
use url::Url;

use crate::error::FetchError;

// ============================================================================
// Request
// ============================================================================

/// An outbound GET request.
#[derive(Debug, Clone)]
pub struct FetchRequest {
    /// Target URL.
    pub url: Url,
    /// Extra request headers.
    pub headers: HeaderMap,
}

impl FetchRequest {
    /// Creates a GET request without extra headers.
    pub fn get(url: Url) -> Self {
        Self {
            url,
            headers: HeaderMap::new(),
        }
    }

    /// Parses `url` and creates a GET request.
    pub fn parse(url: &str) -> Result<Self, FetchError> {
        Ok(Self::get(Url::parse(url)?))
    }

    /// Adds a header.
    pub fn with_header(mut self, name: HeaderName, value: &str) -> Result<Self, FetchError> {
        let value = HeaderValue::from_str(value).map_err(|e| FetchError::InvalidHeader {
            name: name.to_string(),
            reason: e.to_string(),
        })?;
        self.headers.insert(name, value);
        Ok(self)
    }

    /// Attaches a session cookie, if there is one.
    pub fn with_cookie(self, cookie: Option<&str>) -> Result<Self, FetchError> {
        match cookie {
            Some(cookie) if !cookie.is_empty() => self.with_header(COOKIE, cookie),
            _ => Ok(self),
        }
    }
}

// ============================================================================
// Response
// ============================================================================

/// A fully-read response.
#[derive(Debug, Clone)]
pub struct FetchResponse {
    /// Response status.
    pub status: StatusCode,
    /// Response headers.
    pub headers: HeaderMap,
    /// Response body as text.
    pub body: String,
}

impl FetchResponse {
    /// Creates a response with no headers.
    pub fn new(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: body.into(),
        }
    }

    /// Appends a header. Invalid values are dropped.
    #[must_use]
    pub fn with_header(mut self, name: HeaderName, value: &str) -> Self {
        if let Ok(value) = HeaderValue::from_str(value) {
            self.headers.append(name, value);
        }
        self
    }

    /// Returns true for 2xx and 3xx statuses.
    pub fn is_ok(&self) -> bool {
        self.status.is_success() || self.status.is_redirection()
    }

    /// Folds all `Set-Cookie` headers into one `Cookie` request value.
    ///
    /// Only the `name=value` pair of each cookie is kept; attributes such as
    /// `Path` or `HttpOnly` are dropped.
    pub fn cookie_header(&self) -> Option<String> {
        let pairs: Vec<&str> = self
            .headers
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .filter_map(|v| v.split(';').next())
            .map(str::trim)
            .filter(|pair| pair.contains('='))
            .collect();

        if pairs.is_empty() {
            None
        } else {
            Some(pairs.join("; "))
        }
    }
}

// ============================================================================
// Transport Trait
// ============================================================================

/// Sends a single request, without retrying.
///
/// Retrying lives in [`crate::retry::fetch_with_retry`] so that every
/// transport gets identical retry semantics.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Sends the request and reads the full body.
    ///
    /// Non-ok statuses are returned as responses, not errors.
    async fn send(&self, request: &FetchRequest) -> Result<FetchResponse, FetchError>;
}
