// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # `CorpQuery` Fetch
//!
//! Outbound HTTP for the `CorpQuery` scraper.
//!
//! - [`transport::Transport`] - Seam for sending one request
//! - [`client::HttpClient`] - reqwest implementation with browser headers
//! - [`retry::fetch_with_retry`] - Bounded retry with a fixed delay
//!
//! ## Example
//!
//! ```ignore
//! use corpquery_fetch::{fetch_with_retry, FetchRequest, HttpClient, RetryStrategy};
//!
//! let client = HttpClient::new()?;
//! let request = FetchRequest::parse("https://www.qcc.com/")?;
//! let response = fetch_with_retry(&client, &request, &RetryStrategy::default()).await?;
//! let cookie = response.cookie_header();
//! ```

pub mod client;
pub mod error;
pub mod retry;
pub mod transport;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

// Re-export key types at crate root
pub use client::{BROWSER_USER_AGENT, HttpClient};
pub use error::FetchError;
pub use retry::{RetryStrategy, fetch_with_retry};
pub use transport::{FetchRequest, FetchResponse, Transport};

pub use reqwest::StatusCode;
