// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # `CorpQuery` Server
//!
//! The HTTP API in front of the scraper and the record store.
//!
//! ```ignore
//! use corpquery_server::{AppState, ServerConfig, router};
//!
//! let config = ServerConfig::default();
//! let state = AppState::from_config(&config).await?;
//! let listener = tokio::net::TcpListener::bind(config.listen).await?;
//! axum::serve(listener, router(state)).await?;
//! ```

pub mod config;
pub mod error;
pub mod routes;
pub mod state;

pub use config::{HttpConfig, RetryConfig, ServerConfig, StoreBackend, StoreConfig};
pub use error::{ApiError, ConfigError};
pub use routes::{QueryRequest, QueryResponse, router};
pub use state::AppState;
