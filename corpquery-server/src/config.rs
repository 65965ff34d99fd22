//! Server configuration.
//!
//! Load order is defaults, then the JSON file (if any), then command-line
//! and environment overrides applied by the binary.

use corpquery_fetch::client::DEFAULT_TIMEOUT_SECS;
use corpquery_fetch::retry::{DEFAULT_DELAY, DEFAULT_RETRIES};
use corpquery_fetch::{BROWSER_USER_AGENT, RetryStrategy};
use corpquery_sites::SiteKind;
use corpquery_store::{DEFAULT_HISTORY_LIMIT, default_store_path};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

use crate::error::ConfigError;

/// Default listen address.
pub const DEFAULT_LISTEN: &str = "127.0.0.1:8787";

/// Top-level server configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind.
    pub listen: SocketAddr,
    /// Site to scrape.
    pub site: SiteKind,
    /// Replaces the site's default root URL (mirrors, local testing).
    pub site_base_url: Option<String>,
    /// Retry settings for outbound requests.
    pub retry: RetryConfig,
    /// Outbound HTTP settings.
    pub http: HttpConfig,
    /// Record store settings.
    pub store: StoreConfig,
    /// Maximum entries returned by the history route.
    pub history_limit: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            site: SiteKind::default(),
            site_base_url: None,
            retry: RetryConfig::default(),
            http: HttpConfig::default(),
            store: StoreConfig::default(),
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }
}

fn default_listen() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 8787))
}

/// Retry settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Retries after the first attempt.
    pub retries: u32,
    /// Fixed delay between attempts, in milliseconds.
    pub delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            retries: DEFAULT_RETRIES,
            delay_ms: u64::try_from(DEFAULT_DELAY.as_millis()).unwrap_or(1000),
        }
    }
}

impl RetryConfig {
    /// Converts to the fetcher's strategy.
    pub fn strategy(&self) -> RetryStrategy {
        RetryStrategy::new(self.retries).with_delay(Duration::from_millis(self.delay_ms))
    }
}

/// Outbound HTTP settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// User-Agent sent to the site.
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: BROWSER_USER_AGENT.to_string(),
        }
    }
}

/// Which store backend to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// In-process map; lost on restart.
    #[default]
    Memory,
    /// JSON file on disk.
    File,
}

/// Record store settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct StoreConfig {
    /// Backend kind.
    pub backend: StoreBackend,
    /// File path for the file backend.
    pub path: Option<PathBuf>,
}

impl StoreConfig {
    /// The file to use, if the file backend is selected.
    ///
    /// A configured path implies the file backend; the file backend without
    /// a path uses the per-user data directory.
    pub fn file_path(&self) -> Option<PathBuf> {
        match (&self.path, self.backend) {
            (Some(path), _) => Some(path.clone()),
            (None, StoreBackend::File) => Some(default_store_path()),
            (None, StoreBackend::Memory) => None,
        }
    }
}

impl ServerConfig {
    /// Loads configuration from `path`, or defaults if the file is missing.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            debug!(path = %path.display(), "Config file not found, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        info!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Parses configuration JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Applies command-line overrides.
    pub fn apply_overrides(
        &mut self,
        listen: Option<SocketAddr>,
        site: Option<SiteKind>,
        store_path: Option<PathBuf>,
    ) {
        if let Some(listen) = listen {
            self.listen = listen;
        }
        if let Some(site) = site {
            self.site = site;
        }
        if let Some(path) = store_path {
            self.store.backend = StoreBackend::File;
            self.store.path = Some(path);
        }
    }
}
