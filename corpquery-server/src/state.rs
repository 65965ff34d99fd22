//! Shared handler state and its construction from configuration.

use anyhow::Context;
use corpquery_fetch::HttpClient;
use corpquery_sites::{Scraper, SiteRegistry};
use corpquery_store::{FileStore, MemoryStore, RecordStore};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use crate::config::ServerConfig;

/// Dependencies injected into every handler.
#[derive(Clone)]
pub struct AppState {
    /// Scraper for the configured site.
    pub scraper: Arc<Scraper>,
    /// Record store shared with the scraper.
    pub store: Arc<dyn RecordStore>,
    /// Maximum history entries returned.
    pub history_limit: usize,
}

impl AppState {
    /// Creates state from ready-made parts.
    pub fn new(scraper: Arc<Scraper>, store: Arc<dyn RecordStore>, history_limit: usize) -> Self {
        Self {
            scraper,
            store,
            history_limit,
        }
    }

    /// Builds the production state: reqwest transport, configured site
    /// profile and store backend.
    pub async fn from_config(config: &ServerConfig) -> anyhow::Result<Self> {
        let store: Arc<dyn RecordStore> = match config.store.file_path() {
            Some(path) => {
                let store = FileStore::open(path.clone())
                    .await
                    .with_context(|| format!("Failed to open store {}", path.display()))?;
                info!(path = %path.display(), "Using file store");
                Arc::new(store)
            }
            None => {
                info!("Using in-memory store");
                Arc::new(MemoryStore::new())
            }
        };

        let profile = SiteRegistry::profile_with_base(config.site, config.site_base_url.as_deref())?;

        let mut client = HttpClient::with_options(
            Duration::from_secs(config.http.timeout_secs),
            &config.http.user_agent,
        )?;
        if let Some(domain) = profile.allowed_domain() {
            client = client.with_allowed_domains(vec![domain]);
        }

        info!(site = %config.site, base = %profile.base_url, "Scraper configured");
        let scraper = Scraper::new(profile, Arc::new(client), store.clone())
            .with_retry(config.retry.strategy());

        Ok(Self::new(Arc::new(scraper), store, config.history_limit))
    }
}
