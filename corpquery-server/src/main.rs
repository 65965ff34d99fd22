// Lint configuration for this crate
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! `CorpQuery` server - company registry lookups over HTTP.
//!
//! # Examples
//!
//! ```bash
//! # Serve on the default address with the aggregator site
//! corpquery
//!
//! # Official registry site, persistent history
//! corpquery --site registry --store-path ./records.json
//!
//! # Config file plus debug logging
//! corpquery --config corpquery.json -v
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use corpquery_server::{AppState, ServerConfig, router};
use corpquery_sites::SiteKind;
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

// ============================================================================
// CLI Definition
// ============================================================================

/// `CorpQuery` - company registry lookup service.
#[derive(Parser)]
#[command(name = "corpquery")]
#[command(about = "Company registry lookup service")]
#[command(long_about = r"
CorpQuery scrapes a business registry site for company names posted to
/api/query and keeps a history of every company it found.

Routes:
  POST /api/query     {companies: [..], captcha?: ..}
  GET  /api/history   last 50 records, newest first
")]
#[command(version)]
pub struct Cli {
    /// JSON config file.
    #[arg(long, short, env = "CORPQUERY_CONFIG")]
    pub config: Option<PathBuf>,

    /// Address to listen on.
    #[arg(long, short, env = "CORPQUERY_LISTEN")]
    pub listen: Option<SocketAddr>,

    /// Site to scrape (registry or aggregator).
    #[arg(long, short)]
    pub site: Option<SiteKind>,

    /// Persist records to this JSON file instead of memory.
    #[arg(long)]
    pub store_path: Option<PathBuf>,

    /// Verbose output (show debug info).
    #[arg(long, short)]
    pub verbose: bool,
}

// ============================================================================
// Logging Setup
// ============================================================================

fn setup_logging(verbose: bool) {
    let default = if verbose {
        "corpquery=debug,tower_http=debug,info"
    } else {
        "corpquery=info,warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .compact()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutting down");
    }
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose);

    let mut config = match &cli.config {
        Some(path) => ServerConfig::load_from(path)?,
        None => ServerConfig::default(),
    };
    config.apply_overrides(cli.listen, cli.site, cli.store_path.clone());

    let state = AppState::from_config(&config).await?;
    let listener = tokio::net::TcpListener::bind(config.listen)
        .await
        .with_context(|| format!("Failed to bind {}", config.listen))?;
    info!(addr = %config.listen, site = %config.site, "Listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
