//! # okr-daemon
//!
//! HTTP daemon for the OKR goal engine.
//!
//! Serves the goals API over an in-memory store. Configuration comes from
//! an optional TOML file plus command-line overrides.
//!
//! ## Usage
//!
//! ```text
//! okr-daemon --listen 0.0.0.0:8080
//! okr-daemon --config /etc/okr/daemon.toml
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use okr_core::{MemoryOwnerDirectory, MemoryStore};
use okr_engine::{GoalService, MemoryTemplateCatalog};

mod config;
mod seed;

use config::DaemonConfig;

/// OKR goal engine HTTP daemon.
#[derive(Parser)]
#[command(name = "okr-daemon", about = "OKR goal engine HTTP daemon")]
struct Cli {
    /// Path to a TOML config file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Listen address, overriding the config file.
    #[arg(long)]
    listen: Option<SocketAddr>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("okr_engine=info".parse()?)
                .add_directive("okr_server=info".parse()?)
                .add_directive("okr_daemon=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let cli = Cli::parse();
    let mut config = match &cli.config {
        Some(path) => DaemonConfig::load(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => DaemonConfig::default(),
    };
    if let Some(listen) = cli.listen {
        config.listen = listen;
    }

    let store = Arc::new(MemoryStore::new());
    let owners = Arc::new(MemoryOwnerDirectory::new());
    let templates = Arc::new(MemoryTemplateCatalog::new());
    if config.seed_demo_data {
        seed::demo(owners.as_ref(), templates.as_ref()).context("seeding demo data")?;
    }
    let service = Arc::new(GoalService::new(store, owners, templates));
    let app = okr_server::router(service);

    tracing::info!("listening on {}", config.listen);
    let listener = tokio::net::TcpListener::bind(config.listen)
        .await
        .with_context(|| format!("binding {}", config.listen))?;
    axum::serve(listener, app).await?;

    Ok(())
}
