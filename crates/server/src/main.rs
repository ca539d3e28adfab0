//! Carrel server binary.

use anyhow::{Context, Result};
use carrel_core::config::AppConfig;
use carrel_core::schema::DocumentKind;
use carrel_server::{create_router, AppState};
use clap::Parser;
use figment::providers::{Env, Format, Toml};
use figment::Figment;
use std::net::SocketAddr;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Carrel - a read-group metadata catalog server
#[derive(Parser, Debug)]
#[command(name = "carreld")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(
        short,
        long,
        env = "CARREL_CONFIG",
        default_value = "config/server.toml"
    )]
    config: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Startup banner
    tracing::info!("Carrel v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration (file is optional, env vars can provide/override everything)
    let config_path = std::path::Path::new(&args.config);
    let mut figment = Figment::new();
    if config_path.exists() {
        tracing::info!(config_path = %args.config, "Loading configuration from file");
        figment = figment.merge(Toml::file(&args.config));
    } else {
        tracing::debug!("No config file found at {}", args.config);
    }

    let config: AppConfig = figment
        .merge(Env::prefixed("CARREL_").split("__"))
        .extract()
        .context("failed to load configuration")?;

    // Initialize the search index
    let index = carrel_index::from_config(&config.index, DocumentKind::ReadGroup)
        .context("failed to initialize search index")?;
    tracing::info!(backend = index.backend_name(), "Search index initialized");

    // Verify index mapping and availability before accepting requests.
    // This catches configuration errors and connectivity issues early,
    // preventing the server from reporting healthy when the index is
    // unreachable.
    index
        .verify_mapping()
        .await
        .context("index mapping verification failed")?;
    let health = index
        .health()
        .await
        .context("index health probe failed")?;
    if !health.is_ok() {
        anyhow::bail!("search index degraded at startup: {:?}", health.detail);
    }
    tracing::info!("Search index connectivity verified");

    // Parse bind address
    let addr: SocketAddr = config.server.bind.parse().context("invalid bind address")?;

    // Create application state and router
    let state = AppState::new(config, index);
    let app = create_router(state);

    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind to {}", addr))?;
    axum::serve(listener, app).await?;

    Ok(())
}
