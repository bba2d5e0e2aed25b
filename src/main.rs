//! Media Catalog Server
//!
//! Serves the in-memory book catalog over HTTP.

use anyhow::Context;
use std::net::SocketAddr;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use media_catalog_server::{
    api,
    config::AppConfig,
    repository::{items::ItemsRepository, Repository},
    AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("Failed to load configuration")?;

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("media_catalog_server={},tower_http=debug", config.logging.level).into()
    });

    let registry = tracing_subscriber::registry().with(filter);
    if config.logging.format == "json" {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    tracing::info!("Starting Media Catalog Server v{}", env!("CARGO_PKG_VERSION"));

    // Seed the store; mutations are never written back
    let items = match &config.catalog.seed_path {
        Some(path) => ItemsRepository::from_seed_file(path)
            .with_context(|| format!("Failed to load seed file {}", path))?,
        None => {
            tracing::warn!("No seed file configured, starting with an empty catalog");
            ItemsRepository::new()
        }
    };
    tracing::info!("Catalog loaded with {} items", items.count()?);

    let addr = SocketAddr::new(
        config.server.host.parse().context("Invalid host address")?,
        config.server.port,
    );

    let state = AppState::new(Repository::new(items));
    let app = api::create_router(state);

    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
