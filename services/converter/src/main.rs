use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tracing::{Level, info};
use tracing_subscriber::EnvFilter;

mod brand;
mod clickthrough;
mod config;
mod error;
mod models;
mod overlay;
mod qr;
mod routes;
mod state;
mod vast;
mod views;

use common::{request_id::RequestIdGenerator, storage::ArtifactStore};

use crate::clickthrough::ClickthroughResolver;
use crate::config::AppConfig;
use crate::overlay::LBarRenderer;
use crate::state::AppState;

/// Timeout for fetching a VAST document by URL
const VAST_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_max_level(Level::INFO)
        .init();

    info!("Starting conversion service");

    let config = AppConfig::from_env();

    let store = ArtifactStore::open(&config.storage_root)?;

    let renderer = LBarRenderer::new(
        config.ffmpeg_path.clone(),
        config.font_file.clone(),
        config.render_timeout,
    );

    // Check that the external video tool is reachable
    if renderer.health_check().await {
        info!("FFmpeg available at '{}'", config.ffmpeg_path);
    } else {
        anyhow::bail!(
            "FFmpeg not found at '{}'. Please ensure it is installed and accessible.",
            config.ffmpeg_path
        );
    }

    let resolver = ClickthroughResolver::new()?;

    let http = reqwest::Client::builder()
        .timeout(VAST_FETCH_TIMEOUT)
        .build()?;

    info!("Conversion service initialized successfully");

    let port = config.port;
    let app_state = AppState {
        config: Arc::new(config),
        store,
        ids: RequestIdGenerator::new(),
        resolver,
        renderer,
        http,
    };

    // Start the web server
    let app = routes::create_router(app_state);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}")).await?;
    info!("Conversion service listening on 0.0.0.0:{}", port);

    axum::serve(listener, app).await?;

    Ok(())
}
