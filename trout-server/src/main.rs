use trout_server::config;
use trout_server::render::PageRenderer;
use trout_server::routes::{self, AppState};
use trout_server::service::LakeService;
use trout_server::store::{seed, LakeStore};

use anyhow::Result;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let config = config::read_config()?;

    // Initialize logging
    let _logging_guard = trout_server::logging::init_logging(
        &config.log_dir,
        "trout-server",
        &config.log_level,
    )?;

    tracing::info!("Trout server starting...");

    let store = LakeStore::connect(&config.database_url()).await?;
    let source = seed::source_from_config(config);
    let service = LakeService::new(store, source);

    // Warm the cache; an empty store is bootstrapped on the first request
    if let Err(e) = service.refresh().await {
        tracing::warn!("Initial lake cache load failed: {}", e);
    }

    let state = Arc::new(AppState::new(
        service,
        PageRenderer::new(&config.template_dir),
        config.default_days,
    ));
    let app = routes::router(state);

    let listener = tokio::net::TcpListener::bind(config.server_address()).await?;
    tracing::info!("HTTP server listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
