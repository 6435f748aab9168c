use clap::Parser;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use user_registry::api::router::build_router;
use user_registry::config::Config;
use user_registry::storage::json_file::JsonFileStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::parse();

    // 1. Storage layer:
    let store = Arc::new(
        JsonFileStore::new(config.data_file.clone()).with_lock_timeout(config.request_timeout()),
    );
    tracing::info!("Using record file {}", store.path().display());

    // 2. HTTP Router:
    let app = build_router(store, config.request_timeout());

    // 3. Start HTTP server:
    let listener = tokio::net::TcpListener::bind(config.bind).await?;
    tracing::info!("HTTP server listening on {}", listener.local_addr()?);
    tracing::info!("Press Ctrl+C to shutdown");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
