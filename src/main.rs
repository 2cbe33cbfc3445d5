use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

use search_proxy::{api, config::ServerConfig, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    // Get configuration from environment
    let config = ServerConfig::from_env();

    info!("Starting search proxy");
    config.providers.log_status();
    match config.upstream_timeout {
        Some(timeout) => info!("Upstream timeout: {:?}", timeout),
        None => info!("Upstream timeout: disabled"),
    }

    let state = Arc::new(AppState::new(&config)?);
    let app = api::router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Proxy running on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
