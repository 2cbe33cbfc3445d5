pub mod api;
pub mod config;
pub mod error;
pub mod library;
pub mod mcp;
pub mod providers;
pub mod search;
pub mod stdio_service;
pub mod types;

use config::ServerConfig;
use library::Library;
use search::SearchRouter;

#[derive(Debug)]
pub struct AppState {
    pub search: SearchRouter,
    // Bookmarks and history, the only shared mutable state
    pub library: Library,
    pub body_limit: usize,
}

// Canonical model at the crate root
pub use types::*;

impl AppState {
    pub fn new(config: &ServerConfig) -> anyhow::Result<Self> {
        let http_client = build_http_client(config)?;
        Ok(Self::with_client(config, http_client))
    }

    pub fn with_client(config: &ServerConfig, http_client: reqwest::Client) -> Self {
        Self {
            search: SearchRouter::new(
                http_client,
                config.providers.clone(),
                config.endpoints.clone(),
            ),
            library: Library::new(),
            body_limit: config.body_limit,
        }
    }
}

pub fn build_http_client(config: &ServerConfig) -> anyhow::Result<reqwest::Client> {
    let mut builder = reqwest::Client::builder()
        .user_agent(concat!("search-proxy/", env!("CARGO_PKG_VERSION")));
    if let Some(timeout) = config.upstream_timeout {
        builder = builder.timeout(timeout);
    }
    Ok(builder.build()?)
}
