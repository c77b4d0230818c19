//! API module for the transcript scanner
//!
//! Exposes the parsers over HTTP for the planner front end. The axum server is
//! only compiled with the `api` feature; the handlers are plain async functions.

pub mod handlers;
pub mod models;

#[cfg(feature = "api")]
pub mod server;

#[cfg(feature = "api")]
use {crate::config::Config, anyhow::Result, std::sync::Arc, tracing::info};

/// API Server for handling REST requests
#[cfg(feature = "api")]
#[derive(Debug)]
pub struct ApiServer {
    config: Arc<Config>,
}

#[cfg(feature = "api")]
impl ApiServer {
    /// Create a new API server
    pub fn new(config: Arc<Config>) -> Self {
        Self { config }
    }

    /// Start the API server and serve until shutdown
    pub async fn start(self) -> Result<()> {
        info!("🚀 Starting API server on port {}", self.config.api.port);
        server::start_http_server(self.config).await
    }
}
