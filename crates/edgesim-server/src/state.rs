//! Shared application state for the Axum server.

use std::sync::Arc;

use edgesim_core::http::{self, HttpTransport};
use edgesim_core::{ApiClient, ClientConfig};

#[derive(Clone)]
pub struct AppState {
    pub upstream: Arc<ApiClient<HttpTransport>>,
}

impl AppState {
    pub fn new(upstream: &ClientConfig) -> anyhow::Result<Self> {
        if upstream.is_same_origin() {
            anyhow::bail!("an upstream algorithm service URL is required");
        }
        Ok(Self {
            upstream: Arc::new(http::connect(upstream)?),
        })
    }
}

/// Configuration for the web server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Where the algorithm service lives.
    pub upstream: ClientConfig,
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            upstream: ClientConfig::new("http://127.0.0.1:5000"),
            host: "127.0.0.1".to_string(),
            port: 8000,
        }
    }
}
