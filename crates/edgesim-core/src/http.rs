//! reqwest-backed `Transport` for native builds.

use crate::api::{ApiClient, RawResponse, Transport};
use crate::config::ClientConfig;
use crate::error::{EdgesimError, Result};

#[derive(Clone)]
pub struct HttpTransport {
    http: reqwest::Client,
}

impl HttpTransport {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| EdgesimError::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { http })
    }
}

impl Transport for HttpTransport {
    async fn get(&self, url: &str, query: &[(String, String)]) -> Result<RawResponse> {
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(EdgesimError::Config(format!(
                "'{url}' is not absolute; set an API root to call the service outside a browser"
            )));
        }
        let response = self
            .http
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|e| EdgesimError::Network(e.to_string()))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| EdgesimError::Network(e.to_string()))?;
        Ok(RawResponse { status, body })
    }
}

/// Client over reqwest, configured from `config`.
pub fn connect(config: &ClientConfig) -> Result<ApiClient<HttpTransport>> {
    Ok(ApiClient::new(config, HttpTransport::new(config)?))
}
