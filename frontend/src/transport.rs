//! gloo-net transport for the browser build.

use edgesim_core::{ApiClient, ClientConfig, EdgesimError, RawResponse, Transport};

/// Base URL baked in at build time; empty keeps requests same-origin.
const API_ROOT: Option<&str> = option_env!("EDGESIM_API_ROOT");

pub struct GlooTransport;

impl Transport for GlooTransport {
    async fn get(&self, url: &str, query: &[(String, String)]) -> edgesim_core::error::Result<RawResponse> {
        let resp = gloo_net::http::Request::get(url)
            .query(query.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .send()
            .await
            .map_err(|e| EdgesimError::Network(e.to_string()))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| EdgesimError::Network(e.to_string()))?;
        log::debug!("GET {} -> {}", url, status);
        Ok(RawResponse { status, body })
    }
}

pub fn client() -> ApiClient<GlooTransport> {
    ApiClient::new(&ClientConfig::new(API_ROOT.unwrap_or_default()), GlooTransport)
}
