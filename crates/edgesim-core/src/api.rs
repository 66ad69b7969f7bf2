//! Client for the two algorithm-service endpoints.
//!
//! Requests are plain data (`ApiRequest`); a `Transport` performs the GET. The
//! native build ships a reqwest transport (`crate::http`), the browser build
//! brings its own over gloo-net.

use tracing::debug;

use crate::config::ClientConfig;
use crate::error::{EdgesimError, Result};
use crate::models::{CostSeries, OverviewResponse};
use crate::params::ParamSet;

pub const RUN_ALGORITHM_PATH: &str = "/run_algorithm";
pub const OVERVIEW_PATH: &str = "/get_overview";
/// Query key carrying the comma-joined algorithm list of an overview request.
pub const ALGO_NAMES_KEY: &str = "algo_names";

/// A GET request: path relative to the API root plus ordered query pairs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    pub path: String,
    pub query: Vec<(String, String)>,
}

impl ApiRequest {
    pub fn run_algorithm(name: &str, params: &ParamSet) -> Self {
        Self {
            path: format!("{RUN_ALGORITHM_PATH}/{name}"),
            query: params.to_query(),
        }
    }

    pub fn overview<S: AsRef<str>>(names: &[S], params: &ParamSet) -> Self {
        let joined = names.iter().map(AsRef::as_ref).collect::<Vec<_>>().join(",");
        let mut query = vec![(ALGO_NAMES_KEY.to_string(), joined)];
        query.extend(params.to_query());
        Self {
            path: OVERVIEW_PATH.to_string(),
            query,
        }
    }

    /// Full URL without the query string.
    pub fn url(&self, api_root: &str) -> String {
        format!("{}{}", api_root.trim_end_matches('/'), self.path)
    }
}

/// Status and body of a completed HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Reject non-2xx responses, then decode the body as JSON.
    pub fn decode<T: serde::de::DeserializeOwned>(self) -> Result<T> {
        if !self.is_success() {
            return Err(EdgesimError::Status {
                status: self.status,
                body: self.body,
            });
        }
        Ok(serde_json::from_str(&self.body)?)
    }
}

/// Performs a GET. Implementations map connection-level failures to
/// `EdgesimError::Network` and return every HTTP status as a `RawResponse`.
#[allow(async_fn_in_trait)]
pub trait Transport {
    async fn get(&self, url: &str, query: &[(String, String)]) -> Result<RawResponse>;
}

impl<T: Transport + ?Sized> Transport for &T {
    async fn get(&self, url: &str, query: &[(String, String)]) -> Result<RawResponse> {
        (**self).get(url, query).await
    }
}

pub struct ApiClient<T> {
    api_root: String,
    transport: T,
}

impl<T: Transport> ApiClient<T> {
    pub fn new(config: &ClientConfig, transport: T) -> Self {
        Self {
            api_root: config.api_root.clone(),
            transport,
        }
    }

    pub fn api_root(&self) -> &str {
        &self.api_root
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Send a prepared request and hand back whatever the service answered.
    pub async fn send(&self, request: &ApiRequest) -> Result<RawResponse> {
        let url = request.url(&self.api_root);
        debug!(url = %url, params = request.query.len(), "GET");
        self.transport.get(&url, &request.query).await
    }

    /// `GET /run_algorithm/{name}?<params>`
    pub async fn run_algorithm(&self, name: &str, params: &ParamSet) -> Result<CostSeries> {
        self.send(&ApiRequest::run_algorithm(name, params))
            .await?
            .decode()
    }

    /// `GET /get_overview?algo_names=<a,b>&<params>`
    pub async fn get_overview_info<S: AsRef<str>>(
        &self,
        names: &[S],
        params: &ParamSet,
    ) -> Result<OverviewResponse> {
        self.send(&ApiRequest::overview(names, params))
            .await?
            .decode()
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::cell::RefCell;
    use std::collections::VecDeque;

    use super::*;

    /// Records every request and replays canned responses in order.
    #[derive(Default)]
    pub struct FakeTransport {
        pub requests: RefCell<Vec<(String, Vec<(String, String)>)>>,
        pub responses: RefCell<VecDeque<Result<RawResponse>>>,
    }

    impl FakeTransport {
        pub fn replying(status: u16, body: &str) -> Self {
            let fake = Self::default();
            fake.push(status, body);
            fake
        }

        pub fn push(&self, status: u16, body: &str) {
            self.responses.borrow_mut().push_back(Ok(RawResponse {
                status,
                body: body.to_string(),
            }));
        }

        pub fn push_network_error(&self) {
            self.responses
                .borrow_mut()
                .push_back(Err(EdgesimError::Network("connection refused".into())));
        }
    }

    impl Transport for FakeTransport {
        async fn get(&self, url: &str, query: &[(String, String)]) -> Result<RawResponse> {
            self.requests
                .borrow_mut()
                .push((url.to_string(), query.to_vec()));
            self.responses
                .borrow_mut()
                .pop_front()
                .unwrap_or_else(|| Err(EdgesimError::Network("no canned response".into())))
        }
    }
}
