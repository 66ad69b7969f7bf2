//! edgesim-core: everything between the parameter forms and the algorithm service.
//!
//! The catalog describes the parameters, `ParamForm` turns edits into immutable
//! `ParamSet` values, `RunController` sends them through an `ApiClient` and
//! keeps the tagged `RunOutcome`, and `charts` turns outcomes into Plotly specs.

pub mod api;
pub mod catalog;
pub mod charts;
pub mod config;
pub mod controller;
pub mod error;
pub mod form;
#[cfg(not(target_arch = "wasm32"))]
pub mod http;
pub mod models;
pub mod params;

pub use api::{ApiClient, ApiRequest, RawResponse, Transport};
pub use config::ClientConfig;
pub use controller::{RunController, RunState, RunTicket, Selection};
pub use error::EdgesimError;
pub use form::{Bound, Control, ParamForm};
pub use models::{ComparisonResult, CostMetric, CostSeries, OverviewResponse, RunOutcome};
pub use params::ParamSet;
