//! Error types for edgesim-core.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EdgesimError {
    /// The request never produced a response (DNS, refused connection, timeout...).
    #[error("Network error: {0}")]
    Network(String),

    /// The service answered with a non-2xx status.
    #[error("Service returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("JSON error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Unknown request parameter: {0}")]
    UnknownParameter(String),

    #[error("Unknown parameter label: {0}")]
    UnknownLabel(String),

    #[error("Parameter '{label}' has no {bound} field")]
    NoSuchBound { label: String, bound: &'static str },

    #[error("A run is already in flight")]
    RunInFlight,

    #[error("Configuration error: {0}")]
    Config(String),
}

impl EdgesimError {
    /// Short message suitable for showing next to the run button.
    pub fn user_message(&self) -> String {
        match self {
            EdgesimError::Network(_) => {
                "Run failed: the algorithm service could not be reached.".to_string()
            }
            EdgesimError::Status { status, .. } => {
                format!("Run failed: the algorithm service rejected the request (HTTP {status}).")
            }
            EdgesimError::Decode(_) => {
                "Run failed: the algorithm service sent an unreadable response.".to_string()
            }
            other => format!("Run failed: {other}"),
        }
    }

    pub fn is_network(&self) -> bool {
        matches!(self, EdgesimError::Network(_))
    }
}

pub type Result<T> = std::result::Result<T, EdgesimError>;
