//! Client configuration.

use std::time::Duration;

use crate::error::{EdgesimError, Result};

/// Environment variable holding the algorithm service base URL.
pub const API_ROOT_ENV: &str = "EDGESIM_API_ROOT";
/// Environment variable holding an optional request timeout, in seconds.
pub const TIMEOUT_ENV: &str = "EDGESIM_TIMEOUT_SECS";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClientConfig {
    /// Base URL of the algorithm service. Empty means same-origin relative paths.
    pub api_root: String,
    /// Per-request timeout. `None` waits as long as the service takes.
    pub timeout: Option<Duration>,
}

impl ClientConfig {
    pub fn new(api_root: impl Into<String>) -> Self {
        Self {
            api_root: normalize_root(&api_root.into()),
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Read `EDGESIM_API_ROOT` and `EDGESIM_TIMEOUT_SECS`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::new(lookup(API_ROOT_ENV).unwrap_or_default());
        if let Some(raw) = lookup(TIMEOUT_ENV).filter(|v| !v.trim().is_empty()) {
            let secs: u64 = raw.trim().parse().map_err(|_| {
                EdgesimError::Config(format!("{TIMEOUT_ENV} must be whole seconds, got '{raw}'"))
            })?;
            config = config.with_timeout(Duration::from_secs(secs));
        }
        Ok(config)
    }

    pub fn is_same_origin(&self) -> bool {
        self.api_root.is_empty()
    }
}

fn normalize_root(root: &str) -> String {
    root.trim().trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_same_origin() {
        let config = ClientConfig::from_lookup(|_| None).unwrap();
        assert!(config.is_same_origin());
        assert_eq!(config.timeout, None);
    }

    #[test]
    fn test_root_trailing_slash_trimmed() {
        let config = ClientConfig::new("http://algo.local:5000/");
        assert_eq!(config.api_root, "http://algo.local:5000");
    }

    #[test]
    fn test_timeout_from_env() {
        let config = ClientConfig::from_lookup(|key| match key {
            API_ROOT_ENV => Some("http://svc".into()),
            TIMEOUT_ENV => Some("30".into()),
            _ => None,
        })
        .unwrap();
        assert_eq!(config.timeout, Some(Duration::from_secs(30)));

        let err = ClientConfig::from_lookup(|key| (key == TIMEOUT_ENV).then(|| "soon".into()));
        assert!(matches!(err, Err(EdgesimError::Config(_))));
    }
}
