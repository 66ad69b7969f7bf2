//! Immutable parameter set sent as the query string of a run.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Serialize;

use crate::catalog;
use crate::error::{EdgesimError, Result};

/// Request field name -> raw text value.
///
/// Keys are always catalog request keys. Values are forwarded untouched; the
/// service does its own parsing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParamSet {
    values: BTreeMap<String, String>,
}

impl ParamSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return a new set with `key` bound to `value`, replacing any earlier value.
    pub fn with(&self, key: &str, value: impl Into<String>) -> Result<Self> {
        if !catalog::is_request_key(key) {
            return Err(EdgesimError::UnknownParameter(key.to_string()));
        }
        let mut values = self.values.clone();
        values.insert(key.to_string(), value.into());
        Ok(Self { values })
    }

    /// Layer `other` on top of `self`; keys in `other` win.
    pub fn merged(&self, other: &ParamSet) -> Self {
        let mut values = self.values.clone();
        values.extend(other.values.iter().map(|(k, v)| (k.clone(), v.clone())));
        Self { values }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Query pairs in key order.
    pub fn to_query(&self) -> Vec<(String, String)> {
        self.values
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Catalog request keys that have no value yet.
    pub fn missing_keys(&self) -> Vec<&'static str> {
        catalog::request_keys()
            .into_iter()
            .filter(|k| !self.values.contains_key(*k))
            .collect()
    }

    /// Parse `key=value` pairs (CLI `-p` flags).
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = &'a str>) -> Result<Self> {
        let mut set = ParamSet::new();
        for pair in pairs {
            let (key, value) = pair.split_once('=').ok_or_else(|| {
                EdgesimError::Config(format!("expected key=value, got '{pair}'"))
            })?;
            set = set.with(key.trim(), value.trim())?;
        }
        Ok(set)
    }

    /// Load a YAML mapping of request key -> value. Numbers are kept as written.
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let raw: BTreeMap<String, serde_yaml::Value> = serde_yaml::from_str(content)?;
        let mut set = ParamSet::new();
        for (key, value) in raw {
            let text = match value {
                serde_yaml::Value::String(s) => s,
                serde_yaml::Value::Number(n) => n.to_string(),
                serde_yaml::Value::Bool(b) => b.to_string(),
                other => {
                    return Err(EdgesimError::Config(format!(
                        "parameter '{key}' must be a scalar, got {other:?}"
                    )))
                }
            };
            set = set.with(&key, text)?;
        }
        Ok(set)
    }

    pub fn from_yaml_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| EdgesimError::Config(format!("{}: {e}", path.display())))?;
        Self::from_yaml_str(&content)
    }
}
