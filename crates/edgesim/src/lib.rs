#![doc = include_str!("../../../README.md")]
//!
//! This crate bundles the client library and the dashboard server.

pub use edgesim_core::*;
pub use edgesim_server as server;
