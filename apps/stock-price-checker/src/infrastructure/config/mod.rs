//! Configuration Module
//!
//! Configuration loading for the stock price checker service.

mod settings;

pub use settings::{CheckerConfig, ConfigError, DEFAULT_PROXY_BASE, ServerSettings, UpstreamSettings};
