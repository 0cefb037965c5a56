//! Service Configuration Settings
//!
//! Configuration types for the stock price checker, loaded from
//! environment variables.

use std::time::Duration;

use reqwest::Url;

use crate::application::services::FallbackPolicy;

/// Default upstream price proxy.
pub const DEFAULT_PROXY_BASE: &str = "https://stock-price-checker-proxy.freecodecamp.rocks";

/// Upstream price-source settings.
#[derive(Debug, Clone)]
pub struct UpstreamSettings {
    /// Base URL that candidate endpoints are derived from.
    pub base_url: Url,
    /// Timeout applied to each candidate request.
    pub fetch_timeout: Duration,
    /// Behaviour when every candidate fails.
    pub fallback: FallbackPolicy,
}

impl Default for UpstreamSettings {
    #[allow(clippy::expect_used)]
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_PROXY_BASE).expect("default proxy base is a valid URL"),
            fetch_timeout: Duration::from_secs(3),
            fallback: FallbackPolicy::Synthetic,
        }
    }
}

/// HTTP server settings.
#[derive(Debug, Clone)]
pub struct ServerSettings {
    /// HTTP listen port.
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self { port: 3000 }
    }
}

/// Complete service configuration.
#[derive(Debug, Clone, Default)]
pub struct CheckerConfig {
    /// HTTP server settings.
    pub server: ServerSettings,
    /// Upstream price-source settings.
    pub upstream: UpstreamSettings,
}

impl CheckerConfig {
    /// Create configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a set variable holds an invalid URL or boolean.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns an error if a set variable holds an invalid URL or boolean.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let base_url = match lookup("STOCK_PROXY_BASE").filter(|v| !v.trim().is_empty()) {
            Some(value) => parse_url("STOCK_PROXY_BASE", &value)?,
            None => defaults.upstream.base_url,
        };

        let fetch_timeout = parse_duration_millis(
            lookup("STOCK_PRICE_FETCH_TIMEOUT_MS"),
            defaults.upstream.fetch_timeout,
        );

        let fallback = match lookup("STOCK_PRICE_SYNTHETIC_FALLBACK") {
            Some(value) => {
                if parse_bool("STOCK_PRICE_SYNTHETIC_FALLBACK", &value)? {
                    FallbackPolicy::Synthetic
                } else {
                    FallbackPolicy::Disabled
                }
            }
            None => defaults.upstream.fallback,
        };

        let server = ServerSettings {
            port: parse_u16(lookup("PORT"), defaults.server.port),
        };

        Ok(Self {
            server,
            upstream: UpstreamSettings {
                base_url,
                fetch_timeout,
                fallback,
            },
        })
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Environment variable is not a valid absolute URL.
    #[error("environment variable {key} is not a valid URL: {value}")]
    InvalidUrl {
        /// Variable name.
        key: String,
        /// Offending value.
        value: String,
    },
    /// Environment variable has an unrecognised value.
    #[error("environment variable {key} has invalid value: {value}")]
    InvalidValue {
        /// Variable name.
        key: String,
        /// Offending value.
        value: String,
    },
}

fn parse_url(key: &str, value: &str) -> Result<Url, ConfigError> {
    let invalid = || ConfigError::InvalidUrl {
        key: key.to_string(),
        value: value.to_string(),
    };

    let url = Url::parse(value.trim()).map_err(|_| invalid())?;
    if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") {
        return Err(invalid());
    }
    Ok(url)
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        }),
    }
}

fn parse_u16(value: Option<String>, default: u16) -> u16 {
    value.and_then(|v| v.parse().ok()).unwrap_or(default)
}

fn parse_duration_millis(value: Option<String>, default: Duration) -> Duration {
    value
        .and_then(|v| v.parse::<u64>().ok())
        .filter(|&ms| ms > 0)
        .map_or(default, Duration::from_millis)
}
