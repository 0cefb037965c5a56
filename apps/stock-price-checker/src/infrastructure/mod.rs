//! Infrastructure Layer
//!
//! Adapters around the application core: configuration, the inbound HTTP
//! API, upstream price proxies, metrics and telemetry.

/// Environment configuration.
pub mod config;

/// Axum REST API and server lifecycle.
pub mod http;

/// Prometheus metrics.
pub mod metrics;

/// Logging and OpenTelemetry tracing.
pub mod telemetry;

/// HTTP upstream price proxy candidates.
pub mod upstream;
