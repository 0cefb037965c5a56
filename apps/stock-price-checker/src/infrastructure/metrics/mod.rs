//! Prometheus Metrics Module
//!
//! Exposes application metrics via Prometheus format for monitoring.
//!
//! # Metrics Categories
//!
//! - **Requests**: Stock-price requests by kind and outcome
//! - **Resolution**: Price resolutions by origin, and their latency
//! - **Likes**: New and duplicate likes
//!
//! # Integration
//!
//! Metrics are exposed at `/metrics` on the HTTP server port.

use std::sync::OnceLock;
use std::time::Duration;

use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

use crate::application::ports::{QuoteMetricsPort, ResolutionOutcome};

// =============================================================================
// Global Metrics Handle
// =============================================================================

static PROMETHEUS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Initialize the Prometheus metrics recorder.
///
/// # Panics
///
/// Panics if the recorder cannot be installed.
#[allow(clippy::expect_used)]
pub fn init_metrics() -> PrometheusHandle {
    PROMETHEUS_HANDLE
        .get_or_init(|| {
            let builder = PrometheusBuilder::new();
            let handle = builder
                .install_recorder()
                .expect("failed to install Prometheus recorder");

            register_metrics();
            handle
        })
        .clone()
}

/// Get the Prometheus handle for rendering metrics.
///
/// Returns `None` if metrics have not been initialized.
#[must_use]
pub fn get_metrics_handle() -> Option<PrometheusHandle> {
    PROMETHEUS_HANDLE.get().cloned()
}

// =============================================================================
// Metric Registration
// =============================================================================

fn register_metrics() {
    describe_counter!(
        "stock_checker_requests_total",
        "Total stock-price requests by kind and outcome"
    );
    describe_counter!(
        "stock_checker_price_resolutions_total",
        "Total price resolutions by origin"
    );
    describe_counter!(
        "stock_checker_likes_total",
        "Total like registrations, new or duplicate"
    );
    describe_histogram!(
        "stock_checker_price_resolution_seconds",
        "Time to resolve a price across all candidate sources"
    );
}

// =============================================================================
// Metric Recording Functions
// =============================================================================

/// Request kind label.
#[derive(Debug, Clone, Copy)]
pub enum RequestKind {
    /// One symbol.
    Single,
    /// Two-symbol comparison.
    Pair,
}

impl RequestKind {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Single => "single",
            Self::Pair => "pair",
        }
    }
}

/// Request outcome label.
#[derive(Debug, Clone, Copy)]
pub enum RequestOutcome {
    /// Quote returned.
    Ok,
    /// Rejected input.
    ClientError,
    /// Upstream price sources unavailable.
    Unavailable,
    /// Unexpected failure.
    ServerError,
}

impl RequestOutcome {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::ClientError => "client_error",
            Self::Unavailable => "unavailable",
            Self::ServerError => "server_error",
        }
    }
}

const fn origin_label(outcome: ResolutionOutcome) -> &'static str {
    match outcome {
        ResolutionOutcome::Upstream => "upstream",
        ResolutionOutcome::Synthetic => "synthetic",
        ResolutionOutcome::Unavailable => "unavailable",
    }
}

/// Record a handled stock-price request.
pub fn record_request(kind: Option<RequestKind>, outcome: RequestOutcome) {
    counter!(
        "stock_checker_requests_total",
        "kind" => kind.map_or("unknown", RequestKind::as_str),
        "outcome" => outcome.as_str()
    )
    .increment(1);
}

/// Record a finished price resolution.
pub fn record_price_resolution(outcome: ResolutionOutcome, duration: Duration) {
    counter!(
        "stock_checker_price_resolutions_total",
        "origin" => origin_label(outcome)
    )
    .increment(1);
    histogram!(
        "stock_checker_price_resolution_seconds",
        "origin" => origin_label(outcome)
    )
    .record(duration.as_secs_f64());
}

/// Record a like registration.
pub fn record_like(is_new: bool) {
    counter!(
        "stock_checker_likes_total",
        "result" => if is_new { "new" } else { "duplicate" }
    )
    .increment(1);
}

/// [`QuoteMetricsPort`] backed by the global `metrics` recorder.
#[derive(Debug, Clone, Copy, Default)]
pub struct PrometheusQuoteMetrics;

impl QuoteMetricsPort for PrometheusQuoteMetrics {
    fn price_resolved(&self, outcome: ResolutionOutcome, elapsed: Duration) {
        record_price_resolution(outcome, elapsed);
    }

    fn like_registered(&self, is_new: bool) {
        record_like(is_new);
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_kind_as_str() {
        assert_eq!(RequestKind::Single.as_str(), "single");
        assert_eq!(RequestKind::Pair.as_str(), "pair");
    }

    #[test]
    fn request_outcome_as_str() {
        assert_eq!(RequestOutcome::Ok.as_str(), "ok");
        assert_eq!(RequestOutcome::ClientError.as_str(), "client_error");
        assert_eq!(RequestOutcome::Unavailable.as_str(), "unavailable");
        assert_eq!(RequestOutcome::ServerError.as_str(), "server_error");
    }

    #[test]
    fn resolution_origin_labels() {
        assert_eq!(origin_label(ResolutionOutcome::Upstream), "upstream");
        assert_eq!(origin_label(ResolutionOutcome::Synthetic), "synthetic");
        assert_eq!(origin_label(ResolutionOutcome::Unavailable), "unavailable");
    }

    #[test]
    fn recording_without_recorder_is_noop() {
        record_request(Some(RequestKind::Single), RequestOutcome::Ok);
        record_price_resolution(ResolutionOutcome::Upstream, Duration::from_millis(5));
        record_like(true);
        PrometheusQuoteMetrics.like_registered(false);
    }
}
