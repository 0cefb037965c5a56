//! Quote Metrics Port (Driven Port)
//!
//! Interface through which the quote use cases report what happened to
//! a metrics backend. Recording must never fail or block a request.

use std::time::Duration;

/// How a price resolution finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionOutcome {
    /// A real upstream answer.
    Upstream,
    /// The synthetic fallback.
    Synthetic,
    /// No price produced.
    Unavailable,
}

/// Port for quote-path metrics.
#[cfg_attr(test, mockall::automock)]
pub trait QuoteMetricsPort: Send + Sync {
    /// A price resolution finished after `elapsed`.
    fn price_resolved(&self, outcome: ResolutionOutcome, elapsed: Duration);

    /// A like was registered; `is_new` is false for a repeat.
    fn like_registered(&self, is_new: bool);
}

/// Recorder that drops everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopQuoteMetrics;

impl QuoteMetricsPort for NoopQuoteMetrics {
    fn price_resolved(&self, _outcome: ResolutionOutcome, _elapsed: Duration) {}

    fn like_registered(&self, _is_new: bool) {}
}
