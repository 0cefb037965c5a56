//! Port Interfaces
//!
//! Defines the interfaces (ports) for external systems following
//! the Hexagonal Architecture pattern. These are the contracts that
//! infrastructure adapters must implement.
//!
//! ## Driven Ports (Outbound)
//!
//! - `PriceSourcePort`: One upstream endpoint able to quote a symbol
//! - `QuoteMetricsPort`: Sink for resolution and like metrics

mod price_source;
mod quote_metrics;

#[cfg(test)]
pub use price_source::MockPriceSourcePort;
pub use price_source::{PriceSourceError, PriceSourcePort};
#[cfg(test)]
pub use quote_metrics::MockQuoteMetricsPort;
pub use quote_metrics::{NoopQuoteMetrics, QuoteMetricsPort, ResolutionOutcome};
