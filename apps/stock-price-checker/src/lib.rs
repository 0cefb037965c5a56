#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::float_cmp,
        clippy::significant_drop_tightening,
        clippy::too_many_lines,
        clippy::needless_pass_by_value,
        clippy::items_after_statements
    )
)]

//! Stock Price Checker - Quote and Like Service
//!
//! An HTTP service that reports the current price of one stock symbol, or
//! compares two, and lets each caller "like" a symbol once. Callers are
//! identified only by a SHA-256 digest of their network address.
//!
//! # Layers (inside → outside)
//!
//! - **Domain**: Core types with no I/O
//!   - `symbol`: Normalized ticker symbols
//!   - `identity`: Caller address anonymization
//!   - `likes`: Deduplicated per-symbol like registry
//!
//! - **Application**: Use cases and port definitions
//!   - `ports`: Price source interface
//!   - `services`: Price resolution with fallback, quote aggregation
//!   - `dto`: Request and response shapes
//!
//! - **Infrastructure**: Adapters and external integrations
//!   - `upstream`: HTTP price proxy candidates
//!   - `http`: Axum REST API and server lifecycle
//!   - `config`: Environment configuration
//!   - `metrics`, `telemetry`: Prometheus and tracing setup
//!
//! # Data Flow
//!
//! ```text
//! GET /api/stock-prices ──► QuoteAggregator ──► PriceResolver ──► candidate 1..N
//!                                 │                    └──────► synthetic fallback
//!                                 └──► LikeRegistry
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

// =============================================================================
// Module Declarations
// =============================================================================

/// Domain layer - Symbols, identities and likes.
pub mod domain;

/// Application layer - Use cases and port definitions.
pub mod application;

/// Infrastructure layer - Adapters and external integrations.
pub mod infrastructure;

// =============================================================================
// Re-exports
// =============================================================================

// Domain types
pub use domain::identity::{IdentityToken, anonymize};
pub use domain::likes::{LikeRegistry, LikeRegistryStats};
pub use domain::symbol::Symbol;

// Application
pub use application::dto::{
    QuoteError, QuoteRequest, RelativeQuote, SingleQuote, StockData, StockPriceResponse,
    SymbolSelection,
};
pub use application::ports::{
    NoopQuoteMetrics, PriceSourceError, PriceSourcePort, QuoteMetricsPort, ResolutionOutcome,
};
pub use application::services::{
    FallbackPolicy, PriceOrigin, PriceResolver, QuoteAggregator, ResolveError, ResolvedPrice,
};

// Infrastructure config
pub use infrastructure::config::{CheckerConfig, ConfigError, ServerSettings, UpstreamSettings};

// HTTP server
pub use infrastructure::http::{AppState, HttpServer, HttpServerError, create_router};

// Upstream candidates
pub use infrastructure::upstream::{EndpointShape, HttpPriceSource, candidate_sources};

// Metrics
pub use infrastructure::metrics::{PrometheusQuoteMetrics, init_metrics};

// Telemetry
pub use infrastructure::telemetry::{
    TelemetryConfig, TelemetryError, TelemetryGuard, init as init_telemetry,
};
