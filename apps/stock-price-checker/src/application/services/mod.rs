//! Application Services
//!
//! Services that orchestrate domain logic and coordinate between ports.
//!
//! - `PriceResolver`: Walks candidate price sources with a fallback path
//! - `QuoteAggregator`: Handles a full stock-price request

/// Ordered multi-source price resolution.
pub mod price_resolver;

/// Stock-price request orchestration.
pub mod quote_aggregator;

pub use price_resolver::{
    FallbackPolicy, PriceOrigin, PriceResolver, ResolveError, ResolvedPrice, is_usable_price,
    synthetic_price,
};
pub use quote_aggregator::QuoteAggregator;
