//! Price Resolver
//!
//! Resolves a price by walking an ordered list of candidate sources and
//! taking the first usable answer. Candidate failures are expected and
//! are never reported individually.
//!
//! When every candidate fails, the outcome depends on [`FallbackPolicy`]:
//! the default synthesizes a random price so a response can always be
//! produced, the alternative reports the upstream as unavailable.

use std::sync::Arc;
use std::time::Instant;

use rand::Rng;

use crate::application::ports::{
    NoopQuoteMetrics, PriceSourcePort, QuoteMetricsPort, ResolutionOutcome,
};
use crate::domain::symbol::Symbol;

/// Exclusive upper bound of synthetic prices, in cents.
const SYNTHETIC_PRICE_CENTS_MAX: u32 = 100_000;

/// What to do when every candidate source fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FallbackPolicy {
    /// Return a random price in `[0, 1000)`.
    #[default]
    Synthetic,
    /// Fail with [`ResolveError::UpstreamUnavailable`].
    Disabled,
}

/// Where a resolved price came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceOrigin {
    /// A real upstream answer, from the candidate at this index.
    Upstream {
        /// Index into the resolver's source list.
        candidate: usize,
    },
    /// The synthetic fallback. Not a real quote.
    Synthetic,
}

/// A price together with its origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedPrice {
    /// The price.
    pub price: f64,
    /// Where the price came from.
    pub origin: PriceOrigin,
}

impl ResolvedPrice {
    /// Whether this price came from an upstream source.
    #[must_use]
    pub const fn is_upstream(&self) -> bool {
        matches!(self.origin, PriceOrigin::Upstream { .. })
    }
}

/// Price resolution failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    /// All candidates failed and the synthetic fallback is disabled.
    #[error("no price source could quote {symbol}")]
    UpstreamUnavailable {
        /// Symbol that could not be priced.
        symbol: String,
    },
}

/// Sequential multi-source price resolver.
pub struct PriceResolver {
    sources: Vec<Arc<dyn PriceSourcePort>>,
    fallback: FallbackPolicy,
    metrics: Arc<dyn QuoteMetricsPort>,
}

impl std::fmt::Debug for PriceResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PriceResolver")
            .field("sources", &self.sources.len())
            .field("fallback", &self.fallback)
            .finish()
    }
}

impl PriceResolver {
    /// Create a resolver over `sources`, tried in order.
    #[must_use]
    pub fn new(sources: Vec<Arc<dyn PriceSourcePort>>, fallback: FallbackPolicy) -> Self {
        Self {
            sources,
            fallback,
            metrics: Arc::new(NoopQuoteMetrics),
        }
    }

    /// Report resolution outcomes to `metrics`.
    #[must_use]
    pub fn with_metrics(mut self, metrics: Arc<dyn QuoteMetricsPort>) -> Self {
        self.metrics = metrics;
        self
    }

    /// Resolve the current price for `symbol`.
    ///
    /// Candidates are queried one at a time; the first finite,
    /// non-negative price wins.
    ///
    /// # Errors
    ///
    /// Only with [`FallbackPolicy::Disabled`], when every candidate fails.
    pub async fn resolve(&self, symbol: &Symbol) -> Result<ResolvedPrice, ResolveError> {
        let started = Instant::now();

        for (candidate, source) in self.sources.iter().enumerate() {
            match source.fetch_price(symbol).await {
                Ok(price) if is_usable_price(price) => {
                    self.metrics
                        .price_resolved(ResolutionOutcome::Upstream, started.elapsed());
                    return Ok(ResolvedPrice {
                        price,
                        origin: PriceOrigin::Upstream { candidate },
                    });
                }
                Ok(_) | Err(_) => {}
            }
        }

        match self.fallback {
            FallbackPolicy::Synthetic => {
                let price = synthetic_price();
                tracing::warn!(
                    symbol = %symbol,
                    price,
                    candidates = self.sources.len(),
                    "All price sources failed, using synthetic price"
                );
                self.metrics
                    .price_resolved(ResolutionOutcome::Synthetic, started.elapsed());
                Ok(ResolvedPrice {
                    price,
                    origin: PriceOrigin::Synthetic,
                })
            }
            FallbackPolicy::Disabled => {
                tracing::warn!(
                    symbol = %symbol,
                    candidates = self.sources.len(),
                    "All price sources failed"
                );
                self.metrics
                    .price_resolved(ResolutionOutcome::Unavailable, started.elapsed());
                Err(ResolveError::UpstreamUnavailable {
                    symbol: symbol.to_string(),
                })
            }
        }
    }
}

/// Random price in `[0, 1000)` with two decimal places.
#[must_use]
pub fn synthetic_price() -> f64 {
    let cents = rand::rng().random_range(0..SYNTHETIC_PRICE_CENTS_MAX);
    f64::from(cents) / 100.0
}

/// Whether an upstream value can be served as a price: finite and not negative.
#[must_use]
pub fn is_usable_price(price: f64) -> bool {
    price.is_finite() && price >= 0.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{MockPriceSourcePort, MockQuoteMetricsPort, PriceSourceError};
    use proptest::prelude::*;
    use test_case::test_case;

    fn failing(times: usize) -> Arc<dyn PriceSourcePort> {
        let mut source = MockPriceSourcePort::new();
        source
            .expect_fetch_price()
            .times(times)
            .returning(|_| Err(PriceSourceError::Status { status: 404 }));
        Arc::new(source)
    }

    fn quoting(price: f64, times: usize) -> Arc<dyn PriceSourcePort> {
        let mut source = MockPriceSourcePort::new();
        source
            .expect_fetch_price()
            .times(times)
            .returning(move |_| Ok(price));
        Arc::new(source)
    }

    fn assert_synthetic_range(price: f64) {
        assert!(price.is_finite());
        assert!((0.0..1000.0).contains(&price), "price {price} out of range");
        assert!(((price * 100.0).round() - price * 100.0).abs() < 1e-6);
    }

    #[tokio::test]
    async fn first_success_wins_and_stops() {
        let resolver = PriceResolver::new(
            vec![quoting(101.5, 1), quoting(999.0, 0)],
            FallbackPolicy::Synthetic,
        );

        let resolved = resolver.resolve(&Symbol::new("AAPL")).await.unwrap();

        assert_eq!(resolved.price, 101.5);
        assert_eq!(resolved.origin, PriceOrigin::Upstream { candidate: 0 });
    }

    #[tokio::test]
    async fn failures_advance_to_next_candidate() {
        let resolver = PriceResolver::new(
            vec![failing(1), failing(1), quoting(42.0, 1), quoting(7.0, 0)],
            FallbackPolicy::Synthetic,
        );

        let resolved = resolver.resolve(&Symbol::new("MSFT")).await.unwrap();

        assert_eq!(resolved.price, 42.0);
        assert_eq!(resolved.origin, PriceOrigin::Upstream { candidate: 2 });
        assert!(resolved.is_upstream());
    }

    #[tokio::test]
    async fn unusable_values_are_skipped() {
        let resolver = PriceResolver::new(
            vec![
                quoting(f64::NAN, 1),
                quoting(f64::INFINITY, 1),
                quoting(-3.0, 1),
                quoting(0.0, 1),
            ],
            FallbackPolicy::Synthetic,
        );

        let resolved = resolver.resolve(&Symbol::new("XYZ")).await.unwrap();

        assert_eq!(resolved.price, 0.0);
        assert_eq!(resolved.origin, PriceOrigin::Upstream { candidate: 3 });
    }

    #[tokio::test]
    async fn exhaustion_yields_synthetic_price() {
        let resolver = PriceResolver::new(
            vec![failing(1), failing(1), failing(1)],
            FallbackPolicy::Synthetic,
        );

        let resolved = resolver.resolve(&Symbol::new("XYZ")).await.unwrap();

        assert_eq!(resolved.origin, PriceOrigin::Synthetic);
        assert!(!resolved.is_upstream());
        assert_synthetic_range(resolved.price);
    }

    #[tokio::test]
    async fn no_sources_yields_synthetic_price() {
        let resolver = PriceResolver::new(vec![], FallbackPolicy::Synthetic);

        let resolved = resolver.resolve(&Symbol::new("XYZ")).await.unwrap();

        assert_eq!(resolved.origin, PriceOrigin::Synthetic);
        assert_synthetic_range(resolved.price);
    }

    #[tokio::test]
    async fn disabled_fallback_reports_unavailable() {
        let resolver = PriceResolver::new(vec![failing(1), failing(1)], FallbackPolicy::Disabled);

        let err = resolver.resolve(&Symbol::new("xyz")).await.unwrap_err();

        assert_eq!(
            err,
            ResolveError::UpstreamUnavailable {
                symbol: "XYZ".to_string()
            }
        );
    }

    #[tokio::test]
    async fn sources_receive_normalized_symbol() {
        let mut source = MockPriceSourcePort::new();
        source
            .expect_fetch_price()
            .withf(|symbol| symbol.as_str() == "GOOG")
            .times(1)
            .returning(|_| Ok(1.0));
        let resolver = PriceResolver::new(vec![Arc::new(source)], FallbackPolicy::Disabled);

        resolver.resolve(&Symbol::new("goog")).await.unwrap();
    }

    #[test_case(0.0 => true; "zero")]
    #[test_case(187.42 => true; "positive")]
    #[test_case(-0.01 => false; "negative")]
    #[test_case(f64::NAN => false; "nan")]
    #[test_case(f64::INFINITY => false; "infinite")]
    fn usable_price(price: f64) -> bool {
        is_usable_price(price)
    }

    fn expecting(outcome: ResolutionOutcome) -> Arc<dyn QuoteMetricsPort> {
        let mut metrics = MockQuoteMetricsPort::new();
        metrics
            .expect_price_resolved()
            .withf(move |reported, _| *reported == outcome)
            .times(1)
            .return_const(());
        Arc::new(metrics)
    }

    #[tokio::test]
    async fn upstream_outcome_is_reported() {
        let resolver = PriceResolver::new(
            vec![failing(1), quoting(3.0, 1)],
            FallbackPolicy::Synthetic,
        )
        .with_metrics(expecting(ResolutionOutcome::Upstream));

        resolver.resolve(&Symbol::new("AAPL")).await.unwrap();
    }

    #[tokio::test]
    async fn synthetic_outcome_is_reported() {
        let resolver = PriceResolver::new(vec![failing(1)], FallbackPolicy::Synthetic)
            .with_metrics(expecting(ResolutionOutcome::Synthetic));

        resolver.resolve(&Symbol::new("AAPL")).await.unwrap();
    }

    #[tokio::test]
    async fn unavailable_outcome_is_reported() {
        let resolver = PriceResolver::new(vec![failing(1)], FallbackPolicy::Disabled)
            .with_metrics(expecting(ResolutionOutcome::Unavailable));

        resolver.resolve(&Symbol::new("AAPL")).await.unwrap_err();
    }

    proptest! {
        #[test]
        fn synthetic_price_in_range(_seed in 0u8..64) {
            let price = synthetic_price();
            prop_assert!(price.is_finite());
            prop_assert!((0.0..1000.0).contains(&price));
        }
    }
}
