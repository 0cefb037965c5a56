//! Quote Aggregator
//!
//! Orchestrates one stock-price request: anonymizes the caller, resolves
//! prices, records likes, and assembles either a single quote or a
//! two-symbol comparison.

use std::sync::Arc;

use crate::application::dto::{
    QuoteError, QuoteRequest, RelativeQuote, SingleQuote, StockData, StockPriceResponse,
    SymbolSelection, relative_likes,
};
use crate::application::ports::{NoopQuoteMetrics, QuoteMetricsPort};
use crate::application::services::price_resolver::{PriceResolver, ResolveError, ResolvedPrice};
use crate::domain::identity::{IdentityToken, anonymize};
use crate::domain::likes::LikeRegistry;
use crate::domain::symbol::Symbol;

impl From<ResolveError> for QuoteError {
    fn from(error: ResolveError) -> Self {
        match error {
            ResolveError::UpstreamUnavailable { symbol } => Self::UpstreamUnavailable { symbol },
        }
    }
}

/// Stock-price use case.
#[derive(Clone)]
pub struct QuoteAggregator {
    resolver: Arc<PriceResolver>,
    likes: Arc<LikeRegistry>,
    metrics: Arc<dyn QuoteMetricsPort>,
}

impl std::fmt::Debug for QuoteAggregator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QuoteAggregator")
            .field("resolver", &self.resolver)
            .field("likes", &self.likes)
            .finish_non_exhaustive()
    }
}

impl QuoteAggregator {
    /// Create an aggregator over a shared resolver and like registry.
    #[must_use]
    pub fn new(resolver: Arc<PriceResolver>, likes: Arc<LikeRegistry>) -> Self {
        Self {
            resolver,
            likes,
            metrics: Arc::new(NoopQuoteMetrics),
        }
    }

    /// Report like registrations to `metrics`.
    #[must_use]
    pub fn with_metrics(mut self, metrics: Arc<dyn QuoteMetricsPort>) -> Self {
        self.metrics = metrics;
        self
    }

    /// The like registry this aggregator records into.
    #[must_use]
    pub const fn likes(&self) -> &Arc<LikeRegistry> {
        &self.likes
    }

    /// Handle a parsed stock-price request.
    ///
    /// # Errors
    ///
    /// `UpstreamUnavailable` when a price cannot be resolved (only with
    /// the synthetic fallback disabled), `Internal` when a resolution task
    /// dies.
    pub async fn aggregate(&self, request: QuoteRequest) -> Result<StockPriceResponse, QuoteError> {
        let identity = anonymize(&request.caller_address);

        let stock_data = match request.symbols {
            SymbolSelection::Single(symbol) => {
                self.single(symbol, request.like, &identity).await?
            }
            SymbolSelection::Pair(a, b) => self.pair(a, b, request.like, &identity).await?,
        };

        Ok(StockPriceResponse { stock_data })
    }

    async fn single(
        &self,
        symbol: Symbol,
        like: bool,
        identity: &IdentityToken,
    ) -> Result<StockData, QuoteError> {
        let resolved = self.resolver.resolve(&symbol).await?;

        if like {
            self.register_like(&symbol, identity);
        }

        let likes = self.likes.count(&symbol);
        Ok(StockData::Single(SingleQuote {
            stock: symbol,
            price: resolved.price,
            likes,
        }))
    }

    async fn pair(
        &self,
        a: Symbol,
        b: Symbol,
        like: bool,
        identity: &IdentityToken,
    ) -> Result<StockData, QuoteError> {
        let (resolved_a, resolved_b) = tokio::join!(
            self.spawn_resolution(a.clone()),
            self.spawn_resolution(b.clone())
        );
        let (resolved_a, resolved_b) = (resolved_a?, resolved_b?);

        if like {
            self.register_like(&a, identity);
            self.register_like(&b, identity);
        }

        let (rel_a, rel_b) = relative_likes(self.likes.count(&a), self.likes.count(&b));

        Ok(StockData::Comparison([
            RelativeQuote {
                stock: a,
                price: resolved_a.price,
                rel_likes: rel_a,
            },
            RelativeQuote {
                stock: b,
                price: resolved_b.price,
                rel_likes: rel_b,
            },
        ]))
    }

    /// Resolve on a separate task so both sides of a pair run in parallel.
    async fn spawn_resolution(&self, symbol: Symbol) -> Result<ResolvedPrice, QuoteError> {
        let resolver = Arc::clone(&self.resolver);
        let handle = tokio::spawn(async move { resolver.resolve(&symbol).await });

        match handle.await {
            Ok(resolved) => resolved.map_err(QuoteError::from),
            Err(e) => Err(QuoteError::Internal(format!("price resolution task failed: {e}"))),
        }
    }

    fn register_like(&self, symbol: &Symbol, identity: &IdentityToken) {
        let is_new = self.likes.register_like(symbol, identity);
        self.metrics.like_registered(is_new);
        tracing::debug!(symbol = %symbol, is_new, "Like registered");
    }
}
