//! Data Transfer Objects
//!
//! Request and response shapes exchanged between the HTTP adapter and the
//! quote aggregator. The response types serialize to the public JSON
//! contract directly.

use serde::{Deserialize, Serialize};

use crate::domain::symbol::Symbol;

// =============================================================================
// Request
// =============================================================================

/// One symbol, or an ordered pair to compare.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SymbolSelection {
    /// Quote a single symbol.
    Single(Symbol),
    /// Compare two symbols, preserving caller order.
    Pair(Symbol, Symbol),
}

impl SymbolSelection {
    /// Build a selection from raw query values.
    ///
    /// # Errors
    ///
    /// `MissingSymbol` when no usable value is present (or one of a pair is
    /// blank), `TooManySymbols` when more than two values are given.
    pub fn from_values<I, S>(values: I) -> Result<Self, QuoteError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let values: Vec<S> = values.into_iter().collect();

        match values.as_slice() {
            [] => Err(QuoteError::MissingSymbol),
            [only] => Symbol::parse(only.as_ref())
                .map(Self::Single)
                .ok_or(QuoteError::MissingSymbol),
            [first, second] => {
                match (Symbol::parse(first.as_ref()), Symbol::parse(second.as_ref())) {
                    (Some(a), Some(b)) => Ok(Self::Pair(a, b)),
                    _ => Err(QuoteError::MissingSymbol),
                }
            }
            more => Err(QuoteError::TooManySymbols { count: more.len() }),
        }
    }
}

/// A parsed stock-price request.
#[derive(Debug, Clone)]
pub struct QuoteRequest {
    /// Symbols to quote.
    pub symbols: SymbolSelection,
    /// Whether the caller likes the requested symbols.
    pub like: bool,
    /// Best-effort caller network address, possibly empty.
    pub caller_address: String,
}

// =============================================================================
// Response
// =============================================================================

/// Top-level response body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockPriceResponse {
    /// Quote data, an object or a two-element array.
    #[serde(rename = "stockData")]
    pub stock_data: StockData,
}

/// Quote data for one symbol or a comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StockData {
    /// Single symbol with its absolute like count.
    Single(SingleQuote),
    /// Two symbols with like counts relative to each other.
    Comparison([RelativeQuote; 2]),
}

/// Price and likes for a single symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SingleQuote {
    /// Uppercase ticker.
    pub stock: Symbol,
    /// Resolved price.
    pub price: f64,
    /// Number of distinct identities that liked the symbol.
    pub likes: usize,
}

/// Price and relative likes for one side of a comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelativeQuote {
    /// Uppercase ticker.
    pub stock: Symbol,
    /// Resolved price.
    pub price: f64,
    /// This symbol's likes minus the other symbol's likes.
    pub rel_likes: i64,
}

/// Signed like differences for a pair, `(a - b, b - a)`.
///
/// The two values always sum to zero.
#[must_use]
pub fn relative_likes(likes_a: usize, likes_b: usize) -> (i64, i64) {
    let a = i64::try_from(likes_a).unwrap_or(i64::MAX);
    let b = i64::try_from(likes_b).unwrap_or(i64::MAX);
    (a - b, b - a)
}

// =============================================================================
// Errors
// =============================================================================

/// Quote aggregation failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QuoteError {
    /// No symbol was supplied.
    #[error("stock query param is required")]
    MissingSymbol,

    /// More symbols than can be compared.
    #[error("at most two stock symbols may be compared")]
    TooManySymbols {
        /// Number of symbols supplied.
        count: usize,
    },

    /// Every price source failed and the synthetic fallback is disabled.
    #[error("price source unavailable for {symbol}")]
    UpstreamUnavailable {
        /// Symbol that could not be priced.
        symbol: String,
    },

    /// Unexpected failure while assembling the response.
    #[error("internal error: {0}")]
    Internal(String),
}
