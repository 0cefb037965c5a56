//! Price Source Port (Driven Port)
//!
//! Interface for a single upstream candidate that may be able to price a
//! symbol. Candidates are expected to fail often; the resolver treats any
//! error as "try the next one".

use async_trait::async_trait;

use crate::domain::symbol::Symbol;

/// Failure of a single price source.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PriceSourceError {
    /// Connection, TLS, or timeout failure.
    #[error("price source transport error: {message}")]
    Transport {
        /// Error details.
        message: String,
    },

    /// Upstream answered with a non-success status.
    #[error("price source returned status {status}")]
    Status {
        /// HTTP status code.
        status: u16,
    },

    /// Response body held no usable price.
    #[error("price source response has no usable price")]
    Unparseable,
}

/// Port for one upstream price candidate.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PriceSourcePort: Send + Sync {
    /// Fetch the current price for `symbol`.
    async fn fetch_price(&self, symbol: &Symbol) -> Result<f64, PriceSourceError>;
}
