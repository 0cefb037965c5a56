//! Like Registry
//!
//! Tracks which anonymized identities have liked each symbol.
//!
//! # Design
//!
//! The registry holds one set of identity tokens per symbol:
//! - A like is recorded at most once per (symbol, identity)
//! - Sets only grow; there is no unlike and no expiry
//! - The like count for a symbol is its set's cardinality
//!
//! The registry is created empty at startup and shared by handle for the
//! lifetime of the process. Nothing is persisted.

use std::collections::{HashMap, HashSet};

use parking_lot::RwLock;

use super::identity::IdentityToken;
use super::symbol::Symbol;

// =============================================================================
// Like Registry
// =============================================================================

/// Process-wide record of likes per symbol.
///
/// Thread-safe: check-and-insert runs under a single write lock, so two
/// concurrent likes from the same identity can never both count.
///
/// # Example
///
/// ```rust
/// use stock_price_checker::domain::identity::anonymize;
/// use stock_price_checker::domain::likes::LikeRegistry;
/// use stock_price_checker::domain::symbol::Symbol;
///
/// let registry = LikeRegistry::new();
/// let aapl = Symbol::new("aapl");
/// let caller = anonymize("203.0.113.7");
///
/// assert!(registry.register_like(&aapl, &caller));
/// assert!(!registry.register_like(&aapl, &caller));
/// assert_eq!(registry.count(&Symbol::new("AAPL")), 1);
/// ```
#[derive(Debug, Default)]
pub struct LikeRegistry {
    likes: RwLock<HashMap<Symbol, HashSet<IdentityToken>>>,
}

impl LikeRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `identity` likes `symbol`.
    ///
    /// Returns `true` if this is a new like, `false` if the identity had
    /// already liked the symbol.
    pub fn register_like(&self, symbol: &Symbol, identity: &IdentityToken) -> bool {
        let mut likes = self.likes.write();
        if let Some(likers) = likes.get_mut(symbol) {
            return likers.insert(identity.clone());
        }

        likes.insert(symbol.clone(), HashSet::from([identity.clone()]));
        true
    }

    /// Number of distinct identities that liked `symbol`.
    #[must_use]
    pub fn count(&self, symbol: &Symbol) -> usize {
        self.likes.read().get(symbol).map_or(0, HashSet::len)
    }

    /// Aggregate totals across all symbols.
    #[must_use]
    pub fn stats(&self) -> LikeRegistryStats {
        let likes = self.likes.read();
        LikeRegistryStats {
            symbols: likes.len(),
            likes: likes.values().map(HashSet::len).sum(),
        }
    }
}

// =============================================================================
// Statistics
// =============================================================================

/// Registry totals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LikeRegistryStats {
    /// Number of symbols with at least one like.
    pub symbols: usize,
    /// Total likes across all symbols.
    pub likes: usize,
}

// =============================================================================
// Tests
// =============================================================================
