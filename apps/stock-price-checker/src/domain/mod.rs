//! Domain Layer - Core quote and like types.
//!
//! This layer contains the types the service reasons about: ticker
//! symbols, anonymized caller identities, and the like registry. Nothing
//! here performs I/O.

/// Anonymized caller identities.
pub mod identity;

/// Per-symbol like tracking.
pub mod likes;

/// Ticker symbol value object.
pub mod symbol;
