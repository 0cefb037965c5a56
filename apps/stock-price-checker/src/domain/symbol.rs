//! Ticker symbols.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A stock ticker, trimmed and uppercased.
///
/// `"aapl"`, `" AAPL "` and `"AAPL"` are the same symbol for pricing and
/// like tracking. Symbols are not checked against any ticker list; a
/// symbol the upstream does not know simply fails to resolve there.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String")]
pub struct Symbol(String);

impl Symbol {
    /// Normalize `raw` into a symbol. Blank input yields an empty symbol;
    /// use [`Symbol::parse`] where that must be rejected.
    #[must_use]
    pub fn new(raw: impl AsRef<str>) -> Self {
        Self(raw.as_ref().trim().to_uppercase())
    }

    /// Normalize a raw query value, or `None` if nothing is left after trimming.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        Some(Self::new(raw)).filter(|symbol| !symbol.0.is_empty())
    }

    /// The normalized ticker.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for Symbol {
    fn from(raw: String) -> Self {
        Self::new(raw)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
