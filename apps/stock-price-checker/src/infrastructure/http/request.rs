//! HTTP request parsing.
//!
//! Query-string and caller-address extraction for `/api/stock-prices`.

use std::net::SocketAddr;

use axum::http::HeaderMap;

/// Query keys that carry a symbol, in any mix and order.
const SYMBOL_KEYS: [&str; 3] = ["stock", "stock[]", "symbol"];

/// Header consulted for the original client address behind a proxy.
const FORWARDED_FOR: &str = "x-forwarded-for";

/// Raw `/api/stock-prices` query parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StockPricesQuery {
    /// Symbol values in query order, not yet validated.
    pub symbols: Vec<String>,
    /// Whether the like flag was truthy.
    pub like: bool,
}

impl StockPricesQuery {
    /// Parse a raw (still percent-encoded) query string.
    #[must_use]
    pub fn parse(query: Option<&str>) -> Self {
        let mut symbols = Vec::new();
        let mut like = None;

        for (key, value) in url::form_urlencoded::parse(query.unwrap_or_default().as_bytes()) {
            if SYMBOL_KEYS.iter().any(|symbol_key| key == *symbol_key) {
                symbols.push(value.into_owned());
            } else if key == "like" && like.is_none() {
                like = Some(is_truthy(&value));
            }
        }

        Self {
            symbols,
            like: like.unwrap_or(false),
        }
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(value, "true" | "on")
}

/// Best-effort caller address.
///
/// First entry of `X-Forwarded-For`, then the TCP peer IP, then empty.
#[must_use]
pub fn caller_address(headers: &HeaderMap, peer: Option<SocketAddr>) -> String {
    headers
        .get(FORWARDED_FOR)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|first| !first.is_empty())
        .map(ToString::to_string)
        .or_else(|| peer.map(|addr| addr.ip().to_string()))
        .unwrap_or_default()
}
