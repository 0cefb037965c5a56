//! Price extraction from upstream response bodies.
//!
//! Upstream proxies do not agree on a response shape, so extraction tries
//! a fixed list of known shapes and takes the first usable number:
//!
//! 1. A top-level field: `latestPrice`, `price`, `latest_price`, `c`
//! 2. A nested `quote` object: `quote.latestPrice`, `quote.price`
//! 3. The JSON body itself being a number or numeric string
//! 4. A non-JSON body whose text is a number

use serde_json::Value;

use crate::application::services::is_usable_price;

/// Top-level field names, in priority order.
const PRICE_FIELDS: [&str; 4] = ["latestPrice", "price", "latest_price", "c"];

/// Field names inside a nested `quote` object, in priority order.
const NESTED_QUOTE_FIELDS: [&str; 2] = ["latestPrice", "price"];

/// Extract a price from a raw response body.
#[must_use]
pub fn price_from_body(body: &str) -> Option<f64> {
    serde_json::from_str::<Value>(body).map_or_else(
        |_| parse_numeric_text(body),
        |value| price_from_json(&value),
    )
}

/// Extract a price from a parsed JSON body.
#[must_use]
pub fn price_from_json(body: &Value) -> Option<f64> {
    PRICE_FIELDS
        .iter()
        .find_map(|field| body.get(field).and_then(numeric))
        .or_else(|| {
            body.get("quote").and_then(|quote| {
                NESTED_QUOTE_FIELDS
                    .iter()
                    .find_map(|field| quote.get(field).and_then(numeric))
            })
        })
        .or_else(|| numeric(body))
}

fn numeric(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64().filter(|&p| is_usable_price(p)),
        Value::String(s) => parse_numeric_text(s),
        _ => None,
    }
}

fn parse_numeric_text(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|&p| is_usable_price(p))
}
