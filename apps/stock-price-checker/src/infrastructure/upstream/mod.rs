//! Upstream Price Proxy Adapters
//!
//! HTTP implementations of `PriceSourcePort`. One adapter is created per
//! known endpoint shape, all sharing a single `reqwest::Client` whose
//! timeout bounds each candidate request.

mod extract;

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Client, Url};

use crate::application::ports::{PriceSourceError, PriceSourcePort};
use crate::domain::symbol::Symbol;
use crate::infrastructure::config::UpstreamSettings;

pub use extract::{price_from_body, price_from_json};

// =============================================================================
// Endpoint Shapes
// =============================================================================

/// Known URL layouts of upstream price proxies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndpointShape {
    /// `{base}/v1/stock/{SYMBOL}/quote`
    VersionedQuote,
    /// `{base}/stock/{SYMBOL}`
    StockPath,
    /// `{base}/?symbol={SYMBOL}`
    RootQuery,
    /// `{base}/quote?symbol={SYMBOL}`
    QuoteQuery,
    /// `{base}`
    Root,
}

impl EndpointShape {
    /// All shapes, most specific first.
    pub const ALL: [Self; 5] = [
        Self::VersionedQuote,
        Self::StockPath,
        Self::RootQuery,
        Self::QuoteQuery,
        Self::Root,
    ];

    /// Build the request URL for `symbol` against `base`.
    ///
    /// Path segments are percent-encoded (space as `%20`); query values are
    /// `application/x-www-form-urlencoded` (space as `+`).
    #[must_use]
    pub fn url_for(self, base: &Url, symbol: &Symbol) -> Url {
        let mut url = base.clone();

        match self {
            Self::VersionedQuote => {
                if let Ok(mut segments) = url.path_segments_mut() {
                    segments
                        .pop_if_empty()
                        .extend(["v1", "stock", symbol.as_str(), "quote"]);
                }
            }
            Self::StockPath => {
                if let Ok(mut segments) = url.path_segments_mut() {
                    segments.pop_if_empty().extend(["stock", symbol.as_str()]);
                }
            }
            Self::RootQuery => {
                if let Ok(mut segments) = url.path_segments_mut() {
                    segments.pop_if_empty().push("");
                }
                url.query_pairs_mut().append_pair("symbol", symbol.as_str());
            }
            Self::QuoteQuery => {
                if let Ok(mut segments) = url.path_segments_mut() {
                    segments.pop_if_empty().push("quote");
                }
                url.query_pairs_mut().append_pair("symbol", symbol.as_str());
            }
            Self::Root => {}
        }

        url
    }
}

// =============================================================================
// HTTP Price Source
// =============================================================================

/// One upstream candidate endpoint.
#[derive(Debug, Clone)]
pub struct HttpPriceSource {
    client: Client,
    base_url: Url,
    shape: EndpointShape,
}

impl HttpPriceSource {
    /// Create a candidate for `shape` against `base_url`.
    #[must_use]
    pub const fn new(client: Client, base_url: Url, shape: EndpointShape) -> Self {
        Self {
            client,
            base_url,
            shape,
        }
    }
}

#[async_trait]
impl PriceSourcePort for HttpPriceSource {
    async fn fetch_price(&self, symbol: &Symbol) -> Result<f64, PriceSourceError> {
        let url = self.shape.url_for(&self.base_url, symbol);

        let response =
            self.client
                .get(url)
                .send()
                .await
                .map_err(|e| PriceSourceError::Transport {
                    message: e.to_string(),
                })?;

        if !response.status().is_success() {
            return Err(PriceSourceError::Status {
                status: response.status().as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| PriceSourceError::Transport {
                message: e.to_string(),
            })?;

        price_from_body(&body).ok_or(PriceSourceError::Unparseable)
    }
}

/// Upstream adapter construction error.
#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    /// HTTP client could not be built.
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(String),
}

/// Build the ordered candidate list for the configured proxy.
///
/// # Errors
///
/// Returns an error if the HTTP client cannot be constructed.
pub fn candidate_sources(
    settings: &UpstreamSettings,
) -> Result<Vec<Arc<dyn PriceSourcePort>>, UpstreamError> {
    let client = Client::builder()
        .timeout(settings.fetch_timeout)
        .user_agent(concat!("stock-price-checker/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| UpstreamError::ClientBuild(e.to_string()))?;

    Ok(EndpointShape::ALL
        .into_iter()
        .map(|shape| {
            Arc::new(HttpPriceSource::new(
                client.clone(),
                settings.base_url.clone(),
                shape,
            )) as Arc<dyn PriceSourcePort>
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(base: &str, shape: EndpointShape, symbol: &str) -> String {
        shape
            .url_for(&Url::parse(base).unwrap(), &Symbol::new(symbol))
            .to_string()
    }

    #[test]
    fn shapes_against_bare_host() {
        let base = "https://proxy.example.com";
        assert_eq!(
            url(base, EndpointShape::VersionedQuote, "aapl"),
            "https://proxy.example.com/v1/stock/AAPL/quote"
        );
        assert_eq!(
            url(base, EndpointShape::StockPath, "aapl"),
            "https://proxy.example.com/stock/AAPL"
        );
        assert_eq!(
            url(base, EndpointShape::RootQuery, "aapl"),
            "https://proxy.example.com/?symbol=AAPL"
        );
        assert_eq!(
            url(base, EndpointShape::QuoteQuery, "aapl"),
            "https://proxy.example.com/quote?symbol=AAPL"
        );
        assert_eq!(
            url(base, EndpointShape::Root, "aapl"),
            "https://proxy.example.com/"
        );
    }

    #[test]
    fn shapes_against_base_path() {
        let base = "http://localhost:8000/api/";
        assert_eq!(
            url(base, EndpointShape::VersionedQuote, "msft"),
            "http://localhost:8000/api/v1/stock/MSFT/quote"
        );
        assert_eq!(
            url(base, EndpointShape::RootQuery, "msft"),
            "http://localhost:8000/api/?symbol=MSFT"
        );
        assert_eq!(
            url(base, EndpointShape::QuoteQuery, "msft"),
            "http://localhost:8000/api/quote?symbol=MSFT"
        );
    }

    #[test]
    fn symbol_is_percent_encoded() {
        let base = "https://proxy.example.com";
        assert_eq!(
            url(base, EndpointShape::StockPath, "a/b c"),
            "https://proxy.example.com/stock/A%2FB%20C"
        );
        assert_eq!(
            url(base, EndpointShape::QuoteQuery, "a&b"),
            "https://proxy.example.com/quote?symbol=A%26B"
        );
    }

    #[test]
    fn query_values_are_form_encoded() {
        let base = "https://proxy.example.com";
        assert_eq!(
            url(base, EndpointShape::QuoteQuery, "brk b"),
            "https://proxy.example.com/quote?symbol=BRK+B"
        );
        assert_eq!(
            url(base, EndpointShape::RootQuery, "brk b"),
            "https://proxy.example.com/?symbol=BRK+B"
        );
        assert_eq!(
            url(base, EndpointShape::StockPath, "brk b"),
            "https://proxy.example.com/stock/BRK%20B"
        );
    }

    #[test]
    fn shapes_are_ordered_most_specific_first() {
        assert_eq!(EndpointShape::ALL[0], EndpointShape::VersionedQuote);
        assert_eq!(EndpointShape::ALL[4], EndpointShape::Root);
    }

    #[test]
    fn builds_one_source_per_shape() {
        let settings = UpstreamSettings::default();
        let sources = candidate_sources(&settings).unwrap();
        assert_eq!(sources.len(), EndpointShape::ALL.len());
    }
}
