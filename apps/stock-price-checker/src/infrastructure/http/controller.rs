//! HTTP Controller (Driver Adapter)
//!
//! Axum router for the stock price checker. Stock-price requests are
//! parsed here and delegated to the quote aggregator.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use axum::{
    Json, Router,
    extract::{ConnectInfo, Request, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use chrono::Utc;
use tracing::Instrument;
use uuid::Uuid;

use crate::application::dto::{QuoteRequest, SymbolSelection};
use crate::application::services::QuoteAggregator;
use crate::infrastructure::metrics::{
    RequestKind, RequestOutcome, get_metrics_handle, record_request,
};

use super::request::{StockPricesQuery, caller_address};
use super::response::{ApiError, HealthResponse};

/// Banner served at `/`.
const INDEX_BANNER: &str = "Stock Price Checker API - /api/stock-prices";

/// Application state shared across handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Stock-price use case.
    pub aggregator: Arc<QuoteAggregator>,
    /// Application version.
    pub version: String,
    /// Process start, for uptime reporting.
    pub started_at: Instant,
}

impl AppState {
    /// Create state for `aggregator`, starting the uptime clock now.
    #[must_use]
    pub fn new(aggregator: Arc<QuoteAggregator>, version: impl Into<String>) -> Self {
        Self {
            aggregator,
            version: version.into(),
            started_at: Instant::now(),
        }
    }
}

/// Create the HTTP router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/api/stock-prices", get(stock_prices))
        .route("/health", get(health_check))
        .route("/healthz", get(liveness))
        .route("/metrics", get(metrics))
        .with_state(state)
}

async fn index() -> impl IntoResponse {
    INDEX_BANNER
}

/// Stock price endpoint.
///
/// Takes the whole request because the caller address may come from
/// either a header or the connection info extension.
async fn stock_prices(State(state): State<AppState>, request: Request) -> Response {
    let span = tracing::info_span!("stock_prices", request_id = %Uuid::new_v4());

    async move {
        let query = StockPricesQuery::parse(request.uri().query());
        let peer = request
            .extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| *addr);
        let caller_address = caller_address(request.headers(), peer);

        let symbols = match SymbolSelection::from_values(&query.symbols) {
            Ok(symbols) => symbols,
            Err(err) => {
                let err = ApiError(err);
                record_request(None, err.outcome());
                return err.into_response();
            }
        };

        let kind = match symbols {
            SymbolSelection::Single(_) => RequestKind::Single,
            SymbolSelection::Pair(..) => RequestKind::Pair,
        };

        let result = state
            .aggregator
            .aggregate(QuoteRequest {
                symbols,
                like: query.like,
                caller_address,
            })
            .await;

        match result {
            Ok(body) => {
                record_request(Some(kind), RequestOutcome::Ok);
                Json(body).into_response()
            }
            Err(err) => {
                let err = ApiError(err);
                record_request(Some(kind), err.outcome());
                err.into_response()
            }
        }
    }
    .instrument(span)
    .await
}

/// Health check endpoint.
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: state.version.clone(),
        uptime_secs: state.started_at.elapsed().as_secs(),
        current_time: Utc::now(),
        likes: state.aggregator.likes().stats().into(),
    })
}

async fn liveness() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

async fn metrics() -> impl IntoResponse {
    get_metrics_handle().map_or_else(
        || {
            (
                StatusCode::SERVICE_UNAVAILABLE,
                [("content-type", "text/plain")],
                "Metrics not initialized".to_string(),
            )
        },
        |handle| {
            (
                StatusCode::OK,
                [("content-type", "text/plain; version=0.0.4; charset=utf-8")],
                handle.render(),
            )
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{MockPriceSourcePort, PriceSourcePort, QuoteMetricsPort};
    use crate::application::services::{FallbackPolicy, PriceResolver};
    use crate::domain::likes::LikeRegistry;
    use crate::infrastructure::metrics::{PrometheusQuoteMetrics, init_metrics};
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    fn create_test_state(price: f64) -> AppState {
        let mut source = MockPriceSourcePort::new();
        source.expect_fetch_price().returning(move |_| Ok(price));

        let sources: Vec<Arc<dyn PriceSourcePort>> = vec![Arc::new(source)];
        let resolver = Arc::new(PriceResolver::new(sources, FallbackPolicy::Synthetic));
        let aggregator = Arc::new(QuoteAggregator::new(
            resolver,
            Arc::new(LikeRegistry::new()),
        ));

        AppState::new(aggregator, "1.0.0-test")
    }

    async fn fetch(app: Router, uri: &str) -> (StatusCode, Vec<u8>) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, body.to_vec())
    }

    #[tokio::test]
    async fn index_serves_banner() {
        let (status, body) = fetch(create_router(create_test_state(1.0)), "/").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, INDEX_BANNER.as_bytes());
    }

    #[tokio::test]
    async fn liveness_returns_ok() {
        let (status, body) = fetch(create_router(create_test_state(1.0)), "/healthz").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"OK");
    }

    #[tokio::test]
    async fn health_reports_like_totals() {
        let state = create_test_state(1.0);
        let app = create_router(state.clone());

        let (status, _) = fetch(app.clone(), "/api/stock-prices?stock=aapl&like=true").await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = fetch(app, "/health").await;
        assert_eq!(status, StatusCode::OK);

        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["status"], "healthy");
        assert_eq!(json["version"], "1.0.0-test");
        assert_eq!(json["likes"]["symbols"], 1);
        assert_eq!(json["likes"]["total"], 1);
        assert!(json["current_time"].is_string());
    }

    #[tokio::test]
    async fn single_quote_uses_source_price() {
        let (status, body) = fetch(
            create_router(create_test_state(189.5)),
            "/api/stock-prices?stock=aapl",
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "stockData": { "stock": "AAPL", "price": 189.5, "likes": 0 } })
        );
    }

    #[tokio::test]
    async fn missing_symbol_is_rejected() {
        let (status, body) = fetch(create_router(create_test_state(1.0)), "/api/stock-prices").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "stock query param is required");
    }

    #[tokio::test]
    async fn rejected_request_records_no_like() {
        let state = create_test_state(1.0);
        let app = create_router(state.clone());

        let (status, _) = fetch(app, "/api/stock-prices?stock=&like=true").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(state.aggregator.likes().stats().likes, 0);
    }

    #[tokio::test]
    async fn metrics_endpoint_renders_recorded_series() {
        init_metrics();

        let mut source = MockPriceSourcePort::new();
        source.expect_fetch_price().returning(|_| Ok(2.0));
        let sources: Vec<Arc<dyn PriceSourcePort>> = vec![Arc::new(source)];
        let recorder: Arc<dyn QuoteMetricsPort> = Arc::new(PrometheusQuoteMetrics);
        let resolver = Arc::new(
            PriceResolver::new(sources, FallbackPolicy::Synthetic)
                .with_metrics(Arc::clone(&recorder)),
        );
        let aggregator = Arc::new(
            QuoteAggregator::new(resolver, Arc::new(LikeRegistry::new())).with_metrics(recorder),
        );
        let app = create_router(AppState::new(aggregator, "1.0.0-test"));

        let (status, _) = fetch(app.clone(), "/api/stock-prices?stock=aapl&like=true").await;
        assert_eq!(status, StatusCode::OK);

        let response = app
            .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(
            response.headers()["content-type"]
                .to_str()
                .unwrap()
                .starts_with("text/plain")
        );

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let rendered = String::from_utf8(body.to_vec()).unwrap();
        assert!(rendered.contains("stock_checker_requests_total"), "{rendered}");
        assert!(rendered.contains("kind=\"single\""), "{rendered}");
        assert!(rendered.contains("stock_checker_price_resolutions_total"), "{rendered}");
        assert!(rendered.contains("origin=\"upstream\""), "{rendered}");
        assert!(rendered.contains("stock_checker_likes_total"), "{rendered}");
    }
}
