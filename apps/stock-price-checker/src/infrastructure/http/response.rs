//! HTTP response types.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::application::dto::QuoteError;
use crate::domain::likes::LikeRegistryStats;
use crate::infrastructure::metrics::RequestOutcome;

/// Generic message returned for unexpected failures.
const SERVER_ERROR_MESSAGE: &str = "server error";

/// Message returned when no price could be resolved.
const UNAVAILABLE_MESSAGE: &str = "price source unavailable";

/// Health check response.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Always "healthy" while the process serves requests.
    pub status: String,
    /// Service version.
    pub version: String,
    /// Server uptime in seconds.
    pub uptime_secs: u64,
    /// Current time.
    pub current_time: DateTime<Utc>,
    /// Like registry totals.
    pub likes: LikeStatus,
}

/// Like registry totals.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct LikeStatus {
    /// Symbols with at least one like.
    pub symbols: usize,
    /// Likes across all symbols.
    pub total: usize,
}

impl From<LikeRegistryStats> for LikeStatus {
    fn from(stats: LikeRegistryStats) -> Self {
        Self {
            symbols: stats.symbols,
            total: stats.likes,
        }
    }
}

/// Error response body.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Short, client-safe message.
    pub error: String,
}

/// `QuoteError` rendered as an HTTP response.
#[derive(Debug)]
pub struct ApiError(pub QuoteError);

impl ApiError {
    /// HTTP status for the wrapped error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self.0 {
            QuoteError::MissingSymbol | QuoteError::TooManySymbols { .. } => {
                StatusCode::BAD_REQUEST
            }
            QuoteError::UpstreamUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            QuoteError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Metrics outcome label for the wrapped error.
    #[must_use]
    pub const fn outcome(&self) -> RequestOutcome {
        match self.0 {
            QuoteError::MissingSymbol | QuoteError::TooManySymbols { .. } => {
                RequestOutcome::ClientError
            }
            QuoteError::UpstreamUnavailable { .. } => RequestOutcome::Unavailable,
            QuoteError::Internal(_) => RequestOutcome::ServerError,
        }
    }
}

impl From<QuoteError> for ApiError {
    fn from(err: QuoteError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self.0 {
            QuoteError::MissingSymbol | QuoteError::TooManySymbols { .. } => self.0.to_string(),
            QuoteError::UpstreamUnavailable { .. } => UNAVAILABLE_MESSAGE.to_string(),
            QuoteError::Internal(detail) => {
                tracing::error!(error = %detail, "Stock price request failed");
                SERVER_ERROR_MESSAGE.to_string()
            }
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(err: QuoteError) -> (StatusCode, serde_json::Value) {
        let response = ApiError(err).into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn missing_symbol_is_bad_request() {
        let (status, json) = body_json(QuoteError::MissingSymbol).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json, serde_json::json!({ "error": "stock query param is required" }));
    }

    #[tokio::test]
    async fn too_many_symbols_is_bad_request() {
        let (status, json) = body_json(QuoteError::TooManySymbols { count: 3 }).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            json,
            serde_json::json!({ "error": "at most two stock symbols may be compared" })
        );
    }

    #[tokio::test]
    async fn unavailable_hides_symbol() {
        let (status, json) = body_json(QuoteError::UpstreamUnavailable {
            symbol: "AAPL".to_string(),
        })
        .await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(json, serde_json::json!({ "error": "price source unavailable" }));
    }

    #[tokio::test]
    async fn internal_detail_is_not_leaked() {
        let (status, json) = body_json(QuoteError::Internal("task panicked".to_string())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json, serde_json::json!({ "error": "server error" }));
    }

    #[test]
    fn like_status_from_stats() {
        let status = LikeStatus::from(LikeRegistryStats {
            symbols: 2,
            likes: 5,
        });
        assert_eq!(status.symbols, 2);
        assert_eq!(status.total, 5);
    }
}
