//! HTTP/REST API adapter.
//!
//! # Endpoints
//!
//! - `GET /` - Plain text banner
//! - `GET /api/stock-prices` - Quote one symbol or compare two
//! - `GET /health` - JSON health status with like totals
//! - `GET /healthz` - Liveness probe (simple OK)
//! - `GET /metrics` - Prometheus metrics in text format

mod controller;
mod request;
mod response;
mod server;

pub use controller::{AppState, create_router};
pub use request::{StockPricesQuery, caller_address};
pub use response::{ApiError, ErrorResponse, HealthResponse, LikeStatus};
pub use server::{HttpServer, HttpServerError};
