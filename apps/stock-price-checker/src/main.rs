//! Stock Price Checker Binary
//!
//! Starts the stock price checker HTTP service.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin stock-price-checker
//! ```
//!
//! # Environment Variables
//!
//! - `PORT`: HTTP listen port (default: 3000)
//! - `STOCK_PROXY_BASE`: Upstream price proxy base URL
//! - `STOCK_PRICE_FETCH_TIMEOUT_MS`: Per-candidate timeout (default: 3000)
//! - `STOCK_PRICE_SYNTHETIC_FALLBACK`: Synthetic price when upstream fails (default: true)
//! - `OTEL_ENABLED`: Enable OpenTelemetry (default: false)
//! - `OTEL_EXPORTER_OTLP_ENDPOINT`: OTLP endpoint (default: <http://localhost:4318>)
//! - `OTEL_SERVICE_NAME`: Service name (default: stock-price-checker)
//! - `RUST_LOG`: Log level (default: info)

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use stock_price_checker::infrastructure::telemetry;
use stock_price_checker::{
    AppState, CheckerConfig, HttpServer, LikeRegistry, PriceResolver, PrometheusQuoteMetrics,
    QuoteAggregator, QuoteMetricsPort, candidate_sources, init_metrics,
};
use tokio::signal;
use tokio_util::sync::CancellationToken;

/// Graceful shutdown timeout.
const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(10);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    load_dotenv();

    let _telemetry_guard = telemetry::init().context("failed to initialize telemetry")?;

    tracing::info!("Starting Stock Price Checker");

    let _metrics_handle = init_metrics();

    let config = CheckerConfig::from_env().context("invalid configuration")?;
    log_config(&config);

    let sources =
        candidate_sources(&config.upstream).context("failed to build upstream price sources")?;
    let quote_metrics: Arc<dyn QuoteMetricsPort> = Arc::new(PrometheusQuoteMetrics);
    let resolver = Arc::new(
        PriceResolver::new(sources, config.upstream.fallback)
            .with_metrics(Arc::clone(&quote_metrics)),
    );
    let likes = Arc::new(LikeRegistry::new());
    let aggregator = Arc::new(QuoteAggregator::new(resolver, likes).with_metrics(quote_metrics));

    let shutdown_token = CancellationToken::new();
    let state = AppState::new(aggregator, env!("CARGO_PKG_VERSION"));
    let server = HttpServer::new(config.server.port, state, shutdown_token.clone());

    let mut server_task = tokio::spawn(server.run());

    tokio::select! {
        () = await_shutdown() => {
            shutdown_token.cancel();
            tracing::info!(
                timeout_secs = SHUTDOWN_TIMEOUT.as_secs(),
                "Graceful shutdown started"
            );
            match tokio::time::timeout(SHUTDOWN_TIMEOUT, &mut server_task).await {
                Ok(joined) => joined.context("HTTP server task failed")??,
                Err(_) => tracing::warn!("Shutdown timed out with requests in flight"),
            }
        }
        joined = &mut server_task => {
            joined.context("HTTP server task failed")??;
        }
    }

    tracing::info!("Stock price checker stopped");
    Ok(())
}

/// Log the parsed configuration.
fn log_config(config: &CheckerConfig) {
    tracing::info!(
        port = config.server.port,
        proxy_base = %config.upstream.base_url,
        fetch_timeout = ?config.upstream.fetch_timeout,
        fallback = ?config.upstream.fallback,
        "Configuration loaded"
    );
}

/// Load .env file from current directory or any ancestor directory.
fn load_dotenv() {
    if dotenvy::dotenv().is_ok() {
        return;
    }

    if let Ok(cwd) = std::env::current_dir() {
        for dir in cwd.ancestors().skip(1) {
            let env_path = dir.join(".env");
            if env_path.exists() {
                let _ = dotenvy::from_path(&env_path);
                return;
            }
        }
    }
}

/// Wait for shutdown signal (SIGTERM or SIGINT).
#[allow(clippy::expect_used)]
async fn await_shutdown() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("signal handler installation is critical for graceful shutdown");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("SIGTERM handler installation is critical for graceful shutdown")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, initiating shutdown");
        }
    }
}
