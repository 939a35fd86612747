//! HTTP routes for the Product API.
//!
//! Defines the Axum router and application state.

use crate::config::Config;
use crate::handlers;
use crate::middleware::{request_metrics, RequestMetricsState};
use crate::observability::emitter::MetricSink;
use axum::{
    middleware,
    routing::get,
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use sqlx::SqlitePool;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: SqlitePool,

    /// Service configuration.
    pub config: Config,

    /// Metric emitter driven by the request instrumentation middleware.
    pub metric_sink: Arc<dyn MetricSink>,
}

/// Build the application routes.
///
/// Creates an Axum router with:
/// - `/api/products` and `/api/products/{id}` - Product CRUD
/// - `/health` - Health check (database ping)
/// - `/metrics` - Prometheus scrape endpoint, mounted only when a recorder
///   was installed (`metrics_handle` is `Some`)
/// - TraceLayer for request logging
/// - Request timeout from configuration
/// - Request instrumentation middleware (outermost, so it observes every
///   response including framework-level 404/405/415)
pub fn build_routes(state: Arc<AppState>, metrics_handle: Option<PrometheusHandle>) -> Router {
    let api_routes = Router::new()
        .route(
            "/api/products",
            get(handlers::list_products).post(handlers::create_product),
        )
        .route(
            "/api/products/:id",
            get(handlers::get_product)
                .put(handlers::update_product)
                .delete(handlers::delete_product),
        )
        .route("/health", get(handlers::health_check))
        .with_state(state.clone());

    // Scrape endpoint with its own state; absent when running detached.
    let routes = if let Some(handle) = metrics_handle {
        api_routes.merge(
            Router::new()
                .route("/metrics", get(handlers::metrics_handler))
                .with_state(handle),
        )
    } else {
        api_routes
    };

    let metrics_state = RequestMetricsState {
        sink: Arc::clone(&state.metric_sink),
    };

    // Layer order (bottom-to-top execution):
    // 1. TimeoutLayer - Timeout the request (innermost)
    // 2. TraceLayer - Log request details
    // 3. request_metrics - Record ALL responses (outermost)
    routes
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(
            state.config.request_timeout_seconds,
        )))
        .layer(middleware::from_fn_with_state(
            metrics_state,
            request_metrics,
        ))
}
