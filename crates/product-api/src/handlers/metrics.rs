//! Prometheus scrape endpoint.
//!
//! Unauthenticated so the collector can scrape it; only operational data
//! with bounded names is exposed. The route is mounted only when a recorder
//! was installed at startup.

use axum::{extract::State, response::IntoResponse};
use metrics_exporter_prometheus::PrometheusHandle;

/// Handler for GET /metrics
///
/// Renders the recorder's current state in Prometheus text format.
#[tracing::instrument(skip_all, name = "pa.metrics.scrape")]
pub async fn metrics_handler(State(handle): State<PrometheusHandle>) -> impl IntoResponse {
    handle.render()
}
