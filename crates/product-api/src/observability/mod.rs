//! Observability: the metric emitter capability, the metric name taxonomy,
//! and the Prometheus recorder the production emitter reports into.

pub mod emitter;
pub mod taxonomy;

// Test doubles are compiled for unit tests and, via the `test-utils`
// feature, for pa-test-utils and the integration tests. They intentionally
// use unwrap/expect to fail tests loudly.
#[cfg(any(test, feature = "test-utils"))]
#[allow(clippy::unwrap_used, clippy::expect_used)]
pub mod testing;

use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};

/// Install the process-wide Prometheus metrics recorder and return the
/// handle used to serve `/metrics`.
///
/// Response-time observations are reported in milliseconds, so the duration
/// histograms get millisecond-scale buckets.
///
/// # Errors
///
/// Returns an error if a recorder is already installed. The caller is
/// expected to continue with a detached emitter in that case; a missing
/// backend is never fatal.
pub fn init_metrics_recorder() -> Result<PrometheusHandle, String> {
    const DURATION_MS_BUCKETS: &[f64] = &[
        1.0, 5.0, 10.0, 25.0, 50.0, 100.0, 250.0, 500.0, 1000.0, 2500.0, 5000.0,
    ];

    PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Prefix("ResponseTime".to_string()),
            DURATION_MS_BUCKETS,
        )
        .map_err(|e| format!("Failed to set response time buckets: {e}"))?
        // Resource/{id}/ResponseTime values share the same scale
        .set_buckets_for_metric(Matcher::Suffix("ResponseTime".to_string()), DURATION_MS_BUCKETS)
        .map_err(|e| format!("Failed to set resource response time buckets: {e}"))?
        .install_recorder()
        .map_err(|e| format!("Failed to install Prometheus metrics recorder: {e}"))
}
