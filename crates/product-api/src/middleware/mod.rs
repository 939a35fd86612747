//! HTTP middleware.

mod request_metrics;

pub use request_metrics::{request_metrics, RequestMetricsState};
