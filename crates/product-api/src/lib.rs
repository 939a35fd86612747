//! Product API Service Library
//!
//! A small HTTP service exposing CRUD operations over a product catalog,
//! instrumented by a request-metrics middleware that reports traffic and
//! latency observations to a monitoring backend.
//!
//! # Architecture
//!
//! ```text
//! routes/mod.rs -> middleware/*.rs -> handlers/*.rs -> repositories/*.rs
//! ```
//!
//! The instrumentation middleware is the outermost layer: it times every
//! request, classifies the final status code, and drives the injected
//! metric emitter ([`observability::emitter::MetricSink`]). Emitter
//! failures are logged and discarded; they never alter a response.
//!
//! # Modules
//!
//! - `config` - Service configuration from environment
//! - `errors` - Error types with HTTP status code mapping
//! - `handlers` - HTTP request handlers
//! - `middleware` - Request instrumentation
//! - `models` - Data models
//! - `observability` - Metric emitter, name taxonomy, Prometheus recorder
//! - `repositories` - Database access
//! - `routes` - Axum router setup

pub mod config;
pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod observability;
pub mod repositories;
pub mod routes;
