//! Metric emitter capability.
//!
//! The middleware never talks to a monitoring backend directly; it drives a
//! [`MetricSink`] handed to it by reference at startup. The production
//! implementation forwards to the process-wide `metrics` facade (recorded by
//! the Prometheus exporter when one was installed) and to the active tracing
//! span for transaction attributes. Tests substitute a recording or failing
//! double.
//!
//! Every call may fail (backend absent, transaction expired) and callers are
//! expected to catch, log and discard each failure independently; nothing
//! raised here may ever reach the request being served.

use metrics::{counter, histogram};
use std::fmt;
use thiserror::Error;
use tracing::Span;

/// Emission failure. Callers log and discard these; they never propagate.
#[derive(Debug, Error)]
pub enum EmitError {
    /// The backend refused or failed to accept the observation.
    #[error("monitoring backend rejected emission: {0}")]
    Rejected(String),
}

/// A transaction attribute value: a string or a number.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    Text(String),
    Int(i64),
    Float(f64),
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::Text(s) => f.write_str(s),
            AttributeValue::Int(n) => write!(f, "{n}"),
            AttributeValue::Float(n) => write!(f, "{n}"),
        }
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        AttributeValue::Text(value.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        AttributeValue::Text(value)
    }
}

impl From<u16> for AttributeValue {
    fn from(value: u16) -> Self {
        AttributeValue::Int(i64::from(value))
    }
}

impl From<i64> for AttributeValue {
    fn from(value: i64) -> Self {
        AttributeValue::Int(value)
    }
}

impl From<f64> for AttributeValue {
    fn from(value: f64) -> Self {
        AttributeValue::Float(value)
    }
}

/// Handle to the in-flight unit of work tracked by the monitoring backend,
/// distinct from a database transaction.
pub trait Transaction {
    /// Attach a descriptive tag to the transaction. A stale handle or a
    /// backend rejection surfaces as `Err`, which the caller suppresses.
    fn add_attribute(&self, key: &str, value: AttributeValue) -> Result<(), EmitError>;
}

/// Capability for sending named numeric observations to a monitoring agent
/// that may or may not be present at runtime.
///
/// Implementations must be cheap and non-blocking: no I/O on the request
/// path, no locks held across slow work. A sink with no backend attached
/// turns every call into a no-op rather than an error.
pub trait MetricSink: Send + Sync {
    /// Record a counter-style observation (`name += 1`).
    fn increment(&self, name: &str) -> Result<(), EmitError>;

    /// Record a point-value observation (`name = value`).
    fn record_value(&self, name: &str, value: f64) -> Result<(), EmitError>;

    /// The in-flight transaction for the current request, if the backend is
    /// tracking one. Absent when the backend is detached or the unit of work
    /// has already been torn down.
    fn current_transaction(&self) -> Option<Box<dyn Transaction>>;

    /// Whether the backend's runtime hook is present. Informational only:
    /// request handling never branches on this beyond logging.
    fn is_attached(&self) -> bool;
}

/// Production sink.
///
/// Counter observations go through [`metrics::counter!`] and point values
/// through [`metrics::histogram!`]; with no recorder installed the facade
/// drops them silently, which is exactly the required detached behavior.
/// Transaction attributes are emitted as structured events on the current
/// request span.
pub struct AgentSink {
    attached: bool,
}

impl AgentSink {
    /// Sink for a process where the Prometheus recorder was installed.
    pub fn attached() -> Self {
        Self { attached: true }
    }

    /// Sink for a process running without a metrics backend. Calls still
    /// succeed; the facade discards them.
    pub fn detached() -> Self {
        Self { attached: false }
    }
}

impl MetricSink for AgentSink {
    fn increment(&self, name: &str) -> Result<(), EmitError> {
        counter!(name.to_owned()).increment(1);
        Ok(())
    }

    fn record_value(&self, name: &str, value: f64) -> Result<(), EmitError> {
        histogram!(name.to_owned()).record(value);
        Ok(())
    }

    fn current_transaction(&self) -> Option<Box<dyn Transaction>> {
        let span = Span::current();
        if span.is_none() {
            None
        } else {
            Some(Box::new(SpanTransaction { span }))
        }
    }

    fn is_attached(&self) -> bool {
        self.attached
    }
}

/// Transaction handle backed by the request's tracing span.
struct SpanTransaction {
    span: Span,
}

impl Transaction for SpanTransaction {
    fn add_attribute(&self, key: &str, value: AttributeValue) -> Result<(), EmitError> {
        self.span.in_scope(|| {
            tracing::debug!(
                target: "pa.transaction",
                attribute = key,
                value = %value,
                "transaction attribute"
            );
        });
        Ok(())
    }
}
