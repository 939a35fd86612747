//! Test doubles for the metric emitter.
//!
//! `RecordingSink` captures every emission so tests can assert on the exact
//! metric taxonomy; `FailingSink` fails every call so tests can prove that
//! emission faults never reach the request being served.

use super::emitter::{AttributeValue, EmitError, MetricSink, Transaction};
use std::sync::{Arc, Mutex};

/// One captured emission.
#[derive(Debug, Clone, PartialEq)]
pub enum Emission {
    /// `increment(name)`
    Count { name: String },
    /// `record_value(name, value)`
    Value { name: String, value: f64 },
    /// `Transaction::add_attribute(key, value)`
    Attribute { key: String, value: String },
}

/// A sink that records everything and never fails.
pub struct RecordingSink {
    emissions: Arc<Mutex<Vec<Emission>>>,
    has_transaction: bool,
    attached: bool,
}

impl Default for RecordingSink {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingSink {
    /// Attached sink with an active transaction, the common case.
    pub fn new() -> Self {
        Self {
            emissions: Arc::new(Mutex::new(Vec::new())),
            has_transaction: true,
            attached: true,
        }
    }

    /// Attached sink whose backend is not tracking a transaction for the
    /// current request (`current_transaction()` returns `None`).
    pub fn without_transaction() -> Self {
        Self {
            has_transaction: false,
            ..Self::new()
        }
    }

    /// Sink reporting no backend hook present.
    pub fn detached() -> Self {
        Self {
            attached: false,
            ..Self::new()
        }
    }

    /// Everything recorded so far, in emission order.
    pub fn emissions(&self) -> Vec<Emission> {
        self.emissions.lock().unwrap().clone()
    }

    /// Number of `Count` emissions under `name`.
    pub fn count_of(&self, name: &str) -> usize {
        self.emissions()
            .iter()
            .filter(|e| matches!(e, Emission::Count { name: n } if n == name))
            .count()
    }

    /// The last `Value` emission under `name`.
    pub fn value_of(&self, name: &str) -> Option<f64> {
        self.emissions().iter().rev().find_map(|e| match e {
            Emission::Value { name: n, value } if n == name => Some(*value),
            _ => None,
        })
    }

    /// The last attribute attached under `key`, rendered as a string.
    pub fn attribute(&self, key: &str) -> Option<String> {
        self.emissions().iter().rev().find_map(|e| match e {
            Emission::Attribute { key: k, value } if k == key => Some(value.clone()),
            _ => None,
        })
    }

    /// Names of all metric emissions (counts and values, not attributes).
    pub fn metric_names(&self) -> Vec<String> {
        self.emissions()
            .iter()
            .filter_map(|e| match e {
                Emission::Count { name } | Emission::Value { name, .. } => Some(name.clone()),
                Emission::Attribute { .. } => None,
            })
            .collect()
    }

    /// Discard everything recorded so far.
    pub fn clear(&self) {
        self.emissions.lock().unwrap().clear();
    }
}

impl MetricSink for RecordingSink {
    fn increment(&self, name: &str) -> Result<(), EmitError> {
        self.emissions.lock().unwrap().push(Emission::Count {
            name: name.to_string(),
        });
        Ok(())
    }

    fn record_value(&self, name: &str, value: f64) -> Result<(), EmitError> {
        self.emissions.lock().unwrap().push(Emission::Value {
            name: name.to_string(),
            value,
        });
        Ok(())
    }

    fn current_transaction(&self) -> Option<Box<dyn Transaction>> {
        if self.has_transaction {
            Some(Box::new(RecordingTransaction {
                emissions: Arc::clone(&self.emissions),
            }))
        } else {
            None
        }
    }

    fn is_attached(&self) -> bool {
        self.attached
    }
}

struct RecordingTransaction {
    emissions: Arc<Mutex<Vec<Emission>>>,
}

impl Transaction for RecordingTransaction {
    fn add_attribute(&self, key: &str, value: AttributeValue) -> Result<(), EmitError> {
        self.emissions.lock().unwrap().push(Emission::Attribute {
            key: key.to_string(),
            value: value.to_string(),
        });
        Ok(())
    }
}

/// A sink whose every call fails, simulating a total backend outage.
pub struct FailingSink;

impl MetricSink for FailingSink {
    fn increment(&self, _name: &str) -> Result<(), EmitError> {
        Err(EmitError::Rejected("simulated backend outage".to_string()))
    }

    fn record_value(&self, _name: &str, _value: f64) -> Result<(), EmitError> {
        Err(EmitError::Rejected("simulated backend outage".to_string()))
    }

    fn current_transaction(&self) -> Option<Box<dyn Transaction>> {
        // A transaction handle is offered so the attribute path is
        // exercised too; attaching to it fails like everything else.
        Some(Box::new(FailingTransaction))
    }

    fn is_attached(&self) -> bool {
        true
    }
}

struct FailingTransaction;

impl Transaction for FailingTransaction {
    fn add_attribute(&self, _key: &str, _value: AttributeValue) -> Result<(), EmitError> {
        Err(EmitError::Rejected("simulated backend outage".to_string()))
    }
}
