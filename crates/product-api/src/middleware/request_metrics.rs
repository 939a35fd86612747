//! Request instrumentation middleware.
//!
//! Wraps the whole request/response cycle: starts a monotonic timer, lets
//! the request run through the rest of the pipeline, then classifies the
//! outcome and drives the metric emitter to produce the traffic, response
//! time, resource and outcome-class metrics plus transaction attributes.
//!
//! Applied as the outermost layer so it observes every response, including
//! framework-level errors (404, 405, 415, body rejections) that never reach
//! a handler. Instrumentation is invisible to the API consumer: an emitter
//! failure is logged and discarded, never surfaced, and the response passes
//! through unchanged.

use crate::observability::emitter::{EmitError, MetricSink};
use crate::observability::taxonomy::{self, StatusCategory, UNKNOWN_STATUS_CODE};
use axum::{
    extract::{RawPathParams, Request, State},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use std::time::Instant;
use tracing::Instrument;

/// Route parameter treated as the resource identifier. Any bound value
/// counts, with no numeric assumption; collection routes bind nothing and
/// take the non-resource-scoped path.
const RESOURCE_ID_PARAM: &str = "id";

/// State handed to the middleware layer: the injected emitter capability.
#[derive(Clone)]
pub struct RequestMetricsState {
    /// Emitter the middleware reports through.
    pub sink: Arc<dyn MetricSink>,
}

/// Middleware that records the full metric set for every response.
///
/// The reporting step is owned by a guard whose `Drop` runs on every exit
/// path, so a panic unwinding out of the downstream pipeline or the future
/// being dropped on client disconnect still produces a completed
/// observation (with the unknown-status sentinel when no status was ever
/// assigned).
pub async fn request_metrics(
    State(state): State<RequestMetricsState>,
    params: Option<RawPathParams>,
    request: Request,
    next: Next,
) -> Response {
    let method = request.method().to_string();
    let path = request.uri().path().to_string();
    let resource_id = params.as_ref().and_then(|params| {
        params
            .iter()
            .find(|(name, _)| *name == RESOURCE_ID_PARAM)
            .map(|(_, value)| value.to_string())
    });

    tracing::debug!(target: "pa.middleware.metrics", %method, %path, "request started");

    let span = tracing::info_span!("pa.request", %method, %path);
    let mut guard = ReportOnDrop::begin(Arc::clone(&state.sink), method, path, resource_id);

    let response = next.run(request).instrument(span.clone()).await;

    // Report inside the request span so the backend can associate the
    // transaction attributes with this unit of work.
    span.in_scope(|| guard.complete(response.status().as_u16()));

    response
}

/// Ephemeral per-request observation, owned exclusively by one middleware
/// invocation. Finalized exactly once, after the downstream pipeline has
/// returned control.
struct RequestObservation {
    method: String,
    path: String,
    resource_id: Option<String>,
    started_at: Instant,
    completed_at: Option<Instant>,
    status_code: u16,
}

impl RequestObservation {
    fn begin(method: String, path: String, resource_id: Option<String>) -> Self {
        Self {
            method,
            path,
            resource_id,
            started_at: Instant::now(),
            completed_at: None,
            status_code: UNKNOWN_STATUS_CODE,
        }
    }

    fn complete(&mut self, status_code: u16) {
        self.status_code = status_code;
        self.completed_at = Some(Instant::now());
    }

    /// Elapsed milliseconds on the monotonic clock. A completion instant
    /// that does not follow the start instant yields 0, never a negative
    /// value.
    fn duration_ms(&self) -> f64 {
        let completed = self.completed_at.unwrap_or_else(Instant::now);
        completed
            .saturating_duration_since(self.started_at)
            .as_secs_f64()
            * 1000.0
    }

    fn status_category(&self) -> StatusCategory {
        StatusCategory::from_code(self.status_code)
    }
}

/// Guard tying the observation's lifecycle to the middleware invocation.
///
/// `complete` reports with the observed status; if the guard is dropped
/// first (cancellation, unwinding), `Drop` reports with the unknown-status
/// sentinel. Either way the observation is reported exactly once.
struct ReportOnDrop {
    sink: Arc<dyn MetricSink>,
    observation: Option<RequestObservation>,
}

impl ReportOnDrop {
    fn begin(
        sink: Arc<dyn MetricSink>,
        method: String,
        path: String,
        resource_id: Option<String>,
    ) -> Self {
        Self {
            sink,
            observation: Some(RequestObservation::begin(method, path, resource_id)),
        }
    }

    fn complete(&mut self, status_code: u16) {
        if let Some(mut observation) = self.observation.take() {
            observation.complete(status_code);
            report_observation(self.sink.as_ref(), &observation);
        }
    }
}

impl Drop for ReportOnDrop {
    fn drop(&mut self) {
        if let Some(mut observation) = self.observation.take() {
            observation.complete(UNKNOWN_STATUS_CODE);
            report_observation(self.sink.as_ref(), &observation);
        }
    }
}

/// Emit the full metric set for one completed request.
///
/// Each emission is attempted independently: a failing call is logged and
/// discarded without suppressing the ones after it. A dropped metric for
/// one request is acceptable; a failed or delayed response is not.
fn report_observation(sink: &dyn MetricSink, observation: &RequestObservation) {
    let status_code = observation.status_code;
    let category = observation.status_category();
    let duration_ms = observation.duration_ms();
    let method = observation.method.as_str();

    tracing::debug!(
        target: "pa.middleware.metrics",
        method,
        path = %observation.path,
        status_code,
        status_category = %category,
        duration_ms,
        "recording request metrics"
    );

    if !sink.is_attached() {
        tracing::debug!(
            target: "pa.middleware.metrics",
            "monitoring backend not attached; emissions will be dropped"
        );
    }

    // Traffic counters, unconditional.
    emit(
        sink.increment(taxonomy::TRAFFIC_ALL_REQUESTS),
        taxonomy::TRAFFIC_ALL_REQUESTS,
    );
    let name = taxonomy::traffic_status_code(status_code);
    emit(sink.increment(&name), &name);
    let name = taxonomy::traffic_status_category(category);
    emit(sink.increment(&name), &name);
    let name = taxonomy::traffic_method(method);
    emit(sink.increment(&name), &name);

    // Response time values.
    emit(
        sink.record_value(taxonomy::RESPONSE_TIME_ALL_ENDPOINTS, duration_ms),
        taxonomy::RESPONSE_TIME_ALL_ENDPOINTS,
    );
    let name = taxonomy::response_time_method(method);
    emit(sink.record_value(&name, duration_ms), &name);

    // Resource-scoped metrics when the matched route bound an identifier.
    if let Some(resource_id) = observation.resource_id.as_deref() {
        let name = taxonomy::resource_requests(resource_id);
        emit(sink.increment(&name), &name);
        let name = taxonomy::resource_status_code(resource_id, status_code);
        emit(sink.increment(&name), &name);
        let name = taxonomy::resource_status_category(resource_id, category);
        emit(sink.increment(&name), &name);
        let name = taxonomy::resource_method(resource_id, method);
        emit(sink.increment(&name), &name);
        let name = taxonomy::resource_response_time(resource_id);
        emit(sink.record_value(&name, duration_ms), &name);
    }

    // Transaction attributes, when the backend is tracking this request.
    if let Some(transaction) = sink.current_transaction() {
        if let Some(resource_id) = observation.resource_id.as_deref() {
            attach(
                transaction.add_attribute(taxonomy::ATTR_RESOURCE_ID, resource_id.into()),
                taxonomy::ATTR_RESOURCE_ID,
            );
        }
        attach(
            transaction.add_attribute(taxonomy::ATTR_STATUS_CODE, status_code.into()),
            taxonomy::ATTR_STATUS_CODE,
        );
        attach(
            transaction.add_attribute(taxonomy::ATTR_STATUS_CATEGORY, category.as_str().into()),
            taxonomy::ATTR_STATUS_CATEGORY,
        );
        attach(
            transaction.add_attribute(taxonomy::ATTR_HTTP_METHOD, method.into()),
            taxonomy::ATTR_HTTP_METHOD,
        );
        attach(
            transaction.add_attribute(taxonomy::ATTR_RESPONSE_TIME_MS, duration_ms.into()),
            taxonomy::ATTR_RESPONSE_TIME_MS,
        );
        attach(
            transaction.add_attribute(taxonomy::ATTR_PATH, observation.path.as_str().into()),
            taxonomy::ATTR_PATH,
        );
    }

    // Outcome class, mutually exclusive on the status category.
    match category {
        StatusCategory::Success => {
            emit(
                sink.increment(taxonomy::TRAFFIC_SUCCESS),
                taxonomy::TRAFFIC_SUCCESS,
            );
            if let Some(resource_id) = observation.resource_id.as_deref() {
                let name = taxonomy::resource_success(resource_id);
                emit(sink.increment(&name), &name);
            }
        }
        StatusCategory::ClientError => {
            emit(
                sink.increment(taxonomy::TRAFFIC_CLIENT_ERROR),
                taxonomy::TRAFFIC_CLIENT_ERROR,
            );
            if let Some(resource_id) = observation.resource_id.as_deref() {
                let name = taxonomy::resource_client_error(resource_id);
                emit(sink.increment(&name), &name);
            }
        }
        StatusCategory::ServerError => {
            emit(
                sink.increment(taxonomy::TRAFFIC_SERVER_ERROR),
                taxonomy::TRAFFIC_SERVER_ERROR,
            );
            if let Some(resource_id) = observation.resource_id.as_deref() {
                let name = taxonomy::resource_server_error(resource_id);
                emit(sink.increment(&name), &name);
            }
        }
        StatusCategory::Redirect | StatusCategory::Other => {}
    }
}

fn emit(result: Result<(), EmitError>, name: &str) {
    if let Err(error) = result {
        tracing::warn!(
            target: "pa.middleware.metrics",
            metric = name,
            %error,
            "metric emission failed"
        );
    }
}

fn attach(result: Result<(), EmitError>, key: &str) {
    if let Err(error) = result {
        tracing::warn!(
            target: "pa.middleware.metrics",
            attribute = key,
            %error,
            "attribute attachment failed"
        );
    }
}
