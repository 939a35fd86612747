//! Metric name taxonomy and status classification.
//!
//! The names produced here are the wire contract toward the monitoring
//! backend: dashboards key off them, so they are built from a closed table
//! of templates rather than ad hoc concatenation, and the exact strings are
//! pinned by tests. `{code}`, `{category}`, `{method}` and `{id}` are
//! substituted literally, case-preserving, with no extra prefix or suffix.

use std::fmt;

/// Status code sentinel for "the downstream pipeline never produced a
/// status" (connection torn down before completion). Classifies as `Other`.
pub const UNKNOWN_STATUS_CODE: u16 = 0;

// ============================================================================
// Status classification
// ============================================================================

/// Coarse classification of an HTTP status code.
///
/// Total over the full `u16` range: codes below 200 (including the unknown
/// sentinel 0) and between 400-class boundaries fall through to `Other`,
/// while everything at or above 500 is `ServerError` regardless of whether
/// it is a registered status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCategory {
    /// 200..=299
    Success,
    /// 300..=399
    Redirect,
    /// 400..=499
    ClientError,
    /// 500 and above
    ServerError,
    /// Everything else, including informational 1xx and the unknown sentinel
    Other,
}

impl StatusCategory {
    /// Classify a status code. Pure and total; never fails.
    pub fn from_code(code: u16) -> Self {
        match code {
            200..=299 => StatusCategory::Success,
            300..=399 => StatusCategory::Redirect,
            400..=499 => StatusCategory::ClientError,
            500..=u16::MAX => StatusCategory::ServerError,
            _ => StatusCategory::Other,
        }
    }

    /// The label used in metric names and transaction attributes.
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusCategory::Success => "2xx",
            StatusCategory::Redirect => "3xx",
            StatusCategory::ClientError => "4xx",
            StatusCategory::ServerError => "5xx",
            StatusCategory::Other => "Other",
        }
    }
}

impl fmt::Display for StatusCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Traffic and response-time metric names
// ============================================================================

/// Counter: every request, unconditionally.
pub const TRAFFIC_ALL_REQUESTS: &str = "Traffic/AllRequests";

/// Counter: requests that completed with a 2xx status.
pub const TRAFFIC_SUCCESS: &str = "Traffic/Success";

/// Counter: requests that completed with a 4xx status.
pub const TRAFFIC_CLIENT_ERROR: &str = "Traffic/ClientError";

/// Counter: requests that completed with a 5xx status.
pub const TRAFFIC_SERVER_ERROR: &str = "Traffic/ServerError";

/// Value: request duration in milliseconds, all endpoints.
pub const RESPONSE_TIME_ALL_ENDPOINTS: &str = "ResponseTime/AllEndpoints";

/// `Traffic/StatusCode/{code}`
pub fn traffic_status_code(code: u16) -> String {
    format!("Traffic/StatusCode/{code}")
}

/// `Traffic/StatusCategory/{category}`
pub fn traffic_status_category(category: StatusCategory) -> String {
    format!("Traffic/StatusCategory/{category}")
}

/// `Traffic/Method/{method}`
pub fn traffic_method(method: &str) -> String {
    format!("Traffic/Method/{method}")
}

/// `ResponseTime/{method}`
pub fn response_time_method(method: &str) -> String {
    format!("ResponseTime/{method}")
}

// ============================================================================
// Resource-scoped metric names
// ============================================================================

/// `Resource/{id}/Requests`
pub fn resource_requests(id: &str) -> String {
    format!("Resource/{id}/Requests")
}

/// `Resource/{id}/StatusCode/{code}`
pub fn resource_status_code(id: &str, code: u16) -> String {
    format!("Resource/{id}/StatusCode/{code}")
}

/// `Resource/{id}/StatusCategory/{category}`
pub fn resource_status_category(id: &str, category: StatusCategory) -> String {
    format!("Resource/{id}/StatusCategory/{category}")
}

/// `Resource/{id}/Method/{method}`
pub fn resource_method(id: &str, method: &str) -> String {
    format!("Resource/{id}/Method/{method}")
}

/// `Resource/{id}/ResponseTime`
pub fn resource_response_time(id: &str) -> String {
    format!("Resource/{id}/ResponseTime")
}

/// `Resource/{id}/Success`
pub fn resource_success(id: &str) -> String {
    format!("Resource/{id}/Success")
}

/// `Resource/{id}/ClientError`
pub fn resource_client_error(id: &str) -> String {
    format!("Resource/{id}/ClientError")
}

/// `Resource/{id}/ServerError`
pub fn resource_server_error(id: &str) -> String {
    format!("Resource/{id}/ServerError")
}

// ============================================================================
// Transaction attribute keys
// ============================================================================

/// Attribute: the resource identifier bound by the matched route.
pub const ATTR_RESOURCE_ID: &str = "resourceId";

/// Attribute: numeric HTTP status code.
pub const ATTR_STATUS_CODE: &str = "statusCode";

/// Attribute: coarse status category label.
pub const ATTR_STATUS_CATEGORY: &str = "statusCategory";

/// Attribute: HTTP verb.
pub const ATTR_HTTP_METHOD: &str = "httpMethod";

/// Attribute: request duration in milliseconds.
pub const ATTR_RESPONSE_TIME_MS: &str = "responseTimeMs";

/// Attribute: request URL path.
pub const ATTR_PATH: &str = "path";
