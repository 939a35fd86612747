//! Health check handler.

use crate::errors::ApiError;
use crate::models::HealthResponse;
use crate::routes::AppState;
use axum::extract::State;
use axum::Json;
use std::sync::Arc;
use tracing::instrument;

/// Handler for GET /health
///
/// Pings the database and reports the service status. An unreachable
/// database still yields a 200 with `"unhealthy"` so orchestrators can read
/// the body rather than seeing a dropped probe.
#[instrument(skip_all, name = "pa.health.check")]
pub async fn health_check(
    State(state): State<Arc<AppState>>,
) -> Result<Json<HealthResponse>, ApiError> {
    let db_healthy = sqlx::query("SELECT 1").fetch_one(&state.pool).await.is_ok();

    let status = if db_healthy { "healthy" } else { "unhealthy" };

    Ok(Json(HealthResponse {
        status: status.to_string(),
        database: status.to_string(),
    }))
}
