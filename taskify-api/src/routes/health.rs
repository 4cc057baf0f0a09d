/// Health check endpoint
///
/// Verifies that the server is running and can reach the database.
/// Returns `204 No Content` when healthy and `503 Service Unavailable`
/// when the database probe fails or exceeds its deadline, so load
/// balancers can act on the status code alone.
///
/// # Endpoint
///
/// ```text
/// GET /health
/// ```

use crate::{app::AppState, error::ApiError};
use axum::{extract::State, http::StatusCode};
use std::time::Duration;

/// Deadline for the database probe. A saturated pool must not hang the
/// health check.
const PROBE_TIMEOUT: Duration = Duration::from_secs(1);

/// Health check handler
pub async fn health_check(State(state): State<AppState>) -> Result<StatusCode, ApiError> {
    let probe = sqlx::query("SELECT 1").fetch_one(&state.db);

    match tokio::time::timeout(PROBE_TIMEOUT, probe).await {
        Ok(Ok(_)) => Ok(StatusCode::NO_CONTENT),
        Ok(Err(err)) => {
            tracing::warn!("Health check database probe failed: {}", err);
            Err(ApiError::ServiceUnavailable(
                "database is unreachable".to_string(),
            ))
        }
        Err(_) => {
            tracing::warn!("Health check database probe timed out");
            Err(ApiError::ServiceUnavailable(
                "database probe timed out".to_string(),
            ))
        }
    }
}
