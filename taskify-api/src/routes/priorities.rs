/// Priority catalog endpoint
///
/// Priorities are a fixed, shared catalog seeded at startup. There is no
/// per-user scoping and no write surface.
///
/// # Endpoints
///
/// - `GET /v1/priorities/` - List all priorities

use crate::{app::AppState, error::ApiResult};
use axum::{extract::State, Json};
use serde::Serialize;
use taskify_shared::models::priority::Priority;

/// Public view of a priority
#[derive(Debug, Serialize)]
pub struct PriorityResponse {
    pub id: i64,
    pub name: String,
}

impl From<Priority> for PriorityResponse {
    fn from(priority: Priority) -> Self {
        Self {
            id: priority.id,
            name: priority.name,
        }
    }
}

/// Lists every priority, ordered by id.
pub async fn list_priorities(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<PriorityResponse>>> {
    let priorities = state.service.get_priorities(&state.db).await?;

    Ok(Json(priorities.into_iter().map(Into::into).collect()))
}
