/// Category management endpoints
///
/// Categories are visible to their creator plus the unowned defaults.
/// Creation checks the name against that visible set; deletion is
/// restricted to the creator, which also protects the defaults.
///
/// # Endpoints
///
/// - `GET /v1/categories/` - List visible categories
/// - `POST /v1/categories/` - Create a category
/// - `DELETE /v1/categories/:id` - Delete an owned category

use crate::{
    app::{AppState, CurrentUser},
    error::ApiResult,
    routes::{validation_errors, Pagination},
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use taskify_shared::models::category::{Category, CreateCategory};
use uuid::Uuid;
use validator::Validate;

/// Create category request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCategoryRequest {
    /// Category name, unique within the creator's visible set
    #[validate(length(min = 1, max = 100, message = "Name must be 1 to 100 characters"))]
    pub name: String,
}

/// Public view of a category
#[derive(Debug, Serialize)]
pub struct CategoryResponse {
    pub id: i64,
    pub name: String,
    pub created_by_id: Option<Uuid>,
}

impl From<Category> for CategoryResponse {
    fn from(category: Category) -> Self {
        Self {
            id: category.id,
            name: category.name,
            created_by_id: category.created_by_id,
        }
    }
}

/// Lists the categories visible to the current user.
///
/// # Errors
///
/// - `400 Bad Request`: Pagination parameters out of range
pub async fn list_categories(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Query(pagination): Query<Pagination>,
) -> ApiResult<Json<Vec<CategoryResponse>>> {
    pagination.validate()?;

    let categories = state
        .service
        .get_categories(&state.db, current_user.id, pagination.skip, pagination.limit)
        .await?;

    Ok(Json(categories.into_iter().map(Into::into).collect()))
}

/// Creates a category owned by the current user.
///
/// # Errors
///
/// - `409 Conflict`: A category with this name is already visible
/// - `422 Unprocessable Entity`: Validation failed
pub async fn create_category(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Json(req): Json<CreateCategoryRequest>,
) -> ApiResult<(StatusCode, Json<CategoryResponse>)> {
    req.validate().map_err(validation_errors)?;

    let category = state
        .service
        .add_category(
            &state.db,
            CreateCategory {
                name: req.name,
                created_by_id: Some(current_user.id),
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(category.into())))
}

/// Deletes a category owned by the current user.
///
/// # Errors
///
/// - `403 Forbidden`: The category belongs to someone else or is a default
/// - `404 Not Found`: No category with this id
pub async fn delete_category(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    state
        .service
        .delete_category(&state.db, id, current_user.id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
