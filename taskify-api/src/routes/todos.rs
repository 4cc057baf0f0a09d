/// Todo management endpoints
///
/// Todos are strictly private to their creator. Every mutation re-checks
/// ownership and category validity in the service layer; the handlers
/// only shape requests and responses.
///
/// # Endpoints
///
/// - `GET /v1/todos/` - List own todos
/// - `POST /v1/todos/` - Create a todo
/// - `PUT /v1/todos/:id` - Update an owned todo
/// - `DELETE /v1/todos/:id` - Delete an owned todo

use crate::{
    app::{AppState, CurrentUser},
    error::ApiResult,
    routes::categories::CategoryResponse,
    routes::priorities::PriorityResponse,
    routes::{validation_errors, Pagination},
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use taskify_shared::service::{NewTodo, TodoDetails, TodoUpdate};
use validator::Validate;

/// Create todo request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTodoRequest {
    /// Todo text
    #[validate(length(min = 1, message = "Content must not be empty"))]
    pub content: String,

    /// Priority id, must reference an existing priority
    pub priority_id: i64,

    /// Category ids to attach; each must be visible to the creator
    #[serde(default)]
    pub categories_ids: Vec<i64>,
}

/// Update todo request. The full desired state, not a patch.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateTodoRequest {
    /// Todo text
    #[validate(length(min = 1, message = "Content must not be empty"))]
    pub content: String,

    /// Completion state
    pub is_completed: bool,

    /// Priority id, must reference an existing priority
    pub priority_id: i64,

    /// Replacement category set; each id must be visible to the owner
    #[serde(default)]
    pub categories_ids: Vec<i64>,
}

/// A todo with its priority and categories resolved to full objects.
#[derive(Debug, Serialize)]
pub struct TodoResponse {
    pub id: i64,
    pub content: String,
    pub is_completed: bool,
    pub priority: PriorityResponse,
    pub categories: Vec<CategoryResponse>,
}

impl From<TodoDetails> for TodoResponse {
    fn from(details: TodoDetails) -> Self {
        Self {
            id: details.todo.id,
            content: details.todo.content,
            is_completed: details.todo.is_completed,
            priority: details.priority.into(),
            categories: details.categories.into_iter().map(Into::into).collect(),
        }
    }
}

/// Lists the current user's todos, hydrated with priority and categories.
///
/// # Errors
///
/// - `400 Bad Request`: Pagination parameters out of range
pub async fn list_todos(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Query(pagination): Query<Pagination>,
) -> ApiResult<Json<Vec<TodoResponse>>> {
    pagination.validate()?;

    let todos = state
        .service
        .get_todos(&state.db, current_user.id, pagination.skip, pagination.limit)
        .await?;

    Ok(Json(todos.into_iter().map(Into::into).collect()))
}

/// Creates a todo owned by the current user.
///
/// # Errors
///
/// - `400 Bad Request`: Unknown priority, or a category that is invalid
///   or not visible to the creator
/// - `422 Unprocessable Entity`: Validation failed
pub async fn create_todo(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Json(req): Json<CreateTodoRequest>,
) -> ApiResult<(StatusCode, Json<TodoResponse>)> {
    req.validate().map_err(validation_errors)?;

    let details = state
        .service
        .add_todo(
            &state.db,
            NewTodo {
                content: req.content,
                created_by_id: current_user.id,
                priority_id: req.priority_id,
                categories_ids: req.categories_ids,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(details.into())))
}

/// Replaces an owned todo with the requested state, including its
/// category set.
///
/// # Errors
///
/// - `400 Bad Request`: Unknown priority or invalid category set
/// - `403 Forbidden`: The todo belongs to someone else
/// - `404 Not Found`: No todo with this id
/// - `422 Unprocessable Entity`: Validation failed
pub async fn update_todo(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateTodoRequest>,
) -> ApiResult<Json<TodoResponse>> {
    req.validate().map_err(validation_errors)?;

    let details = state
        .service
        .update_todo(
            &state.db,
            TodoUpdate {
                id,
                content: req.content,
                is_completed: req.is_completed,
                priority_id: req.priority_id,
                created_by_id: current_user.id,
                categories_ids: req.categories_ids,
            },
        )
        .await?;

    Ok(Json(details.into()))
}

/// Deletes an owned todo. Category links cascade away with the row.
///
/// # Errors
///
/// - `403 Forbidden`: The todo belongs to someone else
/// - `404 Not Found`: No todo with this id
pub async fn delete_todo(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    state
        .service
        .delete_todo(&state.db, id, current_user.id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
