//! HTTP handlers for the Task Service.
//!
//! Each handler maps one verb on `/tasks` onto a single task store call.
//! Request bodies are extracted as `Result<Json<_>, JsonRejection>` so that
//! malformed JSON is reported with the same error body as everything else.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use serde_json::Value;

use super::dto::{CreateTaskRequest, UpdateTaskRequest};
use super::error::ApiErrorResponse;
use crate::domain::{Task, TaskId};
use crate::infrastructure::TaskRepository;

// =============================================================================
// Application State
// =============================================================================

/// Shared application dependencies.
///
/// The repository is a trait object so the backend chosen by
/// `RepositoryFactory` at startup can be swapped without touching handlers.
#[derive(Clone)]
pub struct AppState {
    /// Task store.
    pub task_repository: Arc<dyn TaskRepository>,
}

impl AppState {
    /// Creates a new `AppState` around a task store.
    #[must_use]
    pub fn new(task_repository: Arc<dyn TaskRepository>) -> Self {
        Self { task_repository }
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.debug_struct("AppState").finish_non_exhaustive()
    }
}

// =============================================================================
// GET /tasks/{id} Handler
// =============================================================================

/// Fetches one task by id.
///
/// # Response
///
/// - **200 OK**: The stored record
/// - **404 Not Found**: No record has that id
/// - **500 Internal Server Error**: Store failure
///
/// # Errors
///
/// Returns [`ApiErrorResponse`] when the record is absent or the store fails.
pub async fn get_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Task>, ApiErrorResponse> {
    let id = TaskId::new(id);

    state
        .task_repository
        .find_by_id(&id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiErrorResponse::not_found(format!("Task not found: {id}")))
}

// =============================================================================
// GET /tasks Handler
// =============================================================================

/// Lists every stored task, in no particular order.
///
/// # Errors
///
/// Returns [`ApiErrorResponse`] if the store fails.
pub async fn list_tasks(State(state): State<AppState>) -> Result<Json<Vec<Task>>, ApiErrorResponse> {
    let tasks = state.task_repository.scan().await?;
    tracing::debug!(count = tasks.len(), "Listed tasks");
    Ok(Json(tasks))
}

// =============================================================================
// POST /tasks Handler
// =============================================================================

/// Stores a task at its id, overwriting any existing record.
///
/// # Request Body
///
/// ```json
/// {
///   "id": "t1",
///   "title": "Buy milk",
///   "description": "2%",
///   "priority": "low"
/// }
/// ```
///
/// `id` may be omitted, in which case a UUID v7 is generated.
///
/// # Response
///
/// - **201 Created**: The stored record
/// - **400 Bad Request**: Malformed JSON or validation error
/// - **500 Internal Server Error**: Store failure
///
/// # Errors
///
/// Returns [`ApiErrorResponse`] on invalid input or store failure.
pub async fn create_task(
    State(state): State<AppState>,
    payload: Result<Json<CreateTaskRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Task>), ApiErrorResponse> {
    let Json(request) = payload?;
    let task = request.into_task(TaskId::generate_v7)?;

    state.task_repository.put(&task).await?;
    tracing::info!(id = %task.id, "Task stored");

    Ok((StatusCode::CREATED, Json(task)))
}

// =============================================================================
// PUT /tasks and PUT /tasks/{id} Handlers
// =============================================================================

/// Overwrites title and description of the task named in the body.
///
/// The response echoes the submitted body unchanged. Priority is never
/// modified, even when the body carries one. An unknown id is not an error:
/// the record is created with the default priority.
///
/// # Response
///
/// - **200 OK**: The submitted body
/// - **400 Bad Request**: Malformed JSON, missing id or validation error
/// - **500 Internal Server Error**: Store failure
///
/// # Errors
///
/// Returns [`ApiErrorResponse`] on invalid input or store failure.
pub async fn update_task(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Value>, ApiErrorResponse> {
    let Json(body) = payload?;
    apply_update(&state, None, body).await
}

/// Same as [`update_task`], with the id taken from the path.
///
/// A body `id` that differs from the path id is rejected.
///
/// # Errors
///
/// Returns [`ApiErrorResponse`] on invalid input or store failure.
pub async fn update_task_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Value>, ApiErrorResponse> {
    let Json(body) = payload?;
    apply_update(&state, Some(id), body).await
}

async fn apply_update(
    state: &AppState,
    path_id: Option<String>,
    body: Value,
) -> Result<Json<Value>, ApiErrorResponse> {
    let request: UpdateTaskRequest = serde_json::from_value(body.clone())
        .map_err(|error| ApiErrorResponse::bad_request("INVALID_JSON", error.to_string()))?;

    let id = resolve_update_id(path_id, request.id.as_deref())?;
    let content = request.content()?;

    let existed = state.task_repository.update_content(&id, &content).await?;
    tracing::info!(%id, existed, "Task content updated");

    Ok(Json(body))
}

/// Picks the record id for an update from the path and the body.
fn resolve_update_id(
    path_id: Option<String>,
    body_id: Option<&str>,
) -> Result<TaskId, ApiErrorResponse> {
    match (path_id, body_id) {
        (Some(path_id), Some(body_id)) if path_id != body_id => {
            Err(ApiErrorResponse::bad_request(
                "ID_MISMATCH",
                format!("Body id '{body_id}' does not match path id '{path_id}'"),
            ))
        }
        (Some(path_id), _) => Ok(TaskId::new(path_id)),
        (None, Some(body_id)) if !body_id.trim().is_empty() => Ok(TaskId::new(body_id)),
        (None, _) => Err(ApiErrorResponse::bad_request(
            "MISSING_ID",
            "Request body must contain an id",
        )),
    }
}

// =============================================================================
// DELETE /tasks/{id} Handler
// =============================================================================

/// Deletes a task by id.
///
/// Responds 204 whether or not the record existed.
///
/// # Errors
///
/// Returns [`ApiErrorResponse`] if the store fails.
pub async fn delete_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiErrorResponse> {
    let id = TaskId::new(id);
    let existed = state.task_repository.delete(&id).await?;
    tracing::info!(%id, existed, "Task deleted");
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// Fallback Handler
// =============================================================================

/// Answers any verb the task routes do not support.
#[allow(clippy::unused_async)]
pub async fn method_not_allowed() -> ApiErrorResponse {
    ApiErrorResponse::method_not_allowed()
}

// =============================================================================
// GET /health Handler
// =============================================================================

/// Health check response body.
#[derive(Debug, Clone, serde::Serialize)]
pub struct HealthResponse {
    /// Service status.
    pub status: &'static str,
    /// Service version.
    pub version: &'static str,
}

/// Health check endpoint.
///
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0"
/// }
/// ```
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    })
}

// =============================================================================
// Tests
// =============================================================================
