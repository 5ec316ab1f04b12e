//! API module for HTTP handlers.
//!
//! This module contains route definitions and request/response handlers.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod routes;

pub use dto::{CreateTaskRequest, UpdateTaskRequest, validate_description, validate_title};
pub use error::{ApiError, ApiErrorResponse, FieldError, ValidationError};
pub use handlers::{
    AppState, HealthResponse, create_task, delete_task, get_task, health_check, list_tasks,
    method_not_allowed, update_task, update_task_by_id,
};
pub use routes::{API_PREFIX, create_router, task_routes};
