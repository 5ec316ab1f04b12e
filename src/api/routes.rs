//! Route configuration for the service.
//!
//! # Routes
//!
//! | Method | Path | Handler | Description |
//! |--------|------|---------|-------------|
//! | GET | /tasks | `list_tasks` | List every task |
//! | POST | /tasks | `create_task` | Store a task |
//! | PUT | /tasks | `update_task` | Update title/description (id in body) |
//! | GET | /tasks/{id} | `get_task` | Fetch one task |
//! | PUT | /tasks/{id} | `update_task_by_id` | Update title/description |
//! | DELETE | /tasks/{id} | `delete_task` | Delete a task |
//! | GET | /health | `health_check` | Health check endpoint |
//!
//! The task routes are mounted twice, at the root and under `/api`, the
//! prefix the site uses to reach the service. Any other verb on a task
//! path answers 405. When a static directory is configured, every other
//! path is served from it, falling back to its `index.html`.

use std::path::Path;

use axum::Router;
use axum::routing::get;
use tower_http::services::{ServeDir, ServeFile};

use super::handlers::{
    AppState, create_task, delete_task, get_task, health_check, list_tasks, method_not_allowed,
    update_task, update_task_by_id,
};

/// Prefix under which the site reaches the Task Service.
pub const API_PREFIX: &str = "/api";

/// Routes of the Task Service, relative to the service root.
pub fn task_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/tasks",
            get(list_tasks)
                .post(create_task)
                .put(update_task)
                .fallback(method_not_allowed),
        )
        .route(
            "/tasks/{id}",
            get(get_task)
                .put(update_task_by_id)
                .delete(delete_task)
                .fallback(method_not_allowed),
        )
}

/// Creates the application router.
///
/// # Example
///
/// ```rust,ignore
/// let state = AppState::new(factory.create()?);
/// let router = create_router(state, Some(Path::new("./dist")));
/// ```
pub fn create_router(state: AppState, static_dir: Option<&Path>) -> Router {
    let router = Router::new()
        .route("/health", get(health_check))
        .merge(task_routes())
        .nest(API_PREFIX, task_routes())
        .with_state(state);

    match static_dir {
        Some(directory) => router.fallback_service(static_site(directory)),
        None => router,
    }
}

/// Serves files from `directory`, answering unknown paths with its
/// `index.html` and a 200 status so client-side routes resolve.
fn static_site(directory: &Path) -> ServeDir<ServeFile> {
    ServeDir::new(directory).fallback(ServeFile::new(directory.join("index.html")))
}
