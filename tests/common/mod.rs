//! Common test helpers for integration tests.
//!
//! # Usage
//!
//! ```ignore
//! mod common;
//! use common::{create_test_app_state, send};
//! ```
//!
//! Each integration test file compiles as its own crate, so helpers used by
//! only some of them would otherwise warn as dead code.

#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use futures::FutureExt;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use todo_service::api::{AppState, create_router};
use todo_service::domain::{Priority, Task, TaskContent, TaskId};
use todo_service::infrastructure::{
    InMemoryTaskRepository, RepositoryError, RepositoryFuture, TaskRepository,
};

// =============================================================================
// AppState Creation Helpers
// =============================================================================

/// Creates a test `AppState` over an empty in-memory store.
pub fn create_test_app_state() -> AppState {
    AppState::new(Arc::new(InMemoryTaskRepository::new()))
}

/// Creates a test `AppState` whose store fails every call with `message`.
pub fn create_failing_app_state(message: &str) -> AppState {
    AppState::new(Arc::new(FailingTaskRepository::new(message)))
}

/// Creates the API-only router over `state`.
pub fn create_test_router(state: AppState) -> Router {
    create_router(state, None)
}

/// Stores a task directly through the repository.
pub async fn create_and_save_task(
    state: &AppState,
    id: &str,
    title: &str,
    priority: Priority,
) -> Task {
    let task = Task::new(TaskId::new(id), title)
        .with_description(format!("{title} description"))
        .with_priority(priority);
    state
        .task_repository
        .put(&task)
        .await
        .expect("in-memory put should succeed");
    task
}

// =============================================================================
// Request Helpers
// =============================================================================

/// Sends one request through the router and returns status and raw body.
pub async fn send_raw(
    router: &Router,
    method: Method,
    uri: &str,
    body: Option<&str>,
) -> (StatusCode, Vec<u8>) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("request should build");

    let response = router
        .clone()
        .oneshot(request)
        .await
        .expect("router is infallible");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should collect")
        .to_bytes();

    (status, bytes.to_vec())
}

/// Sends one request and parses the body as JSON (`Value::Null` when empty).
pub async fn send(
    router: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let body = body.map(|value| value.to_string());
    let (status, bytes) = send_raw(router, method, uri, body.as_deref()).await;

    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("response body should be JSON")
    };
    (status, json)
}

// =============================================================================
// Failing Repository
// =============================================================================

/// A task store whose every operation fails with a storage error.
#[derive(Debug, Clone)]
pub struct FailingTaskRepository {
    message: String,
}

impl FailingTaskRepository {
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }

    fn fail<T: Send + 'static>(&self) -> RepositoryFuture<T> {
        let error = RepositoryError::Storage(self.message.clone());
        async move { Err(error) }.boxed()
    }
}

impl TaskRepository for FailingTaskRepository {
    fn find_by_id(&self, _id: &TaskId) -> RepositoryFuture<Option<Task>> {
        self.fail()
    }

    fn put(&self, _task: &Task) -> RepositoryFuture<()> {
        self.fail()
    }

    fn update_content(&self, _id: &TaskId, _content: &TaskContent) -> RepositoryFuture<bool> {
        self.fail()
    }

    fn delete(&self, _id: &TaskId) -> RepositoryFuture<bool> {
        self.fail()
    }

    fn scan(&self) -> RepositoryFuture<Vec<Task>> {
        self.fail()
    }

    fn count(&self) -> RepositoryFuture<u64> {
        self.fail()
    }
}
