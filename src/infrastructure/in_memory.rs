//! In-memory task store.
//!
//! Process-local implementation of [`TaskRepository`], used by default and
//! by the tests.
//!
//! # Features
//!
//! - Thread-safe with `Arc<RwLock<...>>`
//! - Every write replaces the whole record under the write lock, so a
//!   content update is atomic with respect to other writers

use std::collections::HashMap;
use std::sync::Arc;

use futures::FutureExt;
use tokio::sync::RwLock;

use crate::domain::{Task, TaskContent, TaskId};
use crate::infrastructure::{RepositoryFuture, TaskRepository};

/// In-memory implementation of `TaskRepository`.
///
/// # Example
///
/// ```ignore
/// use todo_service::infrastructure::InMemoryTaskRepository;
///
/// let repository = InMemoryTaskRepository::new();
/// let task = Task::new(TaskId::new("t1"), "Buy milk");
///
/// repository.put(&task).await?;
/// let found = repository.find_by_id(&task.id).await?;
/// ```
#[derive(Debug, Clone)]
pub struct InMemoryTaskRepository {
    tasks: Arc<RwLock<HashMap<TaskId, Task>>>,
}

impl InMemoryTaskRepository {
    /// Creates a new empty in-memory task repository.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tasks: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl Default for InMemoryTaskRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[allow(clippy::significant_drop_tightening)]
impl TaskRepository for InMemoryTaskRepository {
    fn find_by_id(&self, id: &TaskId) -> RepositoryFuture<Option<Task>> {
        let tasks = Arc::clone(&self.tasks);
        let id = id.clone();
        async move {
            let guard = tasks.read().await;
            Ok(guard.get(&id).cloned())
        }
        .boxed()
    }

    fn put(&self, task: &Task) -> RepositoryFuture<()> {
        let tasks = Arc::clone(&self.tasks);
        let task = task.clone();
        async move {
            let mut guard = tasks.write().await;
            guard.insert(task.id.clone(), task);
            Ok(())
        }
        .boxed()
    }

    fn update_content(&self, id: &TaskId, content: &TaskContent) -> RepositoryFuture<bool> {
        let tasks = Arc::clone(&self.tasks);
        let id = id.clone();
        let content = content.clone();
        async move {
            let mut guard = tasks.write().await;
            let existing = guard.remove(&id);
            let existed = existing.is_some();
            let task = existing.unwrap_or_else(|| Task::new(id.clone(), ""));
            guard.insert(id, task.with_content(&content));
            Ok(existed)
        }
        .boxed()
    }

    fn delete(&self, id: &TaskId) -> RepositoryFuture<bool> {
        let tasks = Arc::clone(&self.tasks);
        let id = id.clone();
        async move {
            let mut guard = tasks.write().await;
            Ok(guard.remove(&id).is_some())
        }
        .boxed()
    }

    fn scan(&self) -> RepositoryFuture<Vec<Task>> {
        let tasks = Arc::clone(&self.tasks);
        async move {
            let guard = tasks.read().await;
            Ok(guard.values().cloned().collect())
        }
        .boxed()
    }

    fn count(&self) -> RepositoryFuture<u64> {
        let tasks = Arc::clone(&self.tasks);
        async move {
            let guard = tasks.read().await;
            Ok(guard.len() as u64)
        }
        .boxed()
    }
}

// =============================================================================
// Tests
// =============================================================================
