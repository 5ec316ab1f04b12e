//! Task store contract.
//!
//! The store is a plain key-value table of task records keyed by id. It
//! offers no transactions or version checks: concurrent writes to the same
//! id are last-write-wins in whatever order the backend applies them.

use futures::future::BoxFuture;
use thiserror::Error;

use crate::domain::{Task, TaskContent, TaskId};

// =============================================================================
// Repository Error
// =============================================================================

/// Errors that can occur during repository operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    /// Entity was not found.
    #[error("Entity not found: {0}")]
    NotFound(String),

    /// The backend rejected or failed the operation.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// The backend could not be reached.
    #[error("Connection error: {0}")]
    Connection(String),
}

/// Boxed future returned by every repository operation.
///
/// Futures are `'static` so handlers can hold them across awaits without
/// borrowing the repository.
pub type RepositoryFuture<T> = BoxFuture<'static, Result<T, RepositoryError>>;

// =============================================================================
// Task Repository
// =============================================================================

/// Repository trait for task records.
pub trait TaskRepository: Send + Sync {
    /// Finds a task by its id.
    ///
    /// Returns `Ok(Some(task))` if found, `Ok(None)` if not found,
    /// or an error if the operation fails.
    fn find_by_id(&self, id: &TaskId) -> RepositoryFuture<Option<Task>>;

    /// Stores a task at its id, replacing any existing record.
    fn put(&self, task: &Task) -> RepositoryFuture<()>;

    /// Overwrites title and description of the record at `id`.
    ///
    /// Every other attribute is left as stored. When no record has that id
    /// one is created from the content with the default priority.
    ///
    /// Returns `Ok(true)` if an existing record was updated, `Ok(false)` if
    /// a new one was created.
    fn update_content(&self, id: &TaskId, content: &TaskContent) -> RepositoryFuture<bool>;

    /// Deletes a task by its id.
    ///
    /// Returns `Ok(true)` if the task was deleted, `Ok(false)` if it didn't exist.
    fn delete(&self, id: &TaskId) -> RepositoryFuture<bool>;

    /// Returns every stored task in no particular order.
    fn scan(&self) -> RepositoryFuture<Vec<Task>>;

    /// Counts all tasks.
    fn count(&self) -> RepositoryFuture<u64>;
}

// =============================================================================
// Tests
// =============================================================================
