//! Redis task store.
//!
//! A key-value table of task records kept in Redis, using `deadpool-redis`
//! for connection pooling.
//!
//! # Key Design
//!
//! All keys live under the configured table name:
//!
//! - Record: `{table}:task:{id}` -> JSON
//! - Index: `{table}:tasks` -> SET of ids (used by `scan` and `count`)

use deadpool_redis::{Config, Pool, Runtime};
use futures::FutureExt;
use redis::AsyncCommands;

use crate::domain::{Priority, Task, TaskContent, TaskId};
use crate::infrastructure::{RepositoryError, RepositoryFuture, TaskRepository};

// =============================================================================
// Key Helpers
// =============================================================================

/// Key of a single record.
fn task_key(table: &str, id: &TaskId) -> String {
    format!("{table}:task:{id}")
}

/// Key of the id index set.
fn index_key(table: &str) -> String {
    format!("{table}:tasks")
}

/// Overwrites `title` and `description` of the stored document in place,
/// creating the document (and its index entry) when the key is absent.
///
/// Returns 1 when updated, 0 when created and -1 when the stored value is
/// not a JSON object.
const UPDATE_CONTENT_SCRIPT: &str = r"
local existing = redis.call('GET', KEYS[1])
if not existing then
    local created = {
        id = ARGV[3],
        title = ARGV[1],
        description = ARGV[2],
        priority = ARGV[4],
    }
    redis.call('SET', KEYS[1], cjson.encode(created))
    redis.call('SADD', KEYS[2], ARGV[3])
    return 0
end
local ok, data = pcall(cjson.decode, existing)
if not ok or type(data) ~= 'table' then
    return -1
end
data.title = ARGV[1]
data.description = ARGV[2]
redis.call('SET', KEYS[1], cjson.encode(data))
return 1
";

fn storage_error(error: &redis::RedisError) -> RepositoryError {
    RepositoryError::Storage(error.to_string())
}

fn connection_error(error: &deadpool_redis::PoolError) -> RepositoryError {
    RepositoryError::Connection(error.to_string())
}

// =============================================================================
// Redis Task Repository
// =============================================================================

/// Redis implementation of `TaskRepository`.
///
/// # Example
///
/// ```ignore
/// use todo_service::infrastructure::RedisTaskRepository;
///
/// let repository = RedisTaskRepository::from_url("redis://localhost:6379", "tasks")?;
/// repository.put(&task).await?;
/// let found = repository.find_by_id(&task.id).await?;
/// ```
#[derive(Clone)]
pub struct RedisTaskRepository {
    pool: Pool,
    table: String,
}

impl std::fmt::Debug for RedisTaskRepository {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("RedisTaskRepository")
            .field("table", &self.table)
            .finish_non_exhaustive()
    }
}

impl RedisTaskRepository {
    /// Creates a repository over an existing pool.
    #[must_use]
    pub fn new(pool: Pool, table: impl Into<String>) -> Self {
        Self {
            pool,
            table: table.into(),
        }
    }

    /// Creates a repository from a Redis URL.
    ///
    /// The pool connects lazily, so an unreachable server is only reported
    /// by the first operation.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Connection` if the pool cannot be created.
    pub fn from_url(redis_url: &str, table: impl Into<String>) -> Result<Self, RepositoryError> {
        let pool = Config::from_url(redis_url)
            .create_pool(Some(Runtime::Tokio1))
            .map_err(|error| RepositoryError::Connection(error.to_string()))?;
        Ok(Self::new(pool, table))
    }

    /// Returns the table name used as the key namespace.
    #[must_use]
    pub fn table(&self) -> &str {
        &self.table
    }

    async fn fetch(pool: Pool, key: String) -> Result<Option<Task>, RepositoryError> {
        let mut connection = pool.get().await.map_err(|error| connection_error(&error))?;

        let data: Option<String> = connection
            .get(&key)
            .await
            .map_err(|error| storage_error(&error))?;

        data.map(|json| serde_json::from_str(&json))
            .transpose()
            .map_err(|error| RepositoryError::Serialization(error.to_string()))
    }

    async fn store(
        pool: Pool,
        key: String,
        index: String,
        task: Task,
    ) -> Result<(), RepositoryError> {
        let json = serde_json::to_string(&task)
            .map_err(|error| RepositoryError::Serialization(error.to_string()))?;
        let mut connection = pool.get().await.map_err(|error| connection_error(&error))?;

        let _: () = redis::pipe()
            .atomic()
            .set(&key, &json)
            .ignore()
            .sadd(&index, task.id.as_str())
            .ignore()
            .query_async(&mut *connection)
            .await
            .map_err(|error| storage_error(&error))?;

        Ok(())
    }

    async fn overwrite_content(
        pool: Pool,
        key: String,
        index: String,
        id: TaskId,
        content: TaskContent,
    ) -> Result<bool, RepositoryError> {
        let mut connection = pool.get().await.map_err(|error| connection_error(&error))?;

        let result: i64 = redis::Script::new(UPDATE_CONTENT_SCRIPT)
            .key(&key)
            .key(&index)
            .arg(&content.title)
            .arg(&content.description)
            .arg(id.as_str())
            .arg(Priority::default().as_str())
            .invoke_async(&mut *connection)
            .await
            .map_err(|error| storage_error(&error))?;

        match result {
            1 => Ok(true),
            0 => Ok(false),
            _ => Err(RepositoryError::Serialization(format!(
                "Corrupted record at {key}: not a JSON object"
            ))),
        }
    }

    async fn remove(
        pool: Pool,
        key: String,
        index: String,
        id: TaskId,
    ) -> Result<bool, RepositoryError> {
        let mut connection = pool.get().await.map_err(|error| connection_error(&error))?;

        let (deleted, _): (i64, i64) = redis::pipe()
            .atomic()
            .del(&key)
            .srem(&index, id.as_str())
            .query_async(&mut *connection)
            .await
            .map_err(|error| storage_error(&error))?;

        Ok(deleted == 1)
    }

    async fn load_all(pool: Pool, table: String) -> Result<Vec<Task>, RepositoryError> {
        let mut connection = pool.get().await.map_err(|error| connection_error(&error))?;

        let ids: Vec<String> = connection
            .smembers(index_key(&table))
            .await
            .map_err(|error| storage_error(&error))?;

        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let keys: Vec<String> = ids
            .iter()
            .map(|id| task_key(&table, &TaskId::new(id.as_str())))
            .collect();

        let documents: Vec<Option<String>> = connection
            .mget(&keys)
            .await
            .map_err(|error| storage_error(&error))?;

        // An id can outlive its record if a writer died between commands.
        documents
            .into_iter()
            .flatten()
            .map(|json| {
                serde_json::from_str(&json)
                    .map_err(|error| RepositoryError::Serialization(error.to_string()))
            })
            .collect()
    }

    async fn cardinality(pool: Pool, index: String) -> Result<u64, RepositoryError> {
        let mut connection = pool.get().await.map_err(|error| connection_error(&error))?;

        connection
            .scard(&index)
            .await
            .map_err(|error| storage_error(&error))
    }
}

impl TaskRepository for RedisTaskRepository {
    fn find_by_id(&self, id: &TaskId) -> RepositoryFuture<Option<Task>> {
        Self::fetch(self.pool.clone(), task_key(&self.table, id)).boxed()
    }

    fn put(&self, task: &Task) -> RepositoryFuture<()> {
        Self::store(
            self.pool.clone(),
            task_key(&self.table, &task.id),
            index_key(&self.table),
            task.clone(),
        )
        .boxed()
    }

    fn update_content(&self, id: &TaskId, content: &TaskContent) -> RepositoryFuture<bool> {
        Self::overwrite_content(
            self.pool.clone(),
            task_key(&self.table, id),
            index_key(&self.table),
            id.clone(),
            content.clone(),
        )
        .boxed()
    }

    fn delete(&self, id: &TaskId) -> RepositoryFuture<bool> {
        Self::remove(
            self.pool.clone(),
            task_key(&self.table, id),
            index_key(&self.table),
            id.clone(),
        )
        .boxed()
    }

    fn scan(&self) -> RepositoryFuture<Vec<Task>> {
        Self::load_all(self.pool.clone(), self.table.clone()).boxed()
    }

    fn count(&self) -> RepositoryFuture<u64> {
        Self::cardinality(self.pool.clone(), index_key(&self.table)).boxed()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const REDIS_URL: &str = "redis://localhost:6379";

    #[rstest]
    fn test_task_key_generation() {
        let key = task_key("tasks", &TaskId::new("t1"));
        assert_eq!(key, "tasks:task:t1");
    }

    #[rstest]
    fn test_index_key_generation() {
        assert_eq!(index_key("staging-tasks"), "staging-tasks:tasks");
    }

    #[rstest]
    fn test_from_url_keeps_table() {
        let repository = RedisTaskRepository::from_url(REDIS_URL, "tasks").unwrap();
        assert_eq!(repository.table(), "tasks");
    }

    #[rstest]
    fn test_debug_shows_table() {
        let repository = RedisTaskRepository::from_url(REDIS_URL, "tasks").unwrap();
        assert!(format!("{repository:?}").contains("tasks"));
    }

    // -------------------------------------------------------------------------
    // Integration Tests (require Redis)
    // -------------------------------------------------------------------------

    fn test_repository() -> RedisTaskRepository {
        let table = format!("test-{}", TaskId::generate_v7());
        RedisTaskRepository::from_url(REDIS_URL, table).unwrap()
    }

    #[rstest]
    #[tokio::test]
    #[ignore = "Requires Redis instance"]
    async fn test_put_find_and_update() {
        let repository = test_repository();
        let task = Task::new(TaskId::new("t1"), "Buy milk")
            .with_description("2%")
            .with_priority(Priority::Low);

        repository.put(&task).await.unwrap();
        assert_eq!(repository.find_by_id(&task.id).await.unwrap(), Some(task.clone()));

        let updated = repository
            .update_content(&task.id, &TaskContent::new("Buy milk", "whole"))
            .await
            .unwrap();
        assert!(updated);

        let found = repository.find_by_id(&task.id).await.unwrap().unwrap();
        assert_eq!(found.description, "whole");
        assert_eq!(found.priority, Priority::Low);

        assert!(repository.delete(&task.id).await.unwrap());
    }

    #[rstest]
    #[tokio::test]
    #[ignore = "Requires Redis instance"]
    async fn test_scan_and_delete() {
        let repository = test_repository();
        for index in 0..3 {
            let task = Task::new(TaskId::new(format!("t{index}")), format!("Task {index}"));
            repository.put(&task).await.unwrap();
        }

        assert_eq!(repository.scan().await.unwrap().len(), 3);
        assert_eq!(repository.count().await.unwrap(), 3);

        for index in 0..3 {
            assert!(repository.delete(&TaskId::new(format!("t{index}"))).await.unwrap());
        }
        assert!(!repository.delete(&TaskId::new("t0")).await.unwrap());
        assert!(repository.scan().await.unwrap().is_empty());
    }

    #[rstest]
    #[tokio::test]
    #[ignore = "Requires Redis instance"]
    async fn test_update_missing_creates_record() {
        let repository = test_repository();
        let id = TaskId::new("missing");
        let existed = repository
            .update_content(&id, &TaskContent::new("a", "b"))
            .await
            .unwrap();
        assert!(!existed);

        let created = repository.find_by_id(&id).await.unwrap().unwrap();
        assert_eq!(created, Task::new(id.clone(), "a").with_description("b"));
        assert_eq!(repository.count().await.unwrap(), 1);

        assert!(repository.delete(&id).await.unwrap());
    }
}
