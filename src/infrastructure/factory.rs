//! Repository factory for runtime backend selection.
//!
//! This module picks the task store implementation from environment
//! configuration. It supports the in-memory store and a Redis table.
//!
//! # Environment Variables
//!
//! - `STORAGE_MODE`: `in_memory` (default) | `redis`
//! - `REDIS_URL`: Redis connection URL (required when `STORAGE_MODE=redis`)
//! - `TABLE_NAME`: key namespace of the Redis table (default: `tasks`)
//!
//! # Example
//!
//! ```ignore
//! use todo_service::infrastructure::{RepositoryConfig, RepositoryFactory};
//!
//! let config = RepositoryConfig::from_env()?;
//! let factory = RepositoryFactory::new(config);
//! let task_repository = factory.create()?;
//! ```

use std::env;
use std::str::FromStr;
use std::sync::Arc;

use thiserror::Error;

use super::{InMemoryTaskRepository, RedisTaskRepository, TaskRepository};

/// Table name used when `TABLE_NAME` is unset.
pub const DEFAULT_TABLE_NAME: &str = "tasks";

// =============================================================================
// Configuration Types
// =============================================================================

/// Storage backend for task records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StorageMode {
    /// Process-local map. Records are lost on restart.
    #[default]
    InMemory,
    /// Redis key-value table.
    Redis,
}

impl FromStr for StorageMode {
    type Err = ConfigurationError;

    /// Parses a storage mode from a string.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError::InvalidStorageMode` if the string is not recognized.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_lowercase().as_str() {
            "in_memory" | "inmemory" | "memory" => Ok(Self::InMemory),
            "redis" => Ok(Self::Redis),
            _ => Err(ConfigurationError::InvalidStorageMode(value.to_string())),
        }
    }
}

/// Configuration for the repository factory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryConfig {
    /// Which backend holds the task records.
    pub storage_mode: StorageMode,
    /// Redis connection URL (required when `storage_mode` is `Redis`).
    pub redis_url: Option<String>,
    /// Key namespace of the task table.
    pub table_name: String,
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        Self {
            storage_mode: StorageMode::default(),
            redis_url: None,
            table_name: DEFAULT_TABLE_NAME.to_string(),
        }
    }
}

impl RepositoryConfig {
    /// Creates a new configuration builder.
    pub fn builder() -> RepositoryConfigBuilder {
        RepositoryConfigBuilder::default()
    }

    /// Creates a configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError` if:
    /// - `STORAGE_MODE` contains an invalid value
    /// - `REDIS_URL` is missing when `STORAGE_MODE=redis`
    pub fn from_env() -> Result<Self, ConfigurationError> {
        let storage_mode = match env::var("STORAGE_MODE") {
            Ok(value) => value.parse()?,
            Err(env::VarError::NotPresent) => StorageMode::default(),
            Err(env::VarError::NotUnicode(_)) => {
                return Err(ConfigurationError::InvalidStorageMode(
                    "<non-UTF-8 value>".to_string(),
                ));
            }
        };

        let config = Self {
            storage_mode,
            redis_url: non_blank_var("REDIS_URL"),
            table_name: non_blank_var("TABLE_NAME")
                .unwrap_or_else(|| DEFAULT_TABLE_NAME.to_string()),
        };

        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError` if the Redis URL is missing for Redis
    /// mode or the table name is blank.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.storage_mode == StorageMode::Redis && self.redis_url.is_none() {
            return Err(ConfigurationError::MissingRedisUrl);
        }

        if self.table_name.trim().is_empty() {
            return Err(ConfigurationError::EmptyTableName);
        }

        Ok(())
    }
}

/// Reads an environment variable, treating empty/whitespace-only as unset.
fn non_blank_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Builder for `RepositoryConfig`.
///
/// # Example
///
/// ```ignore
/// let config = RepositoryConfig::builder()
///     .storage_mode(StorageMode::Redis)
///     .redis_url("redis://localhost:6379")
///     .table_name("staging-tasks")
///     .build()?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct RepositoryConfigBuilder {
    storage_mode: StorageMode,
    redis_url: Option<String>,
    table_name: Option<String>,
}

impl RepositoryConfigBuilder {
    /// Sets the storage mode.
    #[must_use]
    pub const fn storage_mode(mut self, mode: StorageMode) -> Self {
        self.storage_mode = mode;
        self
    }

    /// Sets the Redis URL.
    #[must_use]
    pub fn redis_url(mut self, url: impl Into<String>) -> Self {
        self.redis_url = Some(url.into());
        self
    }

    /// Sets the table name.
    #[must_use]
    pub fn table_name(mut self, name: impl Into<String>) -> Self {
        self.table_name = Some(name.into());
        self
    }

    /// Builds the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError` if the configuration is invalid.
    pub fn build(self) -> Result<RepositoryConfig, ConfigurationError> {
        let config = RepositoryConfig {
            storage_mode: self.storage_mode,
            redis_url: self.redis_url,
            table_name: self
                .table_name
                .unwrap_or_else(|| DEFAULT_TABLE_NAME.to_string()),
        };

        config.validate()?;
        Ok(config)
    }
}

// =============================================================================
// Error Types
// =============================================================================

/// Errors that can occur during factory configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    /// Invalid storage mode value.
    #[error("Invalid storage mode: '{0}'. Expected 'in_memory' or 'redis'")]
    InvalidStorageMode(String),

    /// Missing `REDIS_URL` when storage mode is Redis.
    #[error("REDIS_URL environment variable is required when STORAGE_MODE=redis")]
    MissingRedisUrl,

    /// Table name set to a blank string.
    #[error("TABLE_NAME must not be blank")]
    EmptyTableName,
}

/// Errors that can occur during factory initialization.
#[derive(Debug, Error)]
pub enum FactoryError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    /// Redis connection error.
    #[error("Redis connection error: {0}")]
    RedisConnection(String),
}

// =============================================================================
// Repository Factory
// =============================================================================

/// Factory for creating the task repository based on configuration.
#[derive(Debug, Clone)]
pub struct RepositoryFactory {
    config: RepositoryConfig,
}

impl RepositoryFactory {
    /// Creates a new repository factory with the given configuration.
    #[must_use]
    pub const fn new(config: RepositoryConfig) -> Self {
        Self { config }
    }

    /// Creates a new repository factory from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `FactoryError::Configuration` if environment configuration is invalid.
    pub fn from_env() -> Result<Self, FactoryError> {
        let config = RepositoryConfig::from_env()?;
        Ok(Self::new(config))
    }

    /// Returns the configuration used by this factory.
    #[must_use]
    pub const fn config(&self) -> &RepositoryConfig {
        &self.config
    }

    /// Creates the task repository selected by the configuration.
    ///
    /// # Errors
    ///
    /// Returns `FactoryError` if the Redis pool cannot be created.
    pub fn create(&self) -> Result<Arc<dyn TaskRepository>, FactoryError> {
        match self.config.storage_mode {
            StorageMode::InMemory => Ok(Arc::new(InMemoryTaskRepository::new())),
            StorageMode::Redis => {
                let redis_url = self
                    .config
                    .redis_url
                    .as_ref()
                    .ok_or(ConfigurationError::MissingRedisUrl)?;

                let repository =
                    RedisTaskRepository::from_url(redis_url, self.config.table_name.clone())
                        .map_err(|error| FactoryError::RedisConnection(error.to_string()))?;

                Ok(Arc::new(repository))
            }
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("in_memory", StorageMode::InMemory)]
    #[case("inmemory", StorageMode::InMemory)]
    #[case("memory", StorageMode::InMemory)]
    #[case("IN_MEMORY", StorageMode::InMemory)]
    #[case("redis", StorageMode::Redis)]
    #[case("REDIS", StorageMode::Redis)]
    fn test_storage_mode_from_str_valid(#[case] input: &str, #[case] expected: StorageMode) {
        let result: Result<StorageMode, _> = input.parse();
        assert_eq!(result, Ok(expected));
    }

    #[rstest]
    #[case("invalid")]
    #[case("dynamodb")]
    #[case("")]
    fn test_storage_mode_from_str_invalid(#[case] input: &str) {
        let result: Result<StorageMode, _> = input.parse();
        assert_eq!(
            result,
            Err(ConfigurationError::InvalidStorageMode(input.to_string()))
        );
    }

    #[rstest]
    fn test_repository_config_default() {
        let config = RepositoryConfig::default();
        assert_eq!(config.storage_mode, StorageMode::InMemory);
        assert!(config.redis_url.is_none());
        assert_eq!(config.table_name, DEFAULT_TABLE_NAME);
        assert!(config.validate().is_ok());
    }

    #[rstest]
    fn test_validate_redis_without_url() {
        let config = RepositoryConfig {
            storage_mode: StorageMode::Redis,
            ..RepositoryConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigurationError::MissingRedisUrl));
    }

    #[rstest]
    fn test_validate_blank_table_name() {
        let config = RepositoryConfig {
            table_name: "  ".to_string(),
            ..RepositoryConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigurationError::EmptyTableName));
    }

    #[rstest]
    fn test_builder_full_configuration() {
        let config = RepositoryConfig::builder()
            .storage_mode(StorageMode::Redis)
            .redis_url("redis://localhost:6379")
            .table_name("staging-tasks")
            .build()
            .unwrap();

        assert_eq!(config.storage_mode, StorageMode::Redis);
        assert_eq!(config.redis_url.as_deref(), Some("redis://localhost:6379"));
        assert_eq!(config.table_name, "staging-tasks");
    }

    #[rstest]
    fn test_builder_missing_redis_url() {
        let result = RepositoryConfig::builder()
            .storage_mode(StorageMode::Redis)
            .build();
        assert_eq!(result, Err(ConfigurationError::MissingRedisUrl));
    }

    #[rstest]
    #[tokio::test]
    async fn test_factory_create_in_memory_is_functional() {
        let factory = RepositoryFactory::new(RepositoryConfig::default());
        let repository = factory.create().unwrap();
        assert_eq!(repository.count().await.unwrap(), 0);
    }

    #[rstest]
    fn test_factory_create_redis_is_lazy() {
        let config = RepositoryConfig::builder()
            .storage_mode(StorageMode::Redis)
            .redis_url("redis://localhost:6379")
            .build()
            .unwrap();
        let factory = RepositoryFactory::new(config);
        assert!(factory.create().is_ok());
    }

    #[rstest]
    fn test_configuration_error_display() {
        let error = ConfigurationError::InvalidStorageMode("foo".to_string());
        assert!(error.to_string().contains("foo"));

        let error = ConfigurationError::MissingRedisUrl;
        assert!(error.to_string().contains("REDIS_URL"));

        let error = FactoryError::RedisConnection("timeout".to_string());
        assert!(error.to_string().contains("timeout"));
    }
}
