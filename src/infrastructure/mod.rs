//! Infrastructure module for the task store.
//!
//! This module contains the store contract, its in-memory and Redis
//! implementations, and the factory that picks one from configuration.

pub mod factory;
pub mod in_memory;
pub mod redis;
pub mod repository;

pub use factory::{
    ConfigurationError, DEFAULT_TABLE_NAME, FactoryError, RepositoryConfig,
    RepositoryConfigBuilder, RepositoryFactory, StorageMode,
};
pub use in_memory::InMemoryTaskRepository;
pub use redis::RedisTaskRepository;
pub use repository::{RepositoryError, RepositoryFuture, TaskRepository};
