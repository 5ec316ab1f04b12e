//! Domain module for task records.

pub mod task;

pub use task::{Priority, Task, TaskContent, TaskId};
