//! To-do task service library.
//!
//! Provides the task record service (HTTP handlers over a key-value task
//! store), the edge routing that serves the static site next to it, and the
//! state machine behind the to-do list page.

pub mod api;
pub mod domain;
pub mod infrastructure;
pub mod todo;
