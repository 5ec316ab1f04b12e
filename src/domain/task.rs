//! Task record domain model.
//!
//! A task record is a flat document keyed by an opaque string id. The same
//! `Priority` type is shared by the service records and the to-do page.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// =============================================================================
// Value Objects - Newtypes
// =============================================================================

/// Unique identifier of a task record.
///
/// Ids are opaque strings supplied by the client. When a client leaves the
/// id out, one is generated with [`TaskId::generate_v7`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    /// Wraps an existing id string.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Generates a new time-ordered id (UUID v7).
    ///
    /// **Note**: This is an impure function (side effect: time + random).
    #[must_use]
    pub fn generate_v7() -> Self {
        Self(Uuid::now_v7().to_string())
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

impl From<&str> for TaskId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for TaskId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

// =============================================================================
// Priority
// =============================================================================

/// The priority level of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    /// High priority.
    High,
    /// Medium priority (the default for new records and drafts).
    #[default]
    Medium,
    /// Low priority.
    Low,
}

impl Priority {
    /// Returns the numeric value of the priority.
    ///
    /// Higher values indicate higher priority.
    #[must_use]
    pub const fn value(self) -> u8 {
        match self {
            Self::Low => 0,
            Self::Medium => 1,
            Self::High => 2,
        }
    }

    /// Returns the lowercase wire name (`high`, `medium`, `low`).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::High => write!(formatter, "High"),
            Self::Medium => write!(formatter, "Medium"),
            Self::Low => write!(formatter, "Low"),
        }
    }
}

impl PartialOrd for Priority {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Priority {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.value().cmp(&other.value())
    }
}

// =============================================================================
// Task
// =============================================================================

/// A single task record as held by the task store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Unique identifier within the store.
    pub id: TaskId,
    /// Title of the task (non-empty).
    pub title: String,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
    /// Priority level.
    #[serde(default)]
    pub priority: Priority,
}

impl Task {
    /// Creates a task with an empty description and the default priority.
    #[must_use]
    pub fn new(id: TaskId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            description: String::new(),
            priority: Priority::default(),
        }
    }

    /// Returns a new task with the given description.
    #[must_use]
    pub fn with_description(self, description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            ..self
        }
    }

    /// Returns a new task with the given priority.
    #[must_use]
    pub fn with_priority(self, priority: Priority) -> Self {
        Self { priority, ..self }
    }

    /// Returns a new task with title and description replaced.
    ///
    /// Priority and id are carried over untouched, which is the whole
    /// contract of a content update.
    #[must_use]
    pub fn with_content(self, content: &TaskContent) -> Self {
        Self {
            title: content.title.clone(),
            description: content.description.clone(),
            ..self
        }
    }
}

/// The fields a content update is allowed to overwrite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskContent {
    /// New title.
    pub title: String,
    /// New description.
    pub description: String,
}

impl TaskContent {
    /// Creates a content update.
    #[must_use]
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
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
    fn test_task_id_generate_v7_unique() {
        let first = TaskId::generate_v7();
        let second = TaskId::generate_v7();
        assert_ne!(first, second);
    }

    #[rstest]
    fn test_task_id_serializes_as_plain_string() {
        let json = serde_json::to_string(&TaskId::new("t1")).unwrap();
        assert_eq!(json, "\"t1\"");
    }

    #[rstest]
    #[case(Priority::High, "\"high\"")]
    #[case(Priority::Medium, "\"medium\"")]
    #[case(Priority::Low, "\"low\"")]
    fn test_priority_wire_names(#[case] priority: Priority, #[case] expected: &str) {
        assert_eq!(serde_json::to_string(&priority).unwrap(), expected);
        assert_eq!(format!("\"{}\"", priority.as_str()), expected);
    }

    #[rstest]
    fn test_priority_default_is_medium() {
        assert_eq!(Priority::default(), Priority::Medium);
    }

    #[rstest]
    fn test_priority_ordering() {
        assert!(Priority::High > Priority::Medium);
        assert!(Priority::Medium > Priority::Low);
    }

    #[rstest]
    fn test_task_deserialize_defaults() {
        let task: Task = serde_json::from_str(r#"{"id":"t1","title":"Buy milk"}"#).unwrap();
        assert_eq!(task.description, "");
        assert_eq!(task.priority, Priority::Medium);
    }

    #[rstest]
    fn test_with_content_keeps_priority() {
        let task = Task::new(TaskId::new("t1"), "Buy milk")
            .with_description("2%")
            .with_priority(Priority::Low);

        let updated = task.with_content(&TaskContent::new("Buy milk", "whole"));

        assert_eq!(updated.id, TaskId::new("t1"));
        assert_eq!(updated.description, "whole");
        assert_eq!(updated.priority, Priority::Low);
    }
}
