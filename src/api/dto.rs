//! Data Transfer Objects for API requests.
//!
//! Responses are the stored [`Task`] records themselves, whose JSON shape
//! is the wire contract. Requests get their own types so that missing
//! fields surface as validation errors instead of JSON rejections.

use serde::Deserialize;

use super::error::ValidationError;
use crate::domain::{Priority, Task, TaskContent, TaskId};

/// Maximum title length in characters.
pub const MAX_TITLE_LENGTH: usize = 200;

/// Maximum description length in characters.
pub const MAX_DESCRIPTION_LENGTH: usize = 5000;

// =============================================================================
// Task DTOs
// =============================================================================

/// Request DTO for `POST /tasks`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateTaskRequest {
    /// Id to store the record at. Generated when absent or blank.
    #[serde(default)]
    pub id: Option<String>,
    /// Title of the task.
    #[serde(default)]
    pub title: String,
    /// Description of the task.
    #[serde(default)]
    pub description: String,
    /// Priority level (defaults to medium).
    #[serde(default)]
    pub priority: Priority,
}

impl CreateTaskRequest {
    /// Validates the request and builds the record to store.
    ///
    /// `generate_id` is called only when the request carries no usable id.
    ///
    /// # Errors
    ///
    /// Returns every field error found, not just the first.
    pub fn into_task(
        self,
        generate_id: impl FnOnce() -> TaskId,
    ) -> Result<Task, ValidationError> {
        validate_content(&self.title, &self.description)?;

        let id = self
            .id
            .filter(|id| !id.trim().is_empty())
            .map_or_else(generate_id, TaskId::new);

        Ok(Task::new(id, self.title)
            .with_description(self.description)
            .with_priority(self.priority))
    }
}

/// Request DTO for `PUT /tasks` and `PUT /tasks/{id}`.
///
/// Only `title` and `description` are applied; any other field in the body
/// (such as `priority`) is ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTaskRequest {
    /// Id of the record to update. May be omitted when the path names it.
    #[serde(default)]
    pub id: Option<String>,
    /// New title.
    #[serde(default)]
    pub title: String,
    /// New description.
    #[serde(default)]
    pub description: String,
}

impl UpdateTaskRequest {
    /// Validates the new content.
    ///
    /// # Errors
    ///
    /// Returns every field error found.
    pub fn content(&self) -> Result<TaskContent, ValidationError> {
        validate_content(&self.title, &self.description)?;
        Ok(TaskContent::new(self.title.clone(), self.description.clone()))
    }
}

// =============================================================================
// Validation Functions
// =============================================================================

/// Validates a task title.
///
/// # Validation Rules
///
/// - Title must not be empty or whitespace-only
/// - Title must not exceed 200 characters
///
/// # Errors
///
/// Returns a single-field `ValidationError` for `title`.
pub fn validate_title(title: &str) -> Result<(), ValidationError> {
    let title = title.trim();

    if title.is_empty() {
        return Err(ValidationError::single("title", "Title is required"));
    }

    if title.chars().count() > MAX_TITLE_LENGTH {
        return Err(ValidationError::single(
            "title",
            "Title must not exceed 200 characters",
        ));
    }

    Ok(())
}

/// Validates a task description.
///
/// # Validation Rules
///
/// - Description must not exceed 5000 characters
///
/// # Errors
///
/// Returns a single-field `ValidationError` for `description`.
pub fn validate_description(description: &str) -> Result<(), ValidationError> {
    if description.chars().count() > MAX_DESCRIPTION_LENGTH {
        return Err(ValidationError::single(
            "description",
            "Description must not exceed 5000 characters",
        ));
    }

    Ok(())
}

fn validate_content(title: &str, description: &str) -> Result<(), ValidationError> {
    match (validate_title(title), validate_description(description)) {
        (Ok(()), Ok(())) => Ok(()),
        (Err(error), Ok(())) | (Ok(()), Err(error)) => Err(error),
        (Err(title_error), Err(description_error)) => Err(title_error.merge(description_error)),
    }
}

// =============================================================================
// Tests
// =============================================================================
