//! State and transitions of the to-do list page.
//!
//! The page holds an ordered list of entries, a draft form, and at most one
//! entry under edit. Every user interaction is an [`Action`], and [`reduce`]
//! computes the next state from the current one without side effects.
//!
//! Entries are identified by an [`EntryKey`] assigned when they are appended.
//! An edit targets a key, never a list position, so deleting other entries
//! while an edit is open cannot redirect it to a different record.

use serde::Serialize;
use thiserror::Error;

use crate::domain::Priority;

// =============================================================================
// Entry
// =============================================================================

/// Stable identity of a list entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct EntryKey(u64);

impl EntryKey {
    /// Returns the raw key value.
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for EntryKey {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// One task shown on the page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Entry {
    /// Key assigned on append.
    pub key: EntryKey,
    /// Title of the task.
    pub title: String,
    /// Description of the task.
    pub description: String,
    /// Priority level.
    pub priority: Priority,
}

impl Entry {
    fn from_draft(key: EntryKey, draft: Draft) -> Self {
        Self {
            key,
            title: draft.title,
            description: draft.description,
            priority: draft.priority,
        }
    }
}

// =============================================================================
// Draft
// =============================================================================

/// Contents of the add/edit form.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Draft {
    /// Title input.
    pub title: String,
    /// Description input.
    pub description: String,
    /// Priority select (medium by default).
    pub priority: Priority,
}

impl Draft {
    /// Creates a draft with the given values.
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        priority: Priority,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            priority,
        }
    }

    /// Checks the required fields.
    ///
    /// # Errors
    ///
    /// Returns one [`DraftError`] per blank required field.
    pub fn validate(&self) -> Result<(), Vec<DraftError>> {
        let errors: Vec<DraftError> = [
            self.title
                .trim()
                .is_empty()
                .then_some(DraftError::MissingTitle),
            self.description
                .trim()
                .is_empty()
                .then_some(DraftError::MissingDescription),
        ]
        .into_iter()
        .flatten()
        .collect();

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

impl From<&Entry> for Draft {
    fn from(entry: &Entry) -> Self {
        Self::new(entry.title.clone(), entry.description.clone(), entry.priority)
    }
}

/// A required form field left blank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DraftError {
    /// Title is blank.
    #[error("Title is required")]
    MissingTitle,
    /// Description is blank.
    #[error("Description is required")]
    MissingDescription,
}

impl DraftError {
    /// Name of the form field the error belongs to.
    #[must_use]
    pub const fn field(self) -> &'static str {
        match self {
            Self::MissingTitle => "title",
            Self::MissingDescription => "description",
        }
    }
}

// =============================================================================
// Actions
// =============================================================================

/// A user interaction on the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Show or hide the form.
    ToggleForm,
    /// Title input changed.
    SetTitle(String),
    /// Description input changed.
    SetDescription(String),
    /// Priority select changed.
    SetPriority(Priority),
    /// Form submitted.
    Submit,
    /// Edit button pressed on an entry.
    StartEdit(EntryKey),
    /// Delete button pressed on an entry.
    Delete(EntryKey),
    /// Edit abandoned without saving.
    CancelEdit,
}

// =============================================================================
// State
// =============================================================================

/// Complete state of the to-do list page.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TodoState {
    /// Whether the add/edit form is shown.
    pub form_visible: bool,
    /// Entry currently under edit, if any.
    pub editing: Option<EntryKey>,
    /// Form contents.
    pub draft: Draft,
    /// Entries in display order.
    pub entries: Vec<Entry>,
    /// Errors from the last rejected submit.
    pub errors: Vec<DraftError>,
    next_key: u64,
}

impl TodoState {
    /// Creates the initial page state: no entries, form hidden.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up an entry by key.
    #[must_use]
    pub fn entry(&self, key: EntryKey) -> Option<&Entry> {
        self.entries.iter().find(|entry| entry.key == key)
    }

    /// Returns the display position of an entry.
    #[must_use]
    pub fn position(&self, key: EntryKey) -> Option<usize> {
        self.entries.iter().position(|entry| entry.key == key)
    }

    /// Returns true while an entry is under edit.
    #[must_use]
    pub const fn is_editing(&self) -> bool {
        self.editing.is_some()
    }

    /// Applies an action, consuming the current state.
    #[must_use]
    pub fn apply(self, action: Action) -> Self {
        transition(self, action)
    }

    fn allocate_key(&mut self) -> EntryKey {
        let key = EntryKey(self.next_key);
        self.next_key += 1;
        key
    }

    fn close_form(&mut self) {
        self.editing = None;
        self.draft = Draft::default();
        self.form_visible = false;
        self.errors.clear();
    }
}

// =============================================================================
// Reducer
// =============================================================================

/// Computes the state that follows `action`.
///
/// Total over every state and action: an action naming an unknown key
/// leaves the state unchanged.
#[must_use]
pub fn reduce(state: &TodoState, action: Action) -> TodoState {
    transition(state.clone(), action)
}

fn transition(mut state: TodoState, action: Action) -> TodoState {
    match action {
        Action::ToggleForm => {
            state.form_visible = !state.form_visible;
        }
        Action::SetTitle(title) => state.draft.title = title,
        Action::SetDescription(description) => state.draft.description = description,
        Action::SetPriority(priority) => state.draft.priority = priority,
        Action::Submit => return submit(state),
        Action::StartEdit(key) => {
            if let Some(entry) = state.entry(key) {
                state.draft = Draft::from(entry);
                state.editing = Some(key);
                state.form_visible = true;
                state.errors.clear();
            }
        }
        Action::Delete(key) => {
            if let Some(position) = state.position(key) {
                state.entries.remove(position);
                if state.editing == Some(key) {
                    state.close_form();
                }
            }
        }
        Action::CancelEdit => state.close_form(),
    }
    state
}

fn submit(mut state: TodoState) -> TodoState {
    if let Err(errors) = state.draft.validate() {
        state.errors = errors;
        return state;
    }

    let draft = std::mem::take(&mut state.draft);
    let target = state.editing.and_then(|key| state.position(key));

    match target {
        Some(position) => {
            let key = state.entries[position].key;
            state.entries[position] = Entry::from_draft(key, draft);
        }
        None => {
            let key = state.allocate_key();
            state.entries.push(Entry::from_draft(key, draft));
        }
    }

    state.close_form();
    state
}

// =============================================================================
// Tests
// =============================================================================
