//! Render model of the to-do list page.
//!
//! [`TodoView`] is everything a renderer needs to draw the page for one
//! [`TodoState`]: labels are already chosen and CSS classes already built.

use serde::Serialize;

use super::state::{Draft, EntryKey, TodoState};

/// Page heading.
pub const HEADING: &str = "To-Do List";

/// Page contents derived from a [`TodoState`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TodoView {
    /// Page heading.
    pub heading: &'static str,
    /// Label of the button that shows/hides the form.
    pub toggle_label: &'static str,
    /// The form, present only while it is shown.
    pub form: Option<FormView>,
    /// One card per entry, in display order.
    pub cards: Vec<CardView>,
}

/// The add/edit form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormView {
    /// Current input values.
    pub draft: Draft,
    /// `Add` for a new entry, `Update` while editing.
    pub submit_label: &'static str,
    /// Messages from the last rejected submit, keyed by field name.
    pub errors: Vec<(&'static str, String)>,
}

/// A single task card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardView {
    /// Key to send back with edit/delete actions.
    pub key: EntryKey,
    /// Card heading.
    pub title: String,
    /// Card body.
    pub description: String,
    /// `High`, `Medium` or `Low`.
    pub priority_label: String,
    /// `task-card priority-{high|medium|low}`.
    pub class_name: String,
}

impl From<&TodoState> for TodoView {
    fn from(state: &TodoState) -> Self {
        let form = state.form_visible.then(|| FormView {
            draft: state.draft.clone(),
            submit_label: if state.is_editing() { "Update" } else { "Add" },
            errors: state
                .errors
                .iter()
                .map(|error| (error.field(), error.to_string()))
                .collect(),
        });

        let cards = state
            .entries
            .iter()
            .map(|entry| CardView {
                key: entry.key,
                title: entry.title.clone(),
                description: entry.description.clone(),
                priority_label: entry.priority.to_string(),
                class_name: format!("task-card priority-{}", entry.priority.as_str()),
            })
            .collect();

        Self {
            heading: HEADING,
            toggle_label: if state.form_visible {
                "Close form"
            } else {
                "Add new task"
            },
            form,
            cards,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Priority;
    use crate::todo::Action;
    use rstest::rstest;

    fn with_entry() -> TodoState {
        TodoState::new()
            .apply(Action::ToggleForm)
            .apply(Action::SetTitle("Buy milk".to_string()))
            .apply(Action::SetDescription("2%".to_string()))
            .apply(Action::SetPriority(Priority::High))
            .apply(Action::Submit)
    }

    #[rstest]
    fn test_hidden_form() {
        let view = TodoView::from(&TodoState::new());
        assert_eq!(view.heading, HEADING);
        assert_eq!(view.toggle_label, "Add new task");
        assert!(view.form.is_none());
        assert!(view.cards.is_empty());
    }

    #[rstest]
    fn test_add_form_labels() {
        let view = TodoView::from(&TodoState::new().apply(Action::ToggleForm));
        assert_eq!(view.toggle_label, "Close form");
        assert_eq!(view.form.map(|form| form.submit_label), Some("Add"));
    }

    #[rstest]
    fn test_edit_form_labels() {
        let state = with_entry();
        let key = state.entries[0].key;
        let view = TodoView::from(&state.apply(Action::StartEdit(key)));

        let form = view.form.unwrap();
        assert_eq!(form.submit_label, "Update");
        assert_eq!(form.draft.title, "Buy milk");
    }

    #[rstest]
    #[case(Priority::High, "High", "task-card priority-high")]
    #[case(Priority::Medium, "Medium", "task-card priority-medium")]
    #[case(Priority::Low, "Low", "task-card priority-low")]
    fn test_card_priority(#[case] priority: Priority, #[case] label: &str, #[case] class: &str) {
        let state = with_entry();
        let key = state.entries[0].key;
        let state = state
            .apply(Action::StartEdit(key))
            .apply(Action::SetPriority(priority))
            .apply(Action::Submit);

        let card = &TodoView::from(&state).cards[0];
        assert_eq!(card.priority_label, label);
        assert_eq!(card.class_name, class);
    }

    #[rstest]
    fn test_errors_are_rendered() {
        let state = TodoState::new()
            .apply(Action::ToggleForm)
            .apply(Action::Submit);
        let form = TodoView::from(&state).form.unwrap();

        assert_eq!(
            form.errors,
            vec![
                ("title", "Title is required".to_string()),
                ("description", "Description is required".to_string()),
            ]
        );
    }

    #[rstest]
    fn test_serializes_to_json() {
        let json = serde_json::to_value(TodoView::from(&with_entry())).unwrap();
        assert_eq!(json["cards"][0]["title"], "Buy milk");
        assert_eq!(json["cards"][0]["class_name"], "task-card priority-high");
        assert_eq!(json["cards"][0]["key"], 0);
        assert!(json["form"].is_null());
    }
}
