//! The to-do list page as a state machine.
//!
//! Holds no network or storage handles; the page is not wired to the task
//! service.

pub mod state;
pub mod view;

pub use state::{Action, Draft, DraftError, Entry, EntryKey, TodoState, reduce};
pub use view::{CardView, FormView, TodoView};
