//! Autocomplete field module
//!
//! Contains the FSM for one free-text reference field (category or brand)
//! bound to a cached taxonomy list.

mod events;
mod states;
mod transitions;

pub use events::FieldEvent;
pub use states::{AutocompleteFieldState, FieldState};
pub use transitions::{AutocompleteField, FieldTransition};
