//! Field states - Defines the states of an autocomplete field

use console_core::EntryId;
use serde::{Deserialize, Serialize};

/// States of an autocomplete field's suggestion panel.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum FieldState {
    /// Panel hidden.
    #[default]
    Closed,

    /// Panel shown with at least one matching candidate.
    OpenBrowsing,

    /// Panel shown with a non-empty query and no candidate. The only state
    /// from which a create may be requested.
    OpenNoMatch,
}

impl FieldState {
    /// Check if the suggestion panel is visible.
    pub fn is_open(&self) -> bool {
        !matches!(self, Self::Closed)
    }

    /// Check if the state offers creating the typed entry.
    pub fn offers_create(&self) -> bool {
        matches!(self, Self::OpenNoMatch)
    }
}

/// Externally observable value of a field.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
pub struct AutocompleteFieldState {
    pub query: String,
    pub is_open: bool,
    pub selected_id: Option<EntryId>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_helpers() {
        assert!(!FieldState::Closed.is_open());
        assert!(FieldState::OpenBrowsing.is_open());
        assert!(FieldState::OpenNoMatch.is_open());

        assert!(FieldState::OpenNoMatch.offers_create());
        assert!(!FieldState::OpenBrowsing.offers_create());
        assert!(!FieldState::Closed.offers_create());
    }

    #[test]
    fn test_state_serialization() {
        let json = serde_json::to_string(&FieldState::OpenNoMatch).unwrap();
        assert_eq!(json, "\"open_no_match\"");
    }
}
