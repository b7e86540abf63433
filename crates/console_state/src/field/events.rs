//! Field events - Defines events that drive the autocomplete field

use serde::{Deserialize, Serialize};

/// Events that can trigger field state transitions.
///
/// Evaluation flags are computed by the field from the current query and
/// the cached candidate list before the event is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldEvent {
    /// The operator focused the field.
    Focused {
        has_candidates: bool,
        query_blank: bool,
    },

    /// The operator edited the query.
    QueryChanged {
        has_candidates: bool,
        query_blank: bool,
    },

    /// The reference list was reloaded while the panel was open.
    CandidatesRefreshed {
        has_candidates: bool,
        query_blank: bool,
    },

    /// The operator picked a candidate.
    Selected,

    /// The operator dismissed the panel.
    Dismissed,

    /// The field was filled from an existing product.
    Populated,

    /// A create for the typed name was resolved.
    Created,

    /// The field was emptied.
    Reset,
}

impl FieldEvent {
    /// Check if this event clears the selected id.
    pub fn clears_selection(&self) -> bool {
        matches!(self, Self::QueryChanged { .. } | Self::Reset)
    }
}
