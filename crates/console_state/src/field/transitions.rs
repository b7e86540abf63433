//! Field transitions - FSM logic for one autocomplete field
//!
//! The field owns the operator's query and the resolved entry id. The id is
//! only ever set by an explicit selection, a reverse-lookup population or a
//! resolved create, and every query edit clears it.

use console_core::{EntryId, TaxonomyEntry, TaxonomyKind};

use super::events::FieldEvent;
use super::states::{AutocompleteFieldState, FieldState};
use crate::cache::filter_entries;
use crate::error::{ConsoleError, Result};

/// Represents a field transition result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldTransition {
    /// The state before the transition.
    pub from: FieldState,
    /// The state after the transition.
    pub to: FieldState,
    /// The event that triggered the transition.
    pub event: FieldEvent,
    /// Whether the state actually changed.
    pub changed: bool,
}

/// A free-text input resolved against a cached taxonomy list.
#[derive(Debug, Clone)]
pub struct AutocompleteField {
    kind: TaxonomyKind,
    query: String,
    selected_id: Option<EntryId>,
    state: FieldState,
    /// Bumped on every change of `query` or `selected_id`.
    revision: u64,
    create_pending: bool,
}

impl AutocompleteField {
    /// Create an empty, closed field.
    pub fn new(kind: TaxonomyKind) -> Self {
        Self {
            kind,
            query: String::new(),
            selected_id: None,
            state: FieldState::Closed,
            revision: 0,
            create_pending: false,
        }
    }

    pub fn kind(&self) -> TaxonomyKind {
        self.kind
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn selected_id(&self) -> Option<&EntryId> {
        self.selected_id.as_ref()
    }

    pub fn state(&self) -> FieldState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state.is_open()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Check if a create for this field is awaiting the backend.
    pub fn is_create_pending(&self) -> bool {
        self.create_pending
    }

    pub fn snapshot(&self) -> AutocompleteFieldState {
        AutocompleteFieldState {
            query: self.query.clone(),
            is_open: self.is_open(),
            selected_id: self.selected_id.clone(),
        }
    }

    /// Entries of `entries` matching the current query, in list order.
    pub fn candidates<'a>(&self, entries: &'a [TaxonomyEntry]) -> Vec<&'a TaxonomyEntry> {
        filter_entries(entries, &self.query)
    }

    /// Check if creating `query` as a new entry may be requested now.
    pub fn can_request_create(&self) -> bool {
        self.state.offers_create() && !self.query.trim().is_empty() && !self.create_pending
    }

    /// Operator focused the field. The selection is kept.
    pub fn on_focus(&mut self, entries: &[TaxonomyEntry]) -> FieldTransition {
        let (has_candidates, query_blank) = self.evaluate(entries);
        self.handle_event(FieldEvent::Focused {
            has_candidates,
            query_blank,
        })
    }

    /// Operator edited the query. Always clears the selection.
    pub fn on_query_change(
        &mut self,
        text: impl Into<String>,
        entries: &[TaxonomyEntry],
    ) -> FieldTransition {
        self.query = text.into();
        let (has_candidates, query_blank) = self.evaluate(entries);
        self.handle_event(FieldEvent::QueryChanged {
            has_candidates,
            query_blank,
        })
    }

    /// Operator picked `entry` from the candidates.
    pub fn on_select(&mut self, entry: &TaxonomyEntry) -> FieldTransition {
        self.query = entry.name.clone();
        self.selected_id = Some(entry.id.clone());
        self.revision += 1;
        self.handle_event(FieldEvent::Selected)
    }

    /// Operator dismissed the panel. Query and selection are kept.
    pub fn on_close(&mut self) -> FieldTransition {
        self.handle_event(FieldEvent::Dismissed)
    }

    /// Fill the field from an existing record.
    pub fn populate(&mut self, name: impl Into<String>, id: EntryId) -> FieldTransition {
        self.query = name.into();
        self.selected_id = Some(id);
        self.revision += 1;
        self.handle_event(FieldEvent::Populated)
    }

    /// Empty the field and forget any pending create.
    pub fn reset(&mut self) -> FieldTransition {
        self.query.clear();
        self.create_pending = false;
        self.handle_event(FieldEvent::Reset)
    }

    /// Re-evaluate an open panel after the reference list was reloaded.
    pub fn resync(&mut self, entries: &[TaxonomyEntry]) -> FieldTransition {
        let (has_candidates, query_blank) = self.evaluate(entries);
        self.handle_event(FieldEvent::CandidatesRefreshed {
            has_candidates,
            query_blank,
        })
    }

    /// Mark a create as in flight and return the proposed name.
    pub(crate) fn begin_create(&mut self) -> Result<String> {
        if self.create_pending {
            return Err(ConsoleError::CreateInFlight(self.kind));
        }
        if !self.can_request_create() {
            return Err(ConsoleError::CreateNotAvailable(self.kind));
        }
        self.create_pending = true;
        Ok(self.query.clone())
    }

    /// Adopt the entry created for `proposed_name`.
    pub(crate) fn resolve_create(
        &mut self,
        entry: &TaxonomyEntry,
        proposed_name: &str,
    ) -> FieldTransition {
        self.create_pending = false;
        self.query = proposed_name.to_string();
        self.selected_id = Some(entry.id.clone());
        self.revision += 1;
        self.handle_event(FieldEvent::Created)
    }

    /// Drop the pending create. The field keeps its state.
    pub(crate) fn abort_create(&mut self) {
        self.create_pending = false;
    }

    fn evaluate(&self, entries: &[TaxonomyEntry]) -> (bool, bool) {
        let has_candidates = entries.iter().any(|entry| entry.matches(&self.query));
        (has_candidates, self.query.trim().is_empty())
    }

    fn handle_event(&mut self, event: FieldEvent) -> FieldTransition {
        let from = self.state;
        let to = compute_next_state(from, &event);

        if event.clears_selection() {
            self.selected_id = None;
            self.revision += 1;
        }
        self.state = to;

        FieldTransition {
            from,
            to,
            event,
            changed: from != to,
        }
    }
}

/// Compute the next state given the current state and event.
fn compute_next_state(state: FieldState, event: &FieldEvent) -> FieldState {
    use FieldEvent::*;
    use FieldState::*;

    match (state, event) {
        // ========== Query Edits ==========
        (
            _,
            QueryChanged {
                has_candidates: true,
                ..
            },
        ) => OpenBrowsing,
        (
            _,
            QueryChanged {
                query_blank: false, ..
            },
        ) => OpenNoMatch,
        (_, QueryChanged { .. }) => Closed,

        // ========== Focus ==========
        (
            Closed,
            Focused {
                has_candidates: true,
                ..
            },
        ) => OpenBrowsing,
        (
            Closed,
            Focused {
                query_blank: false, ..
            },
        ) => OpenNoMatch,

        // ========== Reference List Reloads ==========
        (Closed, CandidatesRefreshed { .. }) => Closed,
        (
            _,
            CandidatesRefreshed {
                has_candidates: true,
                ..
            },
        ) => OpenBrowsing,
        (
            _,
            CandidatesRefreshed {
                query_blank: false, ..
            },
        ) => OpenNoMatch,
        (_, CandidatesRefreshed { .. }) => Closed,

        // ========== Resolution ==========
        (_, Selected | Dismissed | Populated | Created | Reset) => Closed,

        // ========== Default: No transition ==========
        _ => state,
    }
}
