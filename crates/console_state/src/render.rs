//! Serializable snapshot of everything the console displays.

use console_core::{
    ChatMessage, Condition, EntryId, HistoryRecord, Product, TaxonomyEntry, TaxonomyKind,
};
use serde::Serialize;
use uuid::Uuid;

use crate::cache::ReferenceCache;
use crate::chat::ConnectionStatus;
use crate::field::{AutocompleteField, AutocompleteFieldState, FieldState};
use crate::lifecycle::{DraftLifecycle, DraftPhase};
use crate::session::Tab;

/// One autocomplete field as displayed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldView {
    #[serde(flatten)]
    pub value: AutocompleteFieldState,
    pub state: FieldState,
    pub candidates: Vec<TaxonomyEntry>,
    pub can_create: bool,
    pub create_pending: bool,
}

impl FieldView {
    pub fn new(field: &AutocompleteField, entries: &[TaxonomyEntry]) -> Self {
        Self {
            value: field.snapshot(),
            state: field.state(),
            candidates: field.candidates(entries).into_iter().cloned().collect(),
            can_create: field.can_request_create(),
            create_pending: field.is_create_pending(),
        }
    }
}

/// The product form as displayed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DraftView {
    pub phase: DraftPhase,
    pub saving: bool,
    pub name: String,
    pub price: f64,
    pub stock: i64,
    pub description: String,
    pub specifications: String,
    pub condition: Condition,
    pub category: FieldView,
    pub brand: FieldView,
}

impl DraftView {
    pub fn new(lifecycle: &DraftLifecycle, cache: &ReferenceCache) -> Self {
        let draft = lifecycle.draft();
        let field_view = |kind: TaxonomyKind| FieldView::new(draft.field(kind), cache.entries(kind));
        Self {
            phase: lifecycle.phase(),
            saving: lifecycle.is_saving(),
            name: draft.name.clone(),
            price: draft.price,
            stock: draft.stock,
            description: draft.description.clone(),
            specifications: draft.specifications.clone(),
            condition: draft.condition,
            category: field_view(TaxonomyKind::Category),
            brand: field_view(TaxonomyKind::Brand),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RenderState {
    pub session_id: Uuid,
    pub connection_status: ConnectionStatus,
    pub can_send: bool,
    pub active_tab: Tab,
    pub chat_log: Vec<ChatMessage>,
    pub products: Vec<Product>,
    pub deleting: Option<EntryId>,
    pub categories: Vec<TaxonomyEntry>,
    pub brands: Vec<TaxonomyEntry>,
    pub history: Vec<HistoryRecord>,
    pub draft: DraftView,
}
