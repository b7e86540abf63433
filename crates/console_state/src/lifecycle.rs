//! Draft lifecycle: create, edit, cancel and save of the product form.
//!
//! Every async operation is split into a `begin_*` step that hands out a
//! ticket stamped with the current generation, and a `complete_*` step that
//! drops the result when the draft was reset or replaced in the meantime.

use backend_client::{BackendApi, BackendError};
use console_core::{Condition, EntryId, Product, ProductPayload, TaxonomyEntry, TaxonomyKind};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::cache::ReferenceCache;
use crate::creation::{CreateOutcome, CreateTicket};
use crate::draft::ProductDraft;
use crate::error::{ConsoleError, Result};
use crate::field::{AutocompleteField, FieldTransition};

/// Lifecycle phase of the form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DraftPhase {
    Idle,
    Creating,
    Editing(EntryId),
}

/// What a save submits to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveTarget {
    Create,
    Update(EntryId),
}

impl SaveTarget {
    fn describe(&self) -> String {
        match self {
            Self::Create => "create product".to_string(),
            Self::Update(id) => format!("update product {id}"),
        }
    }
}

/// A save in flight.
#[derive(Debug, Clone)]
pub struct SaveTicket {
    pub target: SaveTarget,
    pub payload: ProductPayload,
    generation: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// New product stored; the id is absent if the backend did not echo one.
    Created(Option<EntryId>),
    Updated(EntryId),
    /// The draft changed while the save was in flight.
    Discarded,
}

/// Owns the product draft and the guards around its async operations.
#[derive(Debug, Clone, Default)]
pub struct DraftLifecycle {
    draft: ProductDraft,
    active: bool,
    generation: u64,
    save_in_flight: bool,
}

impl DraftLifecycle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> DraftPhase {
        match (self.active, self.draft.editing_id()) {
            (false, _) => DraftPhase::Idle,
            (true, None) => DraftPhase::Creating,
            (true, Some(id)) => DraftPhase::Editing(id.clone()),
        }
    }

    pub fn draft(&self) -> &ProductDraft {
        &self.draft
    }

    /// Mutable access for plain form inputs. Touching an idle form starts a
    /// new product.
    pub fn draft_mut(&mut self) -> &mut ProductDraft {
        self.active = true;
        &mut self.draft
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_saving(&self) -> bool {
        self.save_in_flight
    }

    pub fn field(&self, kind: TaxonomyKind) -> &AutocompleteField {
        self.draft.field(kind)
    }

    /// Blank form for a new product.
    pub fn start_create(&mut self) {
        self.replace_draft(ProductDraft::blank());
        info!(generation = self.generation, "Started new product draft");
    }

    /// Form filled from `product`.
    pub fn start_edit(&mut self, product: &Product, cache: &ReferenceCache) {
        self.replace_draft(ProductDraft::from_product(product, cache));
        info!(generation = self.generation, product = %product.id, "Editing product");
    }

    /// Abandon the current draft. Results still in flight are dropped.
    pub fn cancel(&mut self) {
        self.start_create();
    }

    fn replace_draft(&mut self, draft: ProductDraft) {
        self.draft = draft;
        self.active = true;
        self.generation += 1;
        self.save_in_flight = false;
    }

    // ========== Scalar Inputs ==========

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.draft_mut().name = name.into();
    }

    pub fn set_price(&mut self, price: f64) {
        self.draft_mut().price = price;
    }

    pub fn set_stock(&mut self, stock: i64) {
        self.draft_mut().stock = stock;
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.draft_mut().description = description.into();
    }

    pub fn set_specifications(&mut self, specifications: impl Into<String>) {
        self.draft_mut().specifications = specifications.into();
    }

    pub fn set_condition(&mut self, condition: Condition) {
        self.draft_mut().condition = condition;
    }

    // ========== Field Events ==========

    pub fn on_focus(&mut self, kind: TaxonomyKind, cache: &ReferenceCache) -> FieldTransition {
        self.draft_mut().field_mut(kind).on_focus(cache.entries(kind))
    }

    pub fn on_query_change(
        &mut self,
        kind: TaxonomyKind,
        text: impl Into<String>,
        cache: &ReferenceCache,
    ) -> FieldTransition {
        self.draft_mut()
            .field_mut(kind)
            .on_query_change(text, cache.entries(kind))
    }

    pub fn on_select(&mut self, kind: TaxonomyKind, entry: &TaxonomyEntry) -> FieldTransition {
        self.draft_mut().field_mut(kind).on_select(entry)
    }

    pub fn on_close(&mut self, kind: TaxonomyKind) -> FieldTransition {
        self.draft.field_mut(kind).on_close()
    }

    /// Re-evaluate open panels of `kind` after its list was reloaded.
    pub fn resync_field(&mut self, kind: TaxonomyKind, cache: &ReferenceCache) {
        self.draft.field_mut(kind).resync(cache.entries(kind));
    }

    // ========== Taxonomy Creation ==========

    /// Reserve a create for the query currently typed in `kind`.
    pub fn begin_create(&mut self, kind: TaxonomyKind) -> Result<CreateTicket> {
        let field = self.draft.field_mut(kind);
        let proposed_name = field.begin_create()?;
        Ok(CreateTicket {
            kind,
            proposed_name,
            generation: self.generation,
            field_revision: field.revision(),
        })
    }

    /// Apply a created entry to the field it was requested from, unless the
    /// draft or that field changed since.
    pub fn complete_create(&mut self, ticket: CreateTicket, entry: TaxonomyEntry) -> CreateOutcome {
        if ticket.generation != self.generation {
            debug!(kind = %ticket.kind, "Draft replaced while creating, leaving fields untouched");
            return CreateOutcome::Discarded(entry);
        }

        let field = self.draft.field_mut(ticket.kind);
        if field.revision() != ticket.field_revision {
            field.abort_create();
            debug!(kind = %ticket.kind, "Field edited while creating, not selecting created entry");
            return CreateOutcome::Discarded(entry);
        }

        field.resolve_create(&entry, &ticket.proposed_name);
        CreateOutcome::Created(entry)
    }

    /// Release the field after a failed create. It stays in its no-match state.
    pub fn fail_create(&mut self, ticket: &CreateTicket) {
        if ticket.generation == self.generation {
            self.draft.field_mut(ticket.kind).abort_create();
        }
    }

    // ========== Save ==========

    pub fn begin_save(&mut self) -> Result<SaveTicket> {
        if self.save_in_flight {
            return Err(ConsoleError::SaveInFlight);
        }
        self.draft.validate()?;

        let target = match self.draft.editing_id() {
            Some(id) => SaveTarget::Update(id.clone()),
            None => SaveTarget::Create,
        };
        self.active = true;
        self.save_in_flight = true;
        Ok(SaveTicket {
            target,
            payload: self.draft.to_payload(),
            generation: self.generation,
        })
    }

    /// On success the form returns to a blank new product. On failure the
    /// draft is kept for another attempt.
    pub fn complete_save(
        &mut self,
        ticket: SaveTicket,
        result: std::result::Result<Option<EntryId>, BackendError>,
    ) -> Result<SaveOutcome> {
        if ticket.generation != self.generation {
            debug!("Draft replaced while saving, dropping save result");
            return Ok(SaveOutcome::Discarded);
        }
        self.save_in_flight = false;

        match result {
            Ok(created_id) => {
                let outcome = match ticket.target {
                    SaveTarget::Create => SaveOutcome::Created(created_id),
                    SaveTarget::Update(id) => SaveOutcome::Updated(id),
                };
                info!(?outcome, "Product saved");
                self.start_create();
                Ok(outcome)
            }
            Err(source) => {
                warn!(error = %source, "Product save failed, keeping draft");
                Err(ConsoleError::Save {
                    action: ticket.target.describe(),
                    source,
                })
            }
        }
    }

    /// Validate and submit the draft.
    pub async fn save(&mut self, backend: &dyn BackendApi) -> Result<SaveOutcome> {
        let ticket = self.begin_save()?;
        let result = match &ticket.target {
            SaveTarget::Create => backend.create_product(&ticket.payload).await,
            SaveTarget::Update(id) => backend
                .update_product(id, &ticket.payload)
                .await
                .map(|_| None),
        };
        self.complete_save(ticket, result)
    }
}
