//! Create-on-miss for taxonomy fields.
//!
//! A field with a non-empty query and no candidate may offer to create the
//! typed name. The operator confirms, the backend creates the entry, the
//! cached list is reloaded and the field selects the new id.

use async_trait::async_trait;
use backend_client::BackendApi;
use console_core::{NewTaxonomyEntry, TaxonomyEntry, TaxonomyKind};
use tracing::{info, warn};

use crate::cache::ReferenceCache;
use crate::error::{ConsoleError, Result};
use crate::lifecycle::DraftLifecycle;

/// Asks the operator a yes/no question.
#[async_trait]
pub trait Confirm: Send + Sync {
    async fn confirm(&self, prompt: &str) -> bool;
}

/// Confirmation question shown before creating `name`.
pub fn create_prompt(kind: TaxonomyKind, name: &str) -> String {
    format!("Create new {kind} \"{name}\"?")
}

/// A taxonomy create in flight.
#[derive(Debug, Clone)]
pub struct CreateTicket {
    pub kind: TaxonomyKind,
    pub proposed_name: String,
    pub(crate) generation: u64,
    pub(crate) field_revision: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreateOutcome {
    /// The operator said no. Nothing was sent.
    Declined,
    /// Created and selected in the field.
    Created(TaxonomyEntry),
    /// Created and cached, but the form moved on and the field was left alone.
    Discarded(TaxonomyEntry),
}

/// Runs one create-on-miss round for a field of the draft.
pub struct TaxonomyCreation<'a> {
    backend: &'a dyn BackendApi,
    confirm: &'a dyn Confirm,
}

impl<'a> TaxonomyCreation<'a> {
    pub fn new(backend: &'a dyn BackendApi, confirm: &'a dyn Confirm) -> Self {
        Self { backend, confirm }
    }

    pub async fn run(
        &self,
        lifecycle: &mut DraftLifecycle,
        cache: &mut ReferenceCache,
        kind: TaxonomyKind,
    ) -> Result<CreateOutcome> {
        let field = lifecycle.field(kind);
        if field.is_create_pending() {
            return Err(ConsoleError::CreateInFlight(kind));
        }
        if !field.can_request_create() {
            return Err(ConsoleError::CreateNotAvailable(kind));
        }

        let prompt = create_prompt(kind, field.query());
        if !self.confirm.confirm(&prompt).await {
            info!(%kind, "Create declined by operator");
            return Ok(CreateOutcome::Declined);
        }

        let ticket = lifecycle.begin_create(kind)?;
        let request = NewTaxonomyEntry::named(ticket.proposed_name.as_str());
        let entry = match self.backend.create_taxonomy(kind, &request).await {
            Ok(entry) => entry,
            Err(source) => {
                lifecycle.fail_create(&ticket);
                warn!(%kind, name = %ticket.proposed_name, error = %source, "Create failed");
                return Err(ConsoleError::Create {
                    kind,
                    name: ticket.proposed_name,
                    source,
                });
            }
        };
        info!(%kind, id = %entry.id, name = %entry.name, "Created reference entry");

        // A failed reload still leaves the new entry resolvable.
        if cache.refresh(kind, self.backend).await.is_err() {
            warn!(%kind, "Reload after create failed, appending entry locally");
        }
        cache.insert_created(kind, entry.clone());

        Ok(lifecycle.complete_create(ticket, entry))
    }
}
