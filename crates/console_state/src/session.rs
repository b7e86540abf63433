//! Console session: the context object every operator intent goes through.

use std::sync::Arc;

use backend_client::BackendApi;
use console_core::{ChatMessage, ConsoleConfig, EntryId, Product, TaxonomyEntry, TaxonomyKind};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::cache::ReferenceCache;
use crate::catalog::ProductCatalog;
use crate::chat::{ChatIdentity, ChatLog, ConnectionStatus, Connectivity};
use crate::creation::{Confirm, CreateOutcome, TaxonomyCreation};
use crate::error::{ConsoleError, Result};
use crate::field::FieldTransition;
use crate::history::HistoryView;
use crate::lifecycle::{DraftLifecycle, SaveOutcome};
use crate::render::{DraftView, RenderState};

/// Console views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tab {
    #[default]
    Chat,
    Products,
    History,
}

impl std::str::FromStr for Tab {
    type Err = String;

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "chat" => Ok(Self::Chat),
            "products" | "produtos" => Ok(Self::Products),
            "history" | "historico" => Ok(Self::History),
            other => Err(format!("unknown tab: {other}")),
        }
    }
}

/// State of one operator console, driven by one intent at a time.
pub struct ConsoleSession {
    id: Uuid,
    config: ConsoleConfig,
    backend: Arc<dyn BackendApi>,
    active_tab: Tab,
    connectivity: Connectivity,
    chat: ChatLog,
    catalog: ProductCatalog,
    history: HistoryView,
    cache: ReferenceCache,
    draft: DraftLifecycle,
}

impl ConsoleSession {
    pub fn new(config: ConsoleConfig, backend: Arc<dyn BackendApi>) -> Self {
        let id = Uuid::new_v4();
        info!(session = %id, api_base = %config.api_base, "Console session started");
        Self {
            id,
            config,
            backend,
            active_tab: Tab::default(),
            connectivity: Connectivity::new(),
            chat: ChatLog::new(),
            catalog: ProductCatalog::new(),
            history: HistoryView::new(),
            cache: ReferenceCache::new(),
            draft: DraftLifecycle::new(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn config(&self) -> &ConsoleConfig {
        &self.config
    }

    pub fn active_tab(&self) -> Tab {
        self.active_tab
    }

    pub fn connectivity(&self) -> &Connectivity {
        &self.connectivity
    }

    pub fn chat(&self) -> &ChatLog {
        &self.chat
    }

    pub fn catalog(&self) -> &ProductCatalog {
        &self.catalog
    }

    pub fn history(&self) -> &HistoryView {
        &self.history
    }

    pub fn cache(&self) -> &ReferenceCache {
        &self.cache
    }

    pub fn draft(&self) -> &DraftLifecycle {
        &self.draft
    }

    /// Plain form inputs (name, price, stock, ...).
    pub fn draft_mut(&mut self) -> &mut DraftLifecycle {
        &mut self.draft
    }

    fn identity(&self) -> ChatIdentity {
        ChatIdentity {
            user_id: self.config.user_id.clone(),
            origin: self.config.origin.clone(),
        }
    }

    // ========== Chat ==========

    pub async fn probe(&mut self) -> ConnectionStatus {
        self.connectivity.probe(self.backend.as_ref()).await
    }

    pub async fn send_message(&mut self, text: &str) -> Result<Option<ChatMessage>> {
        let identity = self.identity();
        self.chat
            .send(text, &identity, &mut self.connectivity, self.backend.as_ref())
            .await
    }

    pub fn clear_chat(&mut self) {
        self.chat.clear();
    }

    /// Drop the backend's conversation memory for the configured user.
    pub async fn clear_conversation(&mut self) -> Result<()> {
        let user_id = self.config.user_id.clone();
        self.backend
            .clear_conversation(&user_id)
            .await
            .map_err(|source| ConsoleError::Save {
                action: format!("clear conversation of {user_id}"),
                source,
            })?;
        self.chat.clear();
        info!(session = %self.id, user = %user_id, "Conversation cleared");
        Ok(())
    }

    // ========== Tabs and Lists ==========

    /// Switch view and reload what it shows. Reload failures are returned
    /// but never block the switch.
    pub async fn select_tab(&mut self, tab: Tab) -> Vec<ConsoleError> {
        self.active_tab = tab;
        let mut failures = Vec::new();
        match tab {
            Tab::Chat => {}
            Tab::Products => {
                if let Err(e) = self.refresh_products().await {
                    failures.push(e);
                }
                for kind in TaxonomyKind::ALL {
                    if let Err(e) = self.refresh_taxonomy(kind).await {
                        failures.push(e);
                    }
                }
            }
            Tab::History => {
                if let Err(e) = self.refresh_history().await {
                    failures.push(e);
                }
            }
        }
        for failure in &failures {
            warn!(session = %self.id, ?tab, error = %failure, "Reload failed");
        }
        failures
    }

    pub async fn refresh_products(&mut self) -> Result<usize> {
        self.catalog.refresh(self.backend.as_ref()).await
    }

    /// Reload one reference list and re-evaluate the matching field.
    pub async fn refresh_taxonomy(&mut self, kind: TaxonomyKind) -> Result<usize> {
        let count = self.cache.refresh(kind, self.backend.as_ref()).await?;
        self.draft.resync_field(kind, &self.cache);
        Ok(count)
    }

    pub async fn refresh_history(&mut self) -> Result<usize> {
        let limit = self.config.history_limit;
        self.history.refresh(self.backend.as_ref(), limit).await
    }

    // ========== Product Form ==========

    pub fn start_create(&mut self) {
        self.draft.start_create();
    }

    pub fn start_edit_product(&mut self, product: &Product) {
        self.draft.start_edit(product, &self.cache);
    }

    /// Edit product `id`, fetching it when it is not in the loaded list.
    /// Reference lists not loaded yet are fetched first so both fields can
    /// show names.
    pub async fn start_edit(&mut self, id: &EntryId) -> Result<()> {
        for kind in TaxonomyKind::ALL {
            if let Err(e) = self.cache.ensure_loaded(kind, self.backend.as_ref()).await {
                warn!(session = %self.id, error = %e, "Editing with an unloaded reference list");
            }
        }

        let product = match self.catalog.find(id) {
            Some(product) => product.clone(),
            None => self
                .backend
                .get_product(id)
                .await
                .map_err(|source| ConsoleError::Fetch {
                    what: format!("product {id}"),
                    source,
                })?,
        };
        self.draft.start_edit(&product, &self.cache);
        Ok(())
    }

    pub fn cancel_draft(&mut self) {
        self.draft.cancel();
    }

    /// Submit the form; the product list is reloaded after a stored save.
    pub async fn save_draft(&mut self) -> Result<SaveOutcome> {
        let outcome = self.draft.save(self.backend.as_ref()).await?;
        if outcome != SaveOutcome::Discarded {
            if let Err(e) = self.refresh_products().await {
                warn!(session = %self.id, error = %e, "Reload after save failed");
            }
        }
        Ok(outcome)
    }

    pub fn focus_field(&mut self, kind: TaxonomyKind) -> FieldTransition {
        self.draft.on_focus(kind, &self.cache)
    }

    pub fn query_changed(&mut self, kind: TaxonomyKind, text: &str) -> FieldTransition {
        self.draft.on_query_change(kind, text, &self.cache)
    }

    pub fn select_entry(&mut self, kind: TaxonomyKind, entry: &TaxonomyEntry) -> FieldTransition {
        self.draft.on_select(kind, entry)
    }

    /// Select the `index`-th current candidate of `kind`.
    pub fn select_candidate(&mut self, kind: TaxonomyKind, index: usize) -> Option<TaxonomyEntry> {
        let entry = self
            .draft
            .field(kind)
            .candidates(self.cache.entries(kind))
            .get(index)
            .map(|entry| (*entry).clone())?;
        self.draft.on_select(kind, &entry);
        Some(entry)
    }

    pub fn close_field(&mut self, kind: TaxonomyKind) -> FieldTransition {
        self.draft.on_close(kind)
    }

    /// Offer to create the typed name of `kind`.
    pub async fn request_create(
        &mut self,
        kind: TaxonomyKind,
        confirm: &dyn Confirm,
    ) -> Result<CreateOutcome> {
        TaxonomyCreation::new(self.backend.as_ref(), confirm)
            .run(&mut self.draft, &mut self.cache, kind)
            .await
    }

    /// Delete product `id` after confirmation. Returns whether it was deleted.
    pub async fn delete_product(&mut self, id: &EntryId, confirm: &dyn Confirm) -> Result<bool> {
        let label = self
            .catalog
            .find(id)
            .map(|product| product.name.clone())
            .unwrap_or_else(|| id.to_string());
        if !confirm.confirm(&format!("Delete product \"{label}\"?")).await {
            return Ok(false);
        }
        self.catalog.delete(id, self.backend.as_ref()).await?;
        Ok(true)
    }

    // ========== Rendering ==========

    pub fn draft_view(&self) -> DraftView {
        DraftView::new(&self.draft, &self.cache)
    }

    pub fn render_state(&self) -> RenderState {
        RenderState {
            session_id: self.id,
            connection_status: self.connectivity.status(),
            can_send: self.connectivity.is_online(),
            active_tab: self.active_tab,
            chat_log: self.chat.messages().to_vec(),
            products: self.catalog.products().to_vec(),
            deleting: self.catalog.deleting().cloned(),
            categories: self.cache.entries(TaxonomyKind::Category).to_vec(),
            brands: self.cache.entries(TaxonomyKind::Brand).to_vec(),
            history: self.history.records().to_vec(),
            draft: self.draft_view(),
        }
    }
}
