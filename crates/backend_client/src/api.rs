use async_trait::async_trait;
use console_core::{
    ChatReply, ChatRequest, EntryId, HistoryRecord, NewTaxonomyEntry, Product, ProductPayload,
    TaxonomyEntry, TaxonomyKind,
};

use crate::error::Result;

/// Request/response contract of the automation backend.
///
/// The console only ever talks to the backend through this trait, so state
/// logic can be exercised against an in-memory implementation.
#[async_trait]
pub trait BackendApi: Send + Sync {
    /// Liveness probe (`GET /`). Any success means online.
    async fn probe(&self) -> Result<()>;

    /// One chat turn (`POST /mensagem`).
    async fn send_message(&self, request: &ChatRequest) -> Result<ChatReply>;

    /// Active products (`GET /dados/produtos`).
    async fn list_products(&self) -> Result<Vec<Product>>;

    /// Single product (`GET /dados/produtos/{id}`).
    async fn get_product(&self, id: &EntryId) -> Result<Product>;

    /// Create a product, returning the assigned id when the backend reports one.
    async fn create_product(&self, payload: &ProductPayload) -> Result<Option<EntryId>>;

    /// Replace a product (`PUT /dados/produtos/{id}`).
    async fn update_product(&self, id: &EntryId, payload: &ProductPayload) -> Result<()>;

    /// Remove a product (`DELETE /dados/produtos/{id}`).
    async fn delete_product(&self, id: &EntryId) -> Result<()>;

    /// Full entry list of a taxonomy collection.
    async fn list_taxonomy(&self, kind: TaxonomyKind) -> Result<Vec<TaxonomyEntry>>;

    /// Create a taxonomy entry. The returned entry always carries a name: the
    /// one reported by the backend, or the requested one.
    async fn create_taxonomy(
        &self,
        kind: TaxonomyKind,
        entry: &NewTaxonomyEntry,
    ) -> Result<TaxonomyEntry>;

    /// Most recent processed messages, newest first (`GET /historico`).
    async fn list_history(&self, limit: usize) -> Result<Vec<HistoryRecord>>;

    /// Drop the backend's conversation memory for a user
    /// (`DELETE /historico/{user_id}`).
    async fn clear_conversation(&self, user_id: &str) -> Result<()>;
}
