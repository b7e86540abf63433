//! In-memory backend for exercising console state without a server.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use console_core::{
    ChatReply, ChatRequest, EntryId, HistoryRecord, NewTaxonomyEntry, Product, ProductPayload,
    TaxonomyEntry, TaxonomyKind,
};
use reqwest::StatusCode;

use crate::api::BackendApi;
use crate::error::{BackendError, Result};

/// Backend operations, used to script failures and count calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MockCall {
    Probe,
    SendMessage,
    ListProducts,
    GetProduct,
    CreateProduct,
    UpdateProduct,
    DeleteProduct,
    ListTaxonomy(TaxonomyKind),
    CreateTaxonomy(TaxonomyKind),
    ListHistory,
    ClearConversation,
}

#[derive(Debug)]
struct MockState {
    taxonomy: HashMap<TaxonomyKind, Vec<TaxonomyEntry>>,
    products: Vec<Product>,
    history: Vec<HistoryRecord>,
    chat_reply: ChatReply,
    next_id: u64,
    failing: HashSet<MockCall>,
    calls: Vec<MockCall>,
    chat_requests: Vec<ChatRequest>,
    payloads: Vec<ProductPayload>,
}

impl Default for MockState {
    fn default() -> Self {
        Self {
            taxonomy: HashMap::new(),
            products: Vec::new(),
            history: Vec::new(),
            chat_reply: ChatReply {
                success: true,
                message: "ok".to_string(),
                transfer_to_human: false,
            },
            next_id: 1,
            failing: HashSet::new(),
            calls: Vec::new(),
            chat_requests: Vec::new(),
            payloads: Vec::new(),
        }
    }
}

/// Scriptable [`BackendApi`] keeping its data in memory.
#[derive(Debug, Default)]
pub struct MockBackend {
    state: Mutex<MockState>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_taxonomy(self, kind: TaxonomyKind, entries: Vec<TaxonomyEntry>) -> Self {
        self.lock().taxonomy.insert(kind, entries);
        self
    }

    pub fn with_products(self, products: Vec<Product>) -> Self {
        self.lock().products = products;
        self
    }

    pub fn with_history(self, history: Vec<HistoryRecord>) -> Self {
        self.lock().history = history;
        self
    }

    /// Next id handed out by create calls.
    pub fn with_next_id(self, next_id: u64) -> Self {
        self.lock().next_id = next_id;
        self
    }

    pub fn with_chat_reply(self, message: &str, transfer_to_human: bool) -> Self {
        self.lock().chat_reply = ChatReply {
            success: true,
            message: message.to_string(),
            transfer_to_human,
        };
        self
    }

    /// Makes `call` fail with a 500 until [`MockBackend::recover`] is called.
    pub fn fail_on(&self, call: MockCall) {
        self.lock().failing.insert(call);
    }

    pub fn recover(&self, call: MockCall) {
        self.lock().failing.remove(&call);
    }

    /// Every call received so far, in order.
    pub fn calls(&self) -> Vec<MockCall> {
        self.lock().calls.clone()
    }

    pub fn call_count(&self, call: MockCall) -> usize {
        self.lock().calls.iter().filter(|c| **c == call).count()
    }

    pub fn total_calls(&self) -> usize {
        self.lock().calls.len()
    }

    pub fn taxonomy(&self, kind: TaxonomyKind) -> Vec<TaxonomyEntry> {
        self.lock().taxonomy.get(&kind).cloned().unwrap_or_default()
    }

    pub fn products(&self) -> Vec<Product> {
        self.lock().products.clone()
    }

    /// Product payloads received by create/update calls.
    pub fn payloads(&self) -> Vec<ProductPayload> {
        self.lock().payloads.clone()
    }

    pub fn chat_requests(&self) -> Vec<ChatRequest> {
        self.lock().chat_requests.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Records the call and returns the locked state, or a scripted failure.
    fn enter(&self, call: MockCall) -> Result<std::sync::MutexGuard<'_, MockState>> {
        let mut state = self.lock();
        state.calls.push(call);
        if state.failing.contains(&call) {
            return Err(BackendError::Status {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                body: format!("scripted failure for {call:?}"),
            });
        }
        Ok(state)
    }

    fn allocate_id(state: &mut MockState) -> EntryId {
        let id = EntryId::from(state.next_id);
        state.next_id += 1;
        id
    }
}

fn apply_payload(product: &mut Product, payload: &ProductPayload) {
    product.name = payload.name.clone();
    product.category_id = payload.category_id.clone();
    product.brand_id = payload.brand_id.clone();
    product.price = payload.price;
    product.stock = payload.stock;
    product.description = Some(payload.description.clone());
    product.specifications = payload.specifications.clone();
    product.condition = payload.condition;
}

#[async_trait]
impl BackendApi for MockBackend {
    async fn probe(&self) -> Result<()> {
        self.enter(MockCall::Probe)?;
        Ok(())
    }

    async fn send_message(&self, request: &ChatRequest) -> Result<ChatReply> {
        let mut state = self.enter(MockCall::SendMessage)?;
        state.chat_requests.push(request.clone());
        Ok(state.chat_reply.clone())
    }

    async fn list_products(&self) -> Result<Vec<Product>> {
        let state = self.enter(MockCall::ListProducts)?;
        Ok(state.products.clone())
    }

    async fn get_product(&self, id: &EntryId) -> Result<Product> {
        let state = self.enter(MockCall::GetProduct)?;
        state
            .products
            .iter()
            .find(|p| &p.id == id)
            .cloned()
            .ok_or_else(|| BackendError::NotFound(id.to_string()))
    }

    async fn create_product(&self, payload: &ProductPayload) -> Result<Option<EntryId>> {
        let mut state = self.enter(MockCall::CreateProduct)?;
        state.payloads.push(payload.clone());
        let id = Self::allocate_id(&mut state);
        let mut product = Product::new(id.clone(), payload.name.clone());
        apply_payload(&mut product, payload);
        state.products.push(product);
        Ok(Some(id))
    }

    async fn update_product(&self, id: &EntryId, payload: &ProductPayload) -> Result<()> {
        let mut state = self.enter(MockCall::UpdateProduct)?;
        state.payloads.push(payload.clone());
        let product = state
            .products
            .iter_mut()
            .find(|p| &p.id == id)
            .ok_or_else(|| BackendError::NotFound(id.to_string()))?;
        apply_payload(product, payload);
        Ok(())
    }

    async fn delete_product(&self, id: &EntryId) -> Result<()> {
        let mut state = self.enter(MockCall::DeleteProduct)?;
        state.products.retain(|p| &p.id != id);
        Ok(())
    }

    async fn list_taxonomy(&self, kind: TaxonomyKind) -> Result<Vec<TaxonomyEntry>> {
        let state = self.enter(MockCall::ListTaxonomy(kind))?;
        Ok(state.taxonomy.get(&kind).cloned().unwrap_or_default())
    }

    async fn create_taxonomy(
        &self,
        kind: TaxonomyKind,
        entry: &NewTaxonomyEntry,
    ) -> Result<TaxonomyEntry> {
        let mut state = self.enter(MockCall::CreateTaxonomy(kind))?;
        let id = Self::allocate_id(&mut state);
        let created = TaxonomyEntry::new(id, entry.name.clone());
        state.taxonomy.entry(kind).or_default().push(created.clone());
        Ok(created)
    }

    async fn list_history(&self, limit: usize) -> Result<Vec<HistoryRecord>> {
        let state = self.enter(MockCall::ListHistory)?;
        Ok(state.history.iter().take(limit).cloned().collect())
    }

    async fn clear_conversation(&self, _user_id: &str) -> Result<()> {
        self.enter(MockCall::ClearConversation)?;
        Ok(())
    }
}
