use std::sync::Arc;

use async_trait::async_trait;
use console_core::{
    ChatReply, ChatRequest, ConsoleConfig, CreatedEntry, EntryId, HistoryRecord,
    NewTaxonomyEntry, Product, ProductPayload, TaxonomyEntry, TaxonomyKind,
};
use log::{error, info, warn};
use reqwest::{Client, Proxy, Response, Url};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use serde::de::DeserializeOwned;

use crate::api::BackendApi;
use crate::error::{BackendError, Result};
use crate::middleware::RequestLogger;

const PRODUCTS_PATH: [&str; 2] = ["dados", "produtos"];

/// reqwest-backed implementation of [`BackendApi`].
#[derive(Clone)]
pub struct HttpBackend {
    client: Arc<ClientWithMiddleware>,
    base_url: Url,
}

impl std::fmt::Debug for HttpBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpBackend")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl HttpBackend {
    pub fn new(config: &ConsoleConfig) -> Result<Self> {
        let client = Self::build_http_client(config)?;
        Self::with_client(&config.api_base, client)
    }

    /// Builds a backend around an existing reqwest client.
    pub fn with_client(base_url: &str, client: Client) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| BackendError::InvalidUrl(format!("{base_url}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(BackendError::InvalidUrl(base_url.to_string()));
        }

        Ok(Self {
            client: Arc::new(Self::build_middleware_client(client)),
            base_url,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn build_http_client(config: &ConsoleConfig) -> Result<Client> {
        let mut builder = Client::builder();
        if let Some(proxy) = config.http_proxy.as_deref() {
            builder = builder.proxy(Proxy::http(proxy)?);
        }
        Ok(builder.build()?)
    }

    fn build_middleware_client(client: Client) -> ClientWithMiddleware {
        ClientBuilder::new(client).with(RequestLogger).build()
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| BackendError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn product_endpoint(&self, id: &EntryId) -> Result<Url> {
        self.endpoint(&[PRODUCTS_PATH[0], PRODUCTS_PATH[1], id.as_str()])
    }

    async fn ensure_success(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        error!("Backend request failed with status {status}: {body}");
        Err(BackendError::Status { status, body })
    }

    async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T> {
        let response = Self::ensure_success(response).await?;
        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| {
            error!("Failed to decode backend response: {e}");
            BackendError::Decode(e)
        })
    }
}

#[async_trait]
impl BackendApi for HttpBackend {
    async fn probe(&self) -> Result<()> {
        let response = self.client.get(self.base_url.clone()).send().await?;
        Self::ensure_success(response).await?;
        Ok(())
    }

    async fn send_message(&self, request: &ChatRequest) -> Result<ChatReply> {
        let url = self.endpoint(&["mensagem"])?;
        let response = self.client.post(url).json(request).send().await?;
        let reply: ChatReply = Self::read_json(response).await?;
        if !reply.success {
            warn!("Backend reported a failed chat turn: {}", reply.message);
        }
        Ok(reply)
    }

    async fn list_products(&self) -> Result<Vec<Product>> {
        let url = self.endpoint(&PRODUCTS_PATH)?;
        let response = self.client.get(url).send().await?;
        let products: Vec<Product> = Self::read_json(response).await?;
        info!("Loaded {} products", products.len());
        Ok(products)
    }

    async fn get_product(&self, id: &EntryId) -> Result<Product> {
        let url = self.product_endpoint(id)?;
        let response = self.client.get(url).send().await?;
        let value: serde_json::Value = Self::read_json(response).await?;

        // Missing products come back as 200 with an `erro` field.
        if let Some(message) = value.get("erro").and_then(|v| v.as_str()) {
            return Err(BackendError::NotFound(format!("{id}: {message}")));
        }
        Ok(serde_json::from_value(value)?)
    }

    async fn create_product(&self, payload: &ProductPayload) -> Result<Option<EntryId>> {
        let url = self.endpoint(&PRODUCTS_PATH)?;
        let response = self.client.post(url).json(payload).send().await?;
        let value: serde_json::Value = Self::read_json(response).await?;
        Ok(value
            .get("id")
            .cloned()
            .and_then(|id| serde_json::from_value::<EntryId>(id).ok()))
    }

    async fn update_product(&self, id: &EntryId, payload: &ProductPayload) -> Result<()> {
        let url = self.product_endpoint(id)?;
        let response = self.client.put(url).json(payload).send().await?;
        Self::ensure_success(response).await?;
        Ok(())
    }

    async fn delete_product(&self, id: &EntryId) -> Result<()> {
        let url = self.product_endpoint(id)?;
        let response = self.client.delete(url).send().await?;
        Self::ensure_success(response).await?;
        Ok(())
    }

    async fn list_taxonomy(&self, kind: TaxonomyKind) -> Result<Vec<TaxonomyEntry>> {
        let url = self.endpoint(&[kind.collection()])?;
        let response = self.client.get(url).send().await?;
        Self::read_json(response).await
    }

    async fn create_taxonomy(
        &self,
        kind: TaxonomyKind,
        entry: &NewTaxonomyEntry,
    ) -> Result<TaxonomyEntry> {
        let url = self.endpoint(&[kind.collection()])?;
        let response = self.client.post(url).json(entry).send().await?;
        let created: CreatedEntry = Self::read_json(response).await?;
        info!("Created {} {:?} with id {}", kind, entry.name, created.id);
        Ok(created.into_entry(&entry.name))
    }

    async fn list_history(&self, limit: usize) -> Result<Vec<HistoryRecord>> {
        let url = self.endpoint(&["historico"])?;
        let response = self
            .client
            .get(url)
            .query(&[("limite", limit)])
            .send()
            .await?;
        Self::read_json(response).await
    }

    async fn clear_conversation(&self, user_id: &str) -> Result<()> {
        let url = self.endpoint(&["historico", user_id])?;
        let response = self.client.delete(url).send().await?;
        Self::ensure_success(response).await?;
        Ok(())
    }
}
