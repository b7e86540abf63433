//! Product list shown next to the form.

use backend_client::BackendApi;
use console_core::{EntryId, Product};
use tracing::{info, warn};

use crate::error::{ConsoleError, Result};

#[derive(Debug, Clone, Default)]
pub struct ProductCatalog {
    products: Vec<Product>,
    loaded: bool,
    deleting: Option<EntryId>,
}

impl ProductCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn find(&self, id: &EntryId) -> Option<&Product> {
        self.products.iter().find(|product| &product.id == id)
    }

    /// Product whose deletion is awaiting the backend.
    pub fn deleting(&self) -> Option<&EntryId> {
        self.deleting.as_ref()
    }

    /// Reload the list. On failure the previous list is kept.
    pub async fn refresh(&mut self, backend: &dyn BackendApi) -> Result<usize> {
        let products = backend
            .list_products()
            .await
            .map_err(|source| ConsoleError::Fetch {
                what: "products".to_string(),
                source,
            })?;
        self.products = products;
        self.loaded = true;
        Ok(self.products.len())
    }

    /// Delete `id` and reload the list.
    pub async fn delete(&mut self, id: &EntryId, backend: &dyn BackendApi) -> Result<()> {
        if self.deleting.is_some() {
            return Err(ConsoleError::DeleteInFlight);
        }
        self.deleting = Some(id.clone());
        let result = backend.delete_product(id).await;
        self.deleting = None;

        result.map_err(|source| ConsoleError::Save {
            action: format!("delete product {id}"),
            source,
        })?;
        info!(product = %id, "Product deleted");

        if let Err(e) = self.refresh(backend).await {
            warn!(error = %e, "Reload after delete failed");
            self.products.retain(|product| &product.id != id);
        }
        Ok(())
    }
}
