//! The product form being filled in.

use console_core::{Condition, EntryId, Product, ProductPayload, TaxonomyKind};
use tracing::debug;

use crate::cache::ReferenceCache;
use crate::error::{ConsoleError, Result};
use crate::field::AutocompleteField;

/// In-progress product form.
///
/// Category and brand ids live in their autocomplete fields, so the draft
/// always submits exactly what the fields resolved.
#[derive(Debug, Clone)]
pub struct ProductDraft {
    pub name: String,
    pub price: f64,
    pub description: String,
    pub specifications: String,
    pub condition: Condition,
    pub stock: i64,
    category: AutocompleteField,
    brand: AutocompleteField,
    editing_id: Option<EntryId>,
}

impl Default for ProductDraft {
    fn default() -> Self {
        Self::blank()
    }
}

impl ProductDraft {
    pub fn blank() -> Self {
        Self {
            name: String::new(),
            price: 0.0,
            description: String::new(),
            specifications: String::new(),
            condition: Condition::New,
            stock: 0,
            category: AutocompleteField::new(TaxonomyKind::Category),
            brand: AutocompleteField::new(TaxonomyKind::Brand),
            editing_id: None,
        }
    }

    /// Draft editing `product`, with both reference fields filled by reverse
    /// lookup in `cache`.
    pub fn from_product(product: &Product, cache: &ReferenceCache) -> Self {
        let mut draft = Self {
            name: product.name.clone(),
            price: product.price,
            description: product.description.clone().unwrap_or_default(),
            specifications: product.specifications.clone().unwrap_or_default(),
            condition: product.condition,
            stock: product.stock,
            editing_id: Some(product.id.clone()),
            ..Self::blank()
        };
        populate_reference(
            &mut draft.category,
            cache,
            product.category_id.as_ref(),
            product.category_name.as_deref(),
        );
        populate_reference(
            &mut draft.brand,
            cache,
            product.brand_id.as_ref(),
            product.brand_name.as_deref(),
        );
        draft
    }

    /// Id of the product being edited; `None` for a new product.
    pub fn editing_id(&self) -> Option<&EntryId> {
        self.editing_id.as_ref()
    }

    pub fn field(&self, kind: TaxonomyKind) -> &AutocompleteField {
        match kind {
            TaxonomyKind::Category => &self.category,
            TaxonomyKind::Brand => &self.brand,
        }
    }

    pub fn field_mut(&mut self, kind: TaxonomyKind) -> &mut AutocompleteField {
        match kind {
            TaxonomyKind::Category => &mut self.category,
            TaxonomyKind::Brand => &mut self.brand,
        }
    }

    pub fn category_id(&self) -> Option<&EntryId> {
        self.category.selected_id()
    }

    pub fn brand_id(&self) -> Option<&EntryId> {
        self.brand.selected_id()
    }

    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(ConsoleError::Validation("product name is required".to_string()));
        }
        Ok(())
    }

    /// Body submitted on save. Blank specifications are sent as absent.
    pub fn to_payload(&self) -> ProductPayload {
        let specifications = self.specifications.trim();
        ProductPayload {
            name: self.name.trim().to_string(),
            category_id: self.category_id().cloned(),
            brand_id: self.brand_id().cloned(),
            price: self.price,
            description: self.description.clone(),
            specifications: (!specifications.is_empty()).then(|| self.specifications.clone()),
            condition: self.condition,
            stock: self.stock,
        }
    }
}

fn populate_reference(
    field: &mut AutocompleteField,
    cache: &ReferenceCache,
    id: Option<&EntryId>,
    embedded_name: Option<&str>,
) {
    let Some(id) = id else {
        return;
    };
    let kind = field.kind();
    let name = cache
        .lookup(kind, id)
        .or(embedded_name)
        .map(str::to_string)
        .unwrap_or_else(|| {
            debug!(%kind, %id, "Referenced entry not cached, keeping id with an empty query");
            String::new()
        });
    field.populate(name, id.clone());
}
