//! Taxonomy reference entries (categories and brands).

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::id::EntryId;

/// The two taxonomy collections a product can reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaxonomyKind {
    Category,
    Brand,
}

impl TaxonomyKind {
    pub const ALL: [TaxonomyKind; 2] = [TaxonomyKind::Category, TaxonomyKind::Brand];

    /// Backend collection path segment for this kind.
    pub fn collection(&self) -> &'static str {
        match self {
            Self::Category => "categorias",
            Self::Brand => "marcas",
        }
    }

    /// Human-readable singular label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Category => "category",
            Self::Brand => "brand",
        }
    }
}

impl fmt::Display for TaxonomyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for TaxonomyKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "category" | "categories" | "categoria" | "categorias" => Ok(Self::Category),
            "brand" | "brands" | "marca" | "marcas" => Ok(Self::Brand),
            other => Err(format!("unknown taxonomy kind: {other}")),
        }
    }
}

/// A named reference object with a backend-assigned identifier.
///
/// Name uniqueness is backend policy; nothing here deduplicates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxonomyEntry {
    pub id: EntryId,
    #[serde(rename = "nome")]
    pub name: String,
}

impl TaxonomyEntry {
    pub fn new(id: impl Into<EntryId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }

    /// Case-insensitive substring match. An empty query matches everything.
    pub fn matches(&self, query: &str) -> bool {
        query.is_empty() || self.name.to_lowercase().contains(&query.to_lowercase())
    }
}

/// Body of a taxonomy create request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTaxonomyEntry {
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "descricao", default)]
    pub description: String,
}

impl NewTaxonomyEntry {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
        }
    }
}

/// Response of a taxonomy create request. The backend only guarantees `id`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatedEntry {
    pub id: EntryId,
    #[serde(rename = "nome", default)]
    pub name: Option<String>,
}

impl CreatedEntry {
    /// Resolves the created entry, falling back to the name that was proposed.
    pub fn into_entry(self, proposed_name: &str) -> TaxonomyEntry {
        TaxonomyEntry {
            id: self.id,
            name: self.name.unwrap_or_else(|| proposed_name.to_string()),
        }
    }
}
