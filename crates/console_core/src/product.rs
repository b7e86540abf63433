//! Catalog products as served by the backend, and the payload submitted on save.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use crate::id::{self, EntryId};

/// Physical condition of a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Condition {
    #[default]
    #[serde(rename = "novo")]
    New,
    #[serde(rename = "seminovo")]
    SemiNew,
    #[serde(rename = "usado")]
    Used,
}

impl Condition {
    pub fn label(&self) -> &'static str {
        match self {
            Self::New => "new",
            Self::SemiNew => "semi-new",
            Self::Used => "used",
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for Condition {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "new" | "novo" => Ok(Self::New),
            "semi-new" | "seminew" | "seminovo" => Ok(Self::SemiNew),
            "used" | "usado" => Ok(Self::Used),
            other => Err(format!("unknown condition: {other}")),
        }
    }
}

/// The backend stores free text here; unknown or missing values read as new.
fn condition_or_default<'de, D>(deserializer: D) -> Result<Condition, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?
        .and_then(|raw| raw.parse().ok())
        .unwrap_or_default())
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A product record owned by the backend.
///
/// `category_name`/`brand_name` are joined in by the backend and may be used
/// when the local taxonomy cache has not seen the referenced entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: EntryId,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "categoria_id", default, deserialize_with = "id::optional")]
    pub category_id: Option<EntryId>,
    #[serde(rename = "marca_id", default, deserialize_with = "id::optional")]
    pub brand_id: Option<EntryId>,
    #[serde(rename = "categoria_nome", default)]
    pub category_name: Option<String>,
    #[serde(rename = "marca_nome", default)]
    pub brand_name: Option<String>,
    #[serde(rename = "preco", default, deserialize_with = "null_as_default")]
    pub price: f64,
    #[serde(rename = "estoque", default, deserialize_with = "null_as_default")]
    pub stock: i64,
    #[serde(rename = "descricao", default)]
    pub description: Option<String>,
    #[serde(rename = "especificacoes", default)]
    pub specifications: Option<String>,
    #[serde(rename = "condicao", default, deserialize_with = "condition_or_default")]
    pub condition: Condition,
    /// Backend columns this console does not interpret.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Product {
    pub fn new(id: impl Into<EntryId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category_id: None,
            brand_id: None,
            category_name: None,
            brand_name: None,
            price: 0.0,
            stock: 0,
            description: None,
            specifications: None,
            condition: Condition::New,
            extra: serde_json::Map::new(),
        }
    }
}

/// Body of a product create/update request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductPayload {
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "categoria_id")]
    pub category_id: Option<EntryId>,
    #[serde(rename = "marca_id")]
    pub brand_id: Option<EntryId>,
    #[serde(rename = "preco")]
    pub price: f64,
    #[serde(rename = "descricao")]
    pub description: String,
    #[serde(rename = "especificacoes")]
    pub specifications: Option<String>,
    #[serde(rename = "condicao")]
    pub condition: Condition,
    #[serde(rename = "estoque")]
    pub stock: i64,
}
