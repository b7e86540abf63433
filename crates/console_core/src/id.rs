//! Opaque identifiers issued by the backend.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Identifier of a backend-owned record (product, category, brand, history row).
///
/// The backend issues UUID strings, but identifiers are treated as opaque text.
/// Integer ids are accepted on the wire and normalized to their decimal form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "RawId")]
pub struct EntryId(String);

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Integer(i64),
}

impl From<RawId> for EntryId {
    fn from(raw: RawId) -> Self {
        match raw {
            RawId::Text(text) => EntryId(text),
            RawId::Integer(value) => EntryId(value.to_string()),
        }
    }
}

impl EntryId {
    pub fn new(id: impl Into<String>) -> Self {
        EntryId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntryId {
    fn from(value: &str) -> Self {
        EntryId(value.to_string())
    }
}

impl From<String> for EntryId {
    fn from(value: String) -> Self {
        EntryId(value)
    }
}

impl From<u64> for EntryId {
    fn from(value: u64) -> Self {
        EntryId(value.to_string())
    }
}

/// Deserializes an optional foreign key, treating `null` and `""` as absent.
///
/// Older console builds stored unresolved category/brand references as empty
/// strings.
pub fn optional<'de, D>(deserializer: D) -> Result<Option<EntryId>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawId>::deserialize(deserializer)?;
    Ok(raw.map(EntryId::from).filter(|id| !id.is_empty()))
}
