//! Local copy of the taxonomy reference lists.

use std::collections::HashMap;

use backend_client::BackendApi;
use console_core::{EntryId, TaxonomyEntry, TaxonomyKind};
use tracing::{debug, info, warn};

use crate::error::{ConsoleError, Result};

/// Entries of `entries` whose name contains `query`, ignoring case.
/// An empty query returns every entry. Order is preserved.
pub fn filter_entries<'a>(entries: &'a [TaxonomyEntry], query: &str) -> Vec<&'a TaxonomyEntry> {
    entries.iter().filter(|entry| entry.matches(query)).collect()
}

/// Category and brand lists as last fetched from the backend.
///
/// Each list is replaced wholesale, never mutated in place, so slices handed
/// out earlier stay consistent with the list they came from.
#[derive(Debug, Clone, Default)]
pub struct ReferenceCache {
    lists: HashMap<TaxonomyKind, Vec<TaxonomyEntry>>,
}

impl ReferenceCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The cached list for `kind`, empty until first loaded.
    pub fn entries(&self, kind: TaxonomyKind) -> &[TaxonomyEntry] {
        self.lists.get(&kind).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_loaded(&self, kind: TaxonomyKind) -> bool {
        self.lists.contains_key(&kind)
    }

    pub fn replace(&mut self, kind: TaxonomyKind, entries: Vec<TaxonomyEntry>) {
        self.lists.insert(kind, entries);
    }

    /// Name of the entry with `id`, if cached.
    pub fn lookup(&self, kind: TaxonomyKind, id: &EntryId) -> Option<&str> {
        self.entries(kind)
            .iter()
            .find(|entry| &entry.id == id)
            .map(|entry| entry.name.as_str())
    }

    pub fn filter(&self, kind: TaxonomyKind, query: &str) -> Vec<&TaxonomyEntry> {
        filter_entries(self.entries(kind), query)
    }

    /// Reload the list for `kind`. On failure the previous list is kept.
    pub async fn refresh(&mut self, kind: TaxonomyKind, backend: &dyn BackendApi) -> Result<usize> {
        match backend.list_taxonomy(kind).await {
            Ok(entries) => {
                let count = entries.len();
                self.replace(kind, entries);
                info!(%kind, count, "Reference list refreshed");
                Ok(count)
            }
            Err(source) => {
                warn!(%kind, error = %source, "Reference list refresh failed, keeping cached copy");
                Err(ConsoleError::Fetch {
                    what: format!("{} list", kind),
                    source,
                })
            }
        }
    }

    /// Load the list for `kind` unless it was loaded before.
    pub async fn ensure_loaded(&mut self, kind: TaxonomyKind, backend: &dyn BackendApi) -> Result<()> {
        if self.is_loaded(kind) {
            return Ok(());
        }
        self.refresh(kind, backend).await.map(|_| ())
    }

    /// Add a freshly created entry that a reload did not return.
    pub(crate) fn insert_created(&mut self, kind: TaxonomyKind, entry: TaxonomyEntry) {
        if self.lookup(kind, &entry.id).is_some() {
            return;
        }
        debug!(%kind, id = %entry.id, "Appending created entry to cached list");
        let mut entries = self.entries(kind).to_vec();
        entries.push(entry);
        self.replace(kind, entries);
    }
}
