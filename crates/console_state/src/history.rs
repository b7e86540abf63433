//! Processed-message history served by the backend.

use backend_client::BackendApi;
use console_core::HistoryRecord;

use crate::error::{ConsoleError, Result};

#[derive(Debug, Clone, Default)]
pub struct HistoryView {
    records: Vec<HistoryRecord>,
    loaded: bool,
}

impl HistoryView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records, newest first.
    pub fn records(&self) -> &[HistoryRecord] {
        &self.records
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Reload the most recent `limit` records. On failure the previous
    /// records are kept.
    pub async fn refresh(&mut self, backend: &dyn BackendApi, limit: usize) -> Result<usize> {
        let records = backend
            .list_history(limit)
            .await
            .map_err(|source| ConsoleError::Fetch {
                what: "history".to_string(),
                source,
            })?;
        self.records = records;
        self.loaded = true;
        Ok(self.records.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use backend_client::testing::{MockBackend, MockCall};
    use console_core::EntryId;

    fn record(id: &str, text: &str) -> HistoryRecord {
        HistoryRecord {
            id: EntryId::new(id),
            text: text.to_string(),
            response: None,
            user_id: Some("user".to_string()),
            origin: Some("web".to_string()),
            processed_at: None,
        }
    }

    #[tokio::test]
    async fn test_refresh_honours_limit() {
        let backend = MockBackend::new().with_history(vec![
            record("h3", "c"),
            record("h2", "b"),
            record("h1", "a"),
        ]);
        let mut history = HistoryView::new();

        assert_eq!(history.refresh(&backend, 2).await.unwrap(), 2);
        assert_eq!(history.records()[0].id, EntryId::new("h3"));
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_records() {
        let backend = MockBackend::new().with_history(vec![record("h1", "a")]);
        let mut history = HistoryView::new();
        history.refresh(&backend, 50).await.unwrap();

        backend.fail_on(MockCall::ListHistory);
        assert!(history.refresh(&backend, 50).await.is_err());
        assert_eq!(history.records().len(), 1);
        assert!(history.is_loaded());
    }
}
