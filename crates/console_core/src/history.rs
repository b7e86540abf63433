use serde::{Deserialize, Serialize};

use crate::id::EntryId;

/// A processed chat turn as recorded by the backend (`GET /historico`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub id: EntryId,
    #[serde(rename = "texto")]
    pub text: String,
    #[serde(rename = "resposta", default)]
    pub response: Option<String>,
    #[serde(rename = "usuario_id", default)]
    pub user_id: Option<String>,
    #[serde(rename = "origem", default)]
    pub origin: Option<String>,
    /// Backend timestamp, kept verbatim (SQLite `CURRENT_TIMESTAMP` format).
    #[serde(rename = "processado_em", default)]
    pub processed_at: Option<String>,
}
