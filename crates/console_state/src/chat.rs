//! Chat transcript and backend reachability.

use backend_client::BackendApi;
use console_core::{ChatMessage, ChatRequest};
use serde::Serialize;
use tracing::{info, warn};

use crate::error::{ConsoleError, Result};

/// Transcript entry appended when the backend could not be reached.
pub const UNREACHABLE_TEXT: &str = "Error: check that the backend is running";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionStatus {
    Online,
    Offline,
}

/// Last known reachability of the backend. Starts online.
#[derive(Debug, Clone)]
pub struct Connectivity {
    status: ConnectionStatus,
}

impl Default for Connectivity {
    fn default() -> Self {
        Self {
            status: ConnectionStatus::Online,
        }
    }
}

impl Connectivity {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> ConnectionStatus {
        self.status
    }

    pub fn is_online(&self) -> bool {
        self.status == ConnectionStatus::Online
    }

    pub fn mark_online(&mut self) {
        self.set(ConnectionStatus::Online);
    }

    pub fn mark_offline(&mut self) {
        self.set(ConnectionStatus::Offline);
    }

    fn set(&mut self, status: ConnectionStatus) {
        if self.status != status {
            info!(?status, "Backend connectivity changed");
        }
        self.status = status;
    }

    /// Ping the backend and record the result.
    pub async fn probe(&mut self, backend: &dyn BackendApi) -> ConnectionStatus {
        match backend.probe().await {
            Ok(()) => self.mark_online(),
            Err(e) => {
                warn!(error = %e, "Backend probe failed");
                self.mark_offline();
            }
        }
        self.status
    }
}

/// Who chat turns are sent as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatIdentity {
    pub user_id: String,
    pub origin: String,
}

/// Append-only transcript of the current console session.
#[derive(Debug, Clone, Default)]
pub struct ChatLog {
    messages: Vec<ChatMessage>,
}

impl ChatLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Forget the local transcript. The backend history is untouched.
    pub fn clear(&mut self) {
        self.messages.clear();
    }

    /// Send `text` and append both sides of the turn.
    ///
    /// Returns `Ok(None)` for blank input. A failed call is recorded as an
    /// error entry and marks the backend offline; it is not an `Err`.
    pub async fn send(
        &mut self,
        text: &str,
        identity: &ChatIdentity,
        connectivity: &mut Connectivity,
        backend: &dyn BackendApi,
    ) -> Result<Option<ChatMessage>> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(None);
        }
        if !connectivity.is_online() {
            return Err(ConsoleError::Offline);
        }

        self.messages.push(ChatMessage::user(text));
        let request = ChatRequest {
            text: text.to_string(),
            origin: identity.origin.clone(),
            user_id: identity.user_id.clone(),
        };

        let reply = match backend.send_message(&request).await {
            Ok(reply) => {
                connectivity.mark_online();
                if !reply.success {
                    warn!("Backend answered with a failure message");
                }
                if reply.transfer_to_human {
                    warn!(user = %identity.user_id, "Conversation flagged for a human operator");
                }
                ChatMessage::bot(reply.message, reply.transfer_to_human)
            }
            Err(e) => {
                warn!(error = %e, "Chat message failed");
                if e.is_transport() {
                    connectivity.mark_offline();
                }
                ChatMessage::error(UNREACHABLE_TEXT)
            }
        };

        self.messages.push(reply.clone());
        Ok(Some(reply))
    }
}
