//! Chat turns exchanged with the backend and the local transcript entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Who produced a transcript entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    User,
    Bot,
    Error,
}

/// One entry of the in-memory chat transcript. Never mutated after append.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub kind: MessageKind,
    pub text: String,
    pub timestamp: DateTime<Utc>,
    /// The backend flagged this turn for a human operator. Rendering the
    /// flag is left to the presentation layer.
    #[serde(default)]
    pub transfer_to_human: bool,
}

impl ChatMessage {
    fn with_kind(kind: MessageKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
            timestamp: Utc::now(),
            transfer_to_human: false,
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::with_kind(MessageKind::User, text)
    }

    pub fn bot(text: impl Into<String>, transfer_to_human: bool) -> Self {
        Self {
            transfer_to_human,
            ..Self::with_kind(MessageKind::Bot, text)
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self::with_kind(MessageKind::Error, text)
    }
}

/// Body of `POST /mensagem`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    #[serde(rename = "texto")]
    pub text: String,
    #[serde(rename = "origem")]
    pub origin: String,
    #[serde(rename = "usuario_id")]
    pub user_id: String,
}

fn default_success() -> bool {
    true
}

/// Response of `POST /mensagem`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatReply {
    /// `false` when the backend caught an internal failure; `message` then
    /// carries its apology text.
    #[serde(rename = "sucesso", default = "default_success")]
    pub success: bool,
    #[serde(rename = "mensagem")]
    pub message: String,
    #[serde(rename = "transferir_humano", default)]
    pub transfer_to_human: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reply_defaults() {
        let reply: ChatReply = serde_json::from_str(r#"{"mensagem": "Oi!"}"#).unwrap();
        assert!(reply.success);
        assert!(!reply.transfer_to_human);
        assert_eq!(reply.message, "Oi!");
    }

    #[test]
    fn test_request_wire_names() {
        let request = ChatRequest {
            text: "hello".to_string(),
            origin: "web".to_string(),
            user_id: "user".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            serde_json::json!({"texto": "hello", "origem": "web", "usuario_id": "user"})
        );
    }

    #[test]
    fn test_message_constructors() {
        assert_eq!(ChatMessage::user("hi").kind, MessageKind::User);
        assert!(ChatMessage::bot("ok", true).transfer_to_human);
        assert!(!ChatMessage::error("down").transfer_to_human);
    }
}
