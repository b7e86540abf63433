//! console_core - Core types for the operator console
//!
//! This crate provides the data model shared by the backend client and the
//! console state crates:
//! - `id` - opaque backend identifiers
//! - `taxonomy` - categories and brands
//! - `product` - catalog products and the payload submitted on save
//! - `chat` - chat turns and the in-memory transcript entries
//! - `history` - processed-message records served by the backend
//! - `config` - console configuration

pub mod chat;
pub mod config;
pub mod history;
pub mod id;
pub mod paths;
pub mod product;
pub mod taxonomy;

// Re-export commonly used types
pub use chat::{ChatMessage, ChatReply, ChatRequest, MessageKind};
pub use config::ConsoleConfig;
pub use history::HistoryRecord;
pub use id::EntryId;
pub use product::{Condition, Product, ProductPayload};
pub use taxonomy::{CreatedEntry, NewTaxonomyEntry, TaxonomyEntry, TaxonomyKind};
