//! console_state - Draft controller and session state for the operator console
//!
//! The centerpiece is the taxonomy-resolving product form: free-text
//! category/brand fields matched against a cached reference list, with
//! create-on-miss, kept in sync with a product draft across create, edit,
//! cancel and save. Around it sit the simpler pieces of the console session:
//! chat transcript, connectivity flag, product list and history.

pub mod cache;
pub mod catalog;
pub mod chat;
pub mod creation;
pub mod draft;
pub mod error;
pub mod field;
pub mod history;
pub mod lifecycle;
pub mod render;
pub mod session;

// Re-export commonly used types
pub use cache::ReferenceCache;
pub use catalog::ProductCatalog;
pub use chat::{ChatIdentity, ChatLog, ConnectionStatus, Connectivity};
pub use creation::{Confirm, CreateOutcome, CreateTicket, TaxonomyCreation};
pub use draft::ProductDraft;
pub use error::{ConsoleError, Result};
pub use field::{AutocompleteField, AutocompleteFieldState, FieldEvent, FieldState, FieldTransition};
pub use history::HistoryView;
pub use lifecycle::{DraftLifecycle, DraftPhase, SaveOutcome, SaveTarget, SaveTicket};
pub use render::{DraftView, FieldView, RenderState};
pub use session::{ConsoleSession, Tab};
