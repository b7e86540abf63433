//! Console error types

use backend_client::BackendError;
use console_core::TaxonomyKind;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConsoleError {
    #[error("Failed to fetch {what}: {source}")]
    Fetch {
        what: String,
        #[source]
        source: BackendError,
    },

    #[error("Failed to create {kind} {name:?}: {source}")]
    Create {
        kind: TaxonomyKind,
        name: String,
        #[source]
        source: BackendError,
    },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Failed to {action}: {source}")]
    Save {
        action: String,
        #[source]
        source: BackendError,
    },

    #[error("A {0} creation is already in flight")]
    CreateInFlight(TaxonomyKind),

    #[error("No {0} to create: the query is empty or matches existing entries")]
    CreateNotAvailable(TaxonomyKind),

    #[error("A product save is already in flight")]
    SaveInFlight,

    #[error("A product deletion is already in flight")]
    DeleteInFlight,

    #[error("Backend is offline")]
    Offline,
}

pub type Result<T> = std::result::Result<T, ConsoleError>;
