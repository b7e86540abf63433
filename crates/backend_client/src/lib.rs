pub mod api;
pub mod client;
pub mod error;
pub mod middleware;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use api::BackendApi;
pub use client::HttpBackend;
pub use error::{BackendError, Result};
pub use middleware::RequestLogger;
