use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP middleware error: {0}")]
    Middleware(#[from] reqwest_middleware::Error),

    #[error("Backend returned {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("Failed to decode backend response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid backend URL: {0}")]
    InvalidUrl(String),
}

impl BackendError {
    /// True when the backend could not be reached at all (as opposed to
    /// answering with an error).
    pub fn is_transport(&self) -> bool {
        match self {
            Self::Http(err) | Self::Middleware(reqwest_middleware::Error::Reqwest(err)) => {
                err.is_connect() || err.is_timeout() || err.is_request()
            }
            Self::Middleware(_) => true,
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, BackendError>;
