// Error types for tiledeck.
// Transport failures are absorbed by the fetch layer; the rest surface at startup.

use std::time::Duration;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TileError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status} from {url}")]
    Status {
        status: reqwest::StatusCode,
        url: String,
    },

    #[error("Fetch for tab '{tab}' timed out after {after:?}")]
    Timeout { tab: String, after: Duration },

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Malformed payload: {0}")]
    Malformed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Fetch task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("Unknown tab: {0}")]
    UnknownTab(String),
}

impl TileError {
    /// Whether this error belongs to the transport family the fetcher absorbs.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            TileError::Http(_)
                | TileError::Status { .. }
                | TileError::Timeout { .. }
                | TileError::Json(_)
                | TileError::Malformed(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, TileError>;
