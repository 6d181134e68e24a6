//! Error type for content sync.

use thiserror::Error;

use crate::core::repository::RepositoryError;

/// Result type alias for sync operations.
pub type Result<T> = std::result::Result<T, SyncError>;

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("Remote content source is not configured")]
    NotConfigured,

    #[error("A sync is already running")]
    AlreadyRunning,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Remote returned status {status} for {url}")]
    Status { status: u16, url: String },

    #[error("Invalid remote content: {0}")]
    InvalidContent(String),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
