//! Content sync
//!
//! Downloads the published monster and spell lists for the content language
//! and merges them into the local store without touching local changes.

pub mod error;
pub mod pipeline;
pub mod remote;

pub use error::{Result, SyncError};
pub use pipeline::{
    normalize_language, SyncCounts, SyncEvent, SyncReport, SyncService, DEFAULT_LANGUAGE,
    SUPPORTED_LANGUAGES,
};
pub use remote::{HttpContentSource, RemoteContentSource};

#[cfg(test)]
pub use remote::MockRemoteContentSource;
