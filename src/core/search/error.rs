//! Error type for monster search.

use thiserror::Error;

use crate::core::repository::RepositoryError;

/// Result type alias for search operations.
pub type Result<T> = std::result::Result<T, SearchError>;

/// Any failure while loading search candidates. There is no retry and no
/// partial result: the whole search fails.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Unexpected error while searching monsters: {source}")]
    Unexpected {
        #[from]
        source: RepositoryError,
    },
}
