//! Error types for the search library.

use thiserror::Error;

use crate::store::DocId;

pub type Result<T> = std::result::Result<T, SearchError>;

#[derive(Debug, Error)]
pub enum SearchError {
    /// `search`/`retrieve` was called before `build_index`.
    #[error("search index not built (run build_index first)")]
    IndexNotBuilt,

    /// An embedding or query vector does not match the index dimension.
    #[error("embedding dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    /// Referenced a document id that is not in the store.
    #[error("document not found: {0}")]
    DocumentNotFound(DocId),

    /// A configuration value is outside its valid range.
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("config error: {0}")]
    Config(#[from] serde_yaml::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
