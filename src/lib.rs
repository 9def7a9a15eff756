//! semsearch library
//!
//! Semantic document search: deterministic embeddings, SQLite persistence,
//! flat nearest-neighbor retrieval.
//!
//! # Modules
//!
//! - `config`: user configuration and derived data paths
//! - `error`: library error type
//! - `store`: document persistence (in-memory and SQLite)
//! - `search`: embedder, flat index, and the search engine

pub mod config;
pub mod error;
pub mod search;
pub mod store;

// Re-exports for convenience
pub use config::{Config, DataPaths};
pub use error::{Result, SearchError};
pub use search::embedding::{cosine_similarity, Embedder, HashEmbedder, DEFAULT_DIMENSION};
pub use search::engine::{keyword_search, IndexingStats, SearchEngine, SearchHit};
pub use search::index::FlatIndex;
pub use store::{DocId, Document, DocumentStore, MemoryStore, SqliteStore};
