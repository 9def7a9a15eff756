//! Semantic search over stored documents
//!
//! Deterministic feature-hash embeddings plus a flat cosine index. The
//! `Embedder` trait and `FlatIndex` are the seams where a model-backed
//! provider or an ANN structure would go.

pub mod embedding;
pub mod engine;
pub mod index;

pub use embedding::{cosine_similarity, Embedder, HashEmbedder};
pub use engine::{keyword_search, IndexingStats, SearchEngine, SearchHit};
pub use index::FlatIndex;
