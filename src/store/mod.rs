//! Document storage
//!
//! The engine only needs an append-only sequence of (text, embedding) rows,
//! so storage sits behind the `DocumentStore` trait with two backends:
//!
//! - `MemoryStore`: plain in-memory rows, used by tests and ephemeral engines
//! - `SqliteStore`: persistent rows with embeddings stored as BLOBs

pub mod memory;
pub mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::{SqliteStore, StoreStats};

use crate::error::Result;

/// Store-assigned document id (SQLite rowid semantics: first id is 1).
pub type DocId = i64;

/// A stored text document.
///
/// Documents are immutable once added; there is no delete operation. The
/// embedding lives next to the document in the store and may be rewritten by
/// a reindex, the text never changes.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: DocId,
    pub text: String,
    /// Originating file path for imported documents.
    pub source: Option<String>,
    /// Unix timestamp of insertion.
    pub added_at: i64,
}

/// Append-only storage of documents and their embeddings.
///
/// Rows are returned in insertion order. Implementations do not validate
/// embedding dimensions; the index enforces dimensionality when it is built
/// and queried.
pub trait DocumentStore {
    /// Append a document with its embedding, returning the stored record.
    fn add_document(&mut self, text: &str, source: Option<&str>, embedding: &[f32]) -> Result<Document>;

    /// Look up a single document by id.
    fn document(&self, id: DocId) -> Result<Option<Document>>;

    /// All documents without embeddings, in insertion order.
    fn documents(&self) -> Result<Vec<Document>>;

    /// All (document, embedding) rows, in insertion order.
    fn all_documents(&self) -> Result<Vec<(Document, Vec<f32>)>>;

    /// Replace the embedding of an existing document.
    fn update_embedding(&mut self, id: DocId, embedding: &[f32]) -> Result<()>;

    /// Number of stored documents.
    fn count(&self) -> Result<usize>;

    /// Set index metadata (build timestamps, counts).
    fn set_meta(&mut self, key: &str, value: &str) -> Result<()>;

    /// Get index metadata.
    fn meta(&self, key: &str) -> Result<Option<String>>;
}
