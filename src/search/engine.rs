//! Search engine - combines document store, embedder, and flat index

use std::time::Instant;

use crate::error::{Result, SearchError};
use crate::store::{DocId, Document, DocumentStore};

use super::embedding::{Embedder, HashEmbedder};
use super::index::FlatIndex;

/// Search result with document metadata and similarity score
#[derive(Debug, Clone)]
pub struct SearchHit {
    pub id: DocId,
    pub text: String,
    pub source: Option<String>,
    pub score: f32,
}

impl From<(Document, f32)> for SearchHit {
    fn from((doc, score): (Document, f32)) -> Self {
        Self {
            id: doc.id,
            text: doc.text,
            source: doc.source,
            score,
        }
    }
}

/// Re-embedding statistics
#[derive(Debug)]
pub struct IndexingStats {
    pub reembedded: usize,
    pub failed: usize,
    pub duration_ms: u128,
}

/// Search engine over a document store.
///
/// The index is built explicitly with `build_index`; documents added after a
/// build stay invisible to `search`/`retrieve` until the next build.
pub struct SearchEngine<S: DocumentStore> {
    store: S,
    embedder: Box<dyn Embedder>,
    index: Option<FlatIndex>,
}

impl<S: DocumentStore> SearchEngine<S> {
    /// Create an engine with the default feature-hash embedder.
    pub fn new(store: S) -> Self {
        Self::with_embedder(store, Box::new(HashEmbedder::default()))
    }

    pub fn with_embedder(store: S, embedder: Box<dyn Embedder>) -> Self {
        Self {
            store,
            embedder,
            index: None,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn embedder(&self) -> &dyn Embedder {
        self.embedder.as_ref()
    }

    /// The current index, `None` until `build_index` has run.
    pub fn index(&self) -> Option<&FlatIndex> {
        self.index.as_ref()
    }

    /// Embed and append one document, returning the stored record.
    pub fn add_document(&mut self, text: &str) -> Result<Document> {
        self.add_document_with_source(text, None)
    }

    pub fn add_document_with_source(&mut self, text: &str, source: Option<&str>) -> Result<Document> {
        let embedding = self.embedder.embed(text)?;
        self.store.add_document(text, source, &embedding)
    }

    /// Build the in-memory index from all stored embeddings.
    ///
    /// Fails with `DimensionMismatch` if a stored embedding does not match
    /// the embedder's dimension (`reindex_all` recovers from that). Returns
    /// the number of indexed vectors.
    pub fn build_index(&mut self) -> Result<usize> {
        let entries: Vec<(DocId, Vec<f32>)> = self
            .store
            .all_documents()?
            .into_iter()
            .map(|(doc, embedding)| (doc.id, embedding))
            .collect();

        let index = FlatIndex::build(self.embedder.dimension(), entries)?;
        let count = index.len();
        self.index = Some(index);

        self.store.set_meta("indexed_count", &count.to_string())?;
        self.store
            .set_meta("last_built", &chrono::Utc::now().timestamp().to_string())?;

        Ok(count)
    }

    /// Top-k documents by cosine similarity to the query, best first.
    pub fn search(&self, query: &str, top_k: usize) -> Result<Vec<SearchHit>> {
        let index = self.index.as_ref().ok_or(SearchError::IndexNotBuilt)?;

        let query_embedding = self.embedder.embed(query)?;
        let scored = index.search(&query_embedding, top_k)?;

        let mut hits = Vec::with_capacity(scored.len());
        for (id, score) in scored {
            let doc = self
                .store
                .document(id)?
                .ok_or(SearchError::DocumentNotFound(id))?;
            hits.push(SearchHit::from((doc, score)));
        }

        Ok(hits)
    }

    /// Texts of the top-k matches.
    pub fn retrieve(&self, query: &str, top_k: usize) -> Result<Vec<String>> {
        Ok(self
            .search(query, top_k)?
            .into_iter()
            .map(|hit| hit.text)
            .collect())
    }

    /// Re-embed every stored document with the current embedder, then
    /// rebuild the index.
    pub fn reindex_all(&mut self) -> Result<IndexingStats> {
        let start = Instant::now();

        let mut reembedded = 0;
        let mut failed = 0;

        for doc in self.store.documents()? {
            match self.embedder.embed(&doc.text) {
                Ok(embedding) => {
                    self.store.update_embedding(doc.id, &embedding)?;
                    reembedded += 1;
                }
                Err(e) => {
                    eprintln!("Failed to embed document {}: {}", doc.id, e);
                    failed += 1;
                }
            }
        }

        self.build_index()?;

        Ok(IndexingStats {
            reembedded,
            failed,
            duration_ms: start.elapsed().as_millis(),
        })
    }
}

/// Keyword search without embeddings (for fallback or comparison).
///
/// Scores each document by the fraction of query terms its text contains.
pub fn keyword_search<S: DocumentStore>(store: &S, query: &str, limit: usize) -> Result<Vec<SearchHit>> {
    let query_lower = query.to_lowercase();
    let query_terms: Vec<&str> = query_lower.split_whitespace().collect();
    if query_terms.is_empty() {
        return Ok(Vec::new());
    }

    let mut hits: Vec<SearchHit> = store
        .documents()?
        .into_iter()
        .filter_map(|doc| {
            let text_lower = doc.text.to_lowercase();
            let matched = query_terms
                .iter()
                .filter(|term| text_lower.contains(*term))
                .count();

            if matched == 0 {
                return None;
            }

            let score = matched as f32 / query_terms.len() as f32;
            Some(SearchHit::from((doc, score)))
        })
        .collect();

    hits.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    hits.truncate(limit);

    Ok(hits)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryStore, SqliteStore};

    #[test]
    fn test_add_document() {
        let mut engine = SearchEngine::new(MemoryStore::new());
        engine.add_document("Test Document").unwrap();

        let rows = engine.store().all_documents().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].0.text, "Test Document");
        assert_eq!(rows[0].1.len(), engine.embedder().dimension());
    }

    #[test]
    fn test_build_index() {
        let mut engine = SearchEngine::new(MemoryStore::new());
        engine.add_document("Doc 1").unwrap();
        engine.add_document("Doc 2").unwrap();

        assert!(engine.index().is_none());
        let indexed = engine.build_index().unwrap();
        assert_eq!(indexed, 2);
        assert!(engine.index().is_some());
    }

    #[test]
    fn test_retrieve() {
        let mut engine = SearchEngine::new(MemoryStore::new());
        engine.add_document("NLP is great").unwrap();
        engine.add_document("Deep Learning transforms NLP").unwrap();
        engine.build_index().unwrap();

        let results = engine.retrieve("NLP", 2).unwrap();
        assert!(results.len() <= 2);
        assert!(results.iter().any(|doc| doc.contains("NLP")));
    }

    #[test]
    fn test_search_before_build_is_an_error() {
        let mut engine = SearchEngine::new(MemoryStore::new());
        engine.add_document("text").unwrap();

        assert!(matches!(
            engine.search("text", 5),
            Err(SearchError::IndexNotBuilt)
        ));
        assert!(matches!(
            engine.retrieve("text", 5),
            Err(SearchError::IndexNotBuilt)
        ));
    }

    #[test]
    fn test_build_on_empty_store() {
        let mut engine = SearchEngine::new(MemoryStore::new());

        assert_eq!(engine.build_index().unwrap(), 0);
        assert!(engine.search("anything", 5).unwrap().is_empty());
    }

    #[test]
    fn test_top_k_bounds() {
        let mut engine = SearchEngine::new(MemoryStore::new());
        engine.add_document("only document").unwrap();
        engine.build_index().unwrap();

        assert!(engine.search("document", 0).unwrap().is_empty());
        assert_eq!(engine.search("document", 10).unwrap().len(), 1);
    }

    #[test]
    fn test_search_ranks_shared_vocabulary_first() {
        let mut engine = SearchEngine::new(MemoryStore::new());
        engine
            .add_document("the rust borrow checker enforces ownership")
            .unwrap();
        engine.add_document("baking sourdough bread at home").unwrap();
        engine.build_index().unwrap();

        let hits = engine.search("rust ownership", 2).unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].text, "the rust borrow checker enforces ownership");
        assert!(hits[0].score > hits[1].score);
    }

    #[test]
    fn test_zero_vector_document_never_outranks() {
        let mut engine = SearchEngine::new(MemoryStore::new());
        engine.add_document("   ").unwrap();
        engine.add_document("semantic search engine").unwrap();
        engine.build_index().unwrap();

        let hits = engine.search("semantic search", 2).unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].text, "semantic search engine");
        assert_eq!(hits[1].score, 0.0);
    }

    #[test]
    fn test_index_is_stale_until_rebuilt() {
        let mut engine = SearchEngine::new(MemoryStore::new());
        engine.add_document("alpha document").unwrap();
        engine.build_index().unwrap();
        engine.add_document("beta document").unwrap();

        // Additions after a build are invisible until the next build
        let hits = engine.search("beta", 10).unwrap();
        assert_eq!(hits.len(), 1);

        engine.build_index().unwrap();
        let hits = engine.search("beta", 10).unwrap();
        assert_eq!(hits.len(), 2);
        assert!(hits.iter().any(|h| h.text == "beta document"));
    }

    #[test]
    fn test_build_records_metadata() {
        let mut engine = SearchEngine::new(MemoryStore::new());
        engine.add_document("one").unwrap();
        engine.build_index().unwrap();

        let store = engine.store();
        assert_eq!(store.meta("indexed_count").unwrap().as_deref(), Some("1"));
        assert!(store.meta("last_built").unwrap().is_some());
    }

    #[test]
    fn test_reindex_recovers_dimension_change() {
        let dir = tempfile::TempDir::new().unwrap();
        let db_path = dir.path().join("search.db");

        {
            let store = SqliteStore::open(&db_path).unwrap();
            let mut engine = SearchEngine::with_embedder(store, Box::new(HashEmbedder::new(16)));
            engine.add_document("stored at an old dimension").unwrap();
            engine.build_index().unwrap();
        }

        let store = SqliteStore::open(&db_path).unwrap();
        let mut engine = SearchEngine::with_embedder(store, Box::new(HashEmbedder::new(32)));

        assert!(matches!(
            engine.build_index(),
            Err(SearchError::DimensionMismatch {
                expected: 32,
                got: 16
            })
        ));

        let stats = engine.reindex_all().unwrap();
        assert_eq!(stats.reembedded, 1);
        assert_eq!(stats.failed, 0);
        assert_eq!(engine.index().map(|i| i.dimension()), Some(32));

        let results = engine.search("stored", 5).unwrap();
        assert_eq!(results.len(), 1);
    }

    #[test]
    fn test_keyword_search_scores_by_term_fraction() {
        let mut store = MemoryStore::new();
        store
            .add_document("Rust is a systems language", None, &[])
            .unwrap();
        store.add_document("rust ownership model", None, &[]).unwrap();
        store.add_document("gardening tips", None, &[]).unwrap();

        let hits = keyword_search(&store, "rust ownership", 10).unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].text, "rust ownership model");
        assert_eq!(hits[0].score, 1.0);
        assert_eq!(hits[1].score, 0.5);
    }

    #[test]
    fn test_keyword_search_empty_query() {
        let mut store = MemoryStore::new();
        store.add_document("anything", None, &[]).unwrap();

        assert!(keyword_search(&store, "   ", 10).unwrap().is_empty());
    }

    #[test]
    fn test_keyword_search_respects_limit() {
        let mut store = MemoryStore::new();
        for i in 0..5 {
            store
                .add_document(&format!("shared term doc {}", i), None, &[])
                .unwrap();
        }

        let hits = keyword_search(&store, "shared", 3).unwrap();
        assert_eq!(hits.len(), 3);
    }
}
