//! In-memory document store
//!
//! Backs unit tests and throwaway engines. Matches SQLite id assignment
//! (sequential from 1) so the two backends are interchangeable.

use std::collections::HashMap;

use crate::error::{Result, SearchError};

use super::{DocId, Document, DocumentStore};

#[derive(Debug, Default)]
pub struct MemoryStore {
    rows: Vec<(Document, Vec<f32>)>,
    meta: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DocumentStore for MemoryStore {
    fn add_document(&mut self, text: &str, source: Option<&str>, embedding: &[f32]) -> Result<Document> {
        let doc = Document {
            id: self.rows.len() as DocId + 1,
            text: text.to_string(),
            source: source.map(String::from),
            added_at: chrono::Utc::now().timestamp(),
        };
        self.rows.push((doc.clone(), embedding.to_vec()));
        Ok(doc)
    }

    fn document(&self, id: DocId) -> Result<Option<Document>> {
        Ok(self.rows.iter().find(|(d, _)| d.id == id).map(|(d, _)| d.clone()))
    }

    fn documents(&self) -> Result<Vec<Document>> {
        Ok(self.rows.iter().map(|(d, _)| d.clone()).collect())
    }

    fn all_documents(&self) -> Result<Vec<(Document, Vec<f32>)>> {
        Ok(self.rows.clone())
    }

    fn update_embedding(&mut self, id: DocId, embedding: &[f32]) -> Result<()> {
        match self.rows.iter_mut().find(|(d, _)| d.id == id) {
            Some((_, stored)) => {
                *stored = embedding.to_vec();
                Ok(())
            }
            None => Err(SearchError::DocumentNotFound(id)),
        }
    }

    fn count(&self) -> Result<usize> {
        Ok(self.rows.len())
    }

    fn set_meta(&mut self, key: &str, value: &str) -> Result<()> {
        self.meta.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn meta(&self, key: &str) -> Result<Option<String>> {
        Ok(self.meta.get(key).cloned())
    }
}
