//! SQLite-backed document store
//!
//! Stores embeddings as BLOBs next to the document rows and leaves similarity
//! math to the index. Can be upgraded to sqlite-vec for native vector
//! operations later.

use std::path::Path;

use rusqlite::{params, Connection, OptionalExtension};

use crate::error::{Result, SearchError};

use super::{DocId, Document, DocumentStore};

pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open or create a database at path.
    pub fn open(db_path: &Path) -> Result<Self> {
        let conn = Connection::open(db_path)?;
        let store = Self { conn };
        store.init_schema()?;
        Ok(store)
    }

    /// Open an in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> Result<()> {
        self.conn.execute_batch(
            r#"
            -- Documents, append-only
            CREATE TABLE IF NOT EXISTS documents (
                id INTEGER PRIMARY KEY,
                text TEXT NOT NULL,
                source TEXT,
                added_at INTEGER NOT NULL
            );

            -- Embeddings (stored as BLOB for now, can migrate to sqlite-vec later)
            CREATE TABLE IF NOT EXISTS embeddings (
                doc_id INTEGER PRIMARY KEY,
                embedding BLOB NOT NULL,
                FOREIGN KEY (doc_id) REFERENCES documents(id) ON DELETE CASCADE
            );

            -- Index metadata
            CREATE TABLE IF NOT EXISTS index_meta (
                key TEXT PRIMARY KEY,
                value TEXT
            );

            -- Indexes
            CREATE INDEX IF NOT EXISTS idx_documents_added ON documents(added_at);
            CREATE INDEX IF NOT EXISTS idx_documents_source ON documents(source);
            "#,
        )?;

        Ok(())
    }

    /// Store statistics for status reporting.
    pub fn get_stats(&self) -> Result<StoreStats> {
        let document_count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM documents", [], |row| row.get(0))?;

        let embedding_count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM embeddings", [], |row| row.get(0))?;

        let last_built = self
            .meta("last_built")?
            .and_then(|v| v.parse::<i64>().ok());

        Ok(StoreStats {
            document_count: document_count as usize,
            embedding_count: embedding_count as usize,
            last_built,
        })
    }
}

impl DocumentStore for SqliteStore {
    fn add_document(&mut self, text: &str, source: Option<&str>, embedding: &[f32]) -> Result<Document> {
        let added_at = chrono::Utc::now().timestamp();

        self.conn.execute(
            "INSERT INTO documents (text, source, added_at) VALUES (?1, ?2, ?3)",
            params![text, source, added_at],
        )?;
        let id = self.conn.last_insert_rowid();

        self.conn.execute(
            "INSERT INTO embeddings (doc_id, embedding) VALUES (?1, ?2)",
            params![id, embedding_to_blob(embedding)],
        )?;

        Ok(Document {
            id,
            text: text.to_string(),
            source: source.map(String::from),
            added_at,
        })
    }

    fn document(&self, id: DocId) -> Result<Option<Document>> {
        let result = self
            .conn
            .query_row(
                "SELECT id, text, source, added_at FROM documents WHERE id = ?1",
                params![id],
                |row| {
                    Ok(Document {
                        id: row.get(0)?,
                        text: row.get(1)?,
                        source: row.get(2)?,
                        added_at: row.get(3)?,
                    })
                },
            )
            .optional()?;

        Ok(result)
    }

    fn documents(&self) -> Result<Vec<Document>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, text, source, added_at FROM documents ORDER BY id")?;

        let rows = stmt.query_map([], |row| {
            Ok(Document {
                id: row.get(0)?,
                text: row.get(1)?,
                source: row.get(2)?,
                added_at: row.get(3)?,
            })
        })?;

        let mut result = Vec::new();
        for row in rows {
            result.push(row?);
        }
        Ok(result)
    }

    fn all_documents(&self) -> Result<Vec<(Document, Vec<f32>)>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT d.id, d.text, d.source, d.added_at, e.embedding
            FROM documents d
            JOIN embeddings e ON d.id = e.doc_id
            ORDER BY d.id
            "#,
        )?;

        let rows = stmt.query_map([], |row| {
            let blob: Vec<u8> = row.get(4)?;
            Ok((
                Document {
                    id: row.get(0)?,
                    text: row.get(1)?,
                    source: row.get(2)?,
                    added_at: row.get(3)?,
                },
                blob,
            ))
        })?;

        let mut result = Vec::new();
        for row in rows {
            let (doc, blob) = row?;
            result.push((doc, blob_to_embedding(&blob)));
        }
        Ok(result)
    }

    fn update_embedding(&mut self, id: DocId, embedding: &[f32]) -> Result<()> {
        if self.document(id)?.is_none() {
            return Err(SearchError::DocumentNotFound(id));
        }

        self.conn.execute(
            r#"
            INSERT INTO embeddings (doc_id, embedding)
            VALUES (?1, ?2)
            ON CONFLICT(doc_id) DO UPDATE SET embedding = excluded.embedding
            "#,
            params![id, embedding_to_blob(embedding)],
        )?;

        Ok(())
    }

    fn count(&self) -> Result<usize> {
        let n: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM documents", [], |row| row.get(0))?;
        Ok(n as usize)
    }

    fn set_meta(&mut self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT INTO index_meta (key, value) VALUES (?1, ?2) ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, value],
        )?;
        Ok(())
    }

    fn meta(&self, key: &str) -> Result<Option<String>> {
        let result = self
            .conn
            .query_row(
                "SELECT value FROM index_meta WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(result)
    }
}

/// Store statistics.
#[derive(Debug)]
pub struct StoreStats {
    pub document_count: usize,
    pub embedding_count: usize,
    pub last_built: Option<i64>,
}

/// Convert f32 embedding to BLOB.
fn embedding_to_blob(embedding: &[f32]) -> Vec<u8> {
    let mut blob = Vec::with_capacity(embedding.len() * 4);
    for &val in embedding {
        blob.extend_from_slice(&val.to_le_bytes());
    }
    blob
}

/// Convert BLOB to f32 embedding.
fn blob_to_embedding(blob: &[u8]) -> Vec<f32> {
    blob.chunks_exact(4)
        .map(|chunk| f32::from_le_bytes(chunk.try_into().unwrap()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blob_conversion() {
        let embedding = vec![1.0, 2.0, 3.0, -0.5];
        let blob = embedding_to_blob(&embedding);
        let recovered = blob_to_embedding(&blob);
        assert_eq!(embedding, recovered);
    }

    #[test]
    fn test_add_and_lookup() -> Result<()> {
        let mut store = SqliteStore::open_in_memory()?;

        let doc = store.add_document("The quick brown fox", Some("corpus/fox.txt"), &[0.1; 8])?;
        assert_eq!(doc.id, 1);

        let found = store.document(doc.id)?.unwrap();
        assert_eq!(found.text, "The quick brown fox");
        assert_eq!(found.source.as_deref(), Some("corpus/fox.txt"));

        let rows = store.all_documents()?;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].1.len(), 8);

        Ok(())
    }

    #[test]
    fn test_duplicate_texts_are_distinct_documents() -> Result<()> {
        let mut store = SqliteStore::open_in_memory()?;
        let a = store.add_document("same text", None, &[1.0])?;
        let b = store.add_document("same text", None, &[1.0])?;

        assert_ne!(a.id, b.id);
        assert_eq!(store.count()?, 2);

        Ok(())
    }

    #[test]
    fn test_insertion_order_preserved() -> Result<()> {
        let mut store = SqliteStore::open_in_memory()?;
        store.add_document("first document", None, &[1.0])?;
        store.add_document("second document", None, &[2.0])?;
        store.add_document("third document", None, &[3.0])?;

        let docs = store.documents()?;
        let texts: Vec<&str> = docs.iter().map(|d| d.text.as_str()).collect();
        assert_eq!(texts, vec!["first document", "second document", "third document"]);

        Ok(())
    }

    #[test]
    fn test_update_embedding() -> Result<()> {
        let mut store = SqliteStore::open_in_memory()?;
        let doc = store.add_document("hello", None, &[1.0, 0.0])?;

        store.update_embedding(doc.id, &[0.0, 1.0])?;
        let rows = store.all_documents()?;
        assert_eq!(rows[0].1, vec![0.0, 1.0]);

        assert!(matches!(
            store.update_embedding(42, &[1.0]),
            Err(SearchError::DocumentNotFound(42))
        ));

        Ok(())
    }

    #[test]
    fn test_stats_and_meta() -> Result<()> {
        let mut store = SqliteStore::open_in_memory()?;
        store.add_document("doc", None, &[0.5; 4])?;

        let stats = store.get_stats()?;
        assert_eq!(stats.document_count, 1);
        assert_eq!(stats.embedding_count, 1);
        assert!(stats.last_built.is_none());

        store.set_meta("last_built", "1700000000")?;
        let stats = store.get_stats()?;
        assert_eq!(stats.last_built, Some(1700000000));

        Ok(())
    }

    #[test]
    fn test_persists_to_file() -> Result<()> {
        let dir = tempfile::TempDir::new()?;
        let db_path = dir.path().join("search.db");

        {
            let mut store = SqliteStore::open(&db_path)?;
            store.add_document("persisted", None, &[0.25; 4])?;
        }

        let store = SqliteStore::open(&db_path)?;
        assert_eq!(store.count()?, 1);
        let rows = store.all_documents()?;
        assert_eq!(rows[0].0.text, "persisted");
        assert_eq!(rows[0].1, vec![0.25; 4]);

        Ok(())
    }
}
