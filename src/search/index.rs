//! Flat nearest-neighbor index
//!
//! Exhaustive cosine scan over all entries. This is O(n) per query but fine
//! for < 10,000 documents; the place an ANN structure (HNSW, sqlite-vec)
//! would slot in later.

use crate::error::{Result, SearchError};
use crate::store::DocId;

use super::embedding::cosine_similarity;

/// In-memory index over (document id, embedding) entries.
#[derive(Debug)]
pub struct FlatIndex {
    dimension: usize,
    entries: Vec<(DocId, Vec<f32>)>,
}

impl FlatIndex {
    /// Build an index, validating every entry against `dimension`.
    pub fn build(dimension: usize, entries: Vec<(DocId, Vec<f32>)>) -> Result<Self> {
        for (_, embedding) in &entries {
            if embedding.len() != dimension {
                return Err(SearchError::DimensionMismatch {
                    expected: dimension,
                    got: embedding.len(),
                });
            }
        }

        Ok(Self { dimension, entries })
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Top-k entries by cosine similarity to the query, best first.
    ///
    /// Ties keep insertion order. `top_k = 0` or an empty index yield an
    /// empty result, never an error.
    pub fn search(&self, query: &[f32], top_k: usize) -> Result<Vec<(DocId, f32)>> {
        if query.len() != self.dimension {
            return Err(SearchError::DimensionMismatch {
                expected: self.dimension,
                got: query.len(),
            });
        }

        let mut scored: Vec<(DocId, f32)> = self
            .entries
            .iter()
            .map(|(id, embedding)| (*id, cosine_similarity(query, embedding)))
            .collect();

        // Stable sort keeps insertion order on equal scores
        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(top_k);

        Ok(scored)
    }
}
