//! Signed feature-hashing embeddings
//!
//! A deterministic, training-free embedding method: every word token is
//! hashed into one of `dimension` buckets (FNV-1a), with the top hash bit
//! choosing the sign so that bucket collisions cancel in expectation. The
//! resulting vector is term-frequency weighted and L2-normalized.
//!
//! Key properties:
//! - No neural network required
//! - Deterministic (same input → same output, across processes and runs)
//! - Unicode-based tokenization (multilingual support)
//! - Similarity comes from shared vocabulary, not meaning
//!
//! The `Embedder` trait is the seam where a model-backed provider would go.

use lazy_static::lazy_static;
use regex::Regex;

use crate::error::Result;

/// Default embedding dimension (matching common transformer dims).
pub const DEFAULT_DIMENSION: usize = 384;

lazy_static! {
    static ref TOKEN_RE: Regex = Regex::new(r"[\p{Alphabetic}\p{N}]+").unwrap();
}

/// A text embedding provider.
pub trait Embedder: Send + Sync {
    /// Generate an embedding of `dimension()` floats for the given text.
    fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Dimensionality of embeddings produced by this provider.
    fn dimension(&self) -> usize;

    /// Provider name for status output.
    fn name(&self) -> &str;
}

/// Feature-hashing embedder.
#[derive(Debug, Clone)]
pub struct HashEmbedder {
    dimension: usize,
}

impl HashEmbedder {
    /// `dimension` must be at least 1 (`Config::load` enforces this for
    /// user-supplied values).
    pub fn new(dimension: usize) -> Self {
        Self { dimension }
    }
}

impl Default for HashEmbedder {
    fn default() -> Self {
        Self::new(DEFAULT_DIMENSION)
    }
}

impl Embedder for HashEmbedder {
    /// Algorithm:
    /// 1. Tokenize text into lowercased unicode words
    /// 2. Hash each token into a bucket, signed by the top hash bit
    /// 3. Accumulate occurrences (term-frequency weighting)
    /// 4. L2 normalize result
    ///
    /// Text with no tokens embeds to the zero vector.
    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let mut embedding = vec![0.0f32; self.dimension];

        for token in tokenize(text) {
            let hash = fnv1a(token.as_bytes());
            let bucket = (hash % self.dimension as u64) as usize;
            let sign = if hash >> 63 == 0 { 1.0 } else { -1.0 };
            embedding[bucket] += sign;
        }

        let norm: f32 = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for val in &mut embedding {
                *val /= norm;
            }
        }

        Ok(embedding)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn name(&self) -> &str {
        "feature-hash"
    }
}

/// Split text into lowercased unicode word tokens.
fn tokenize(text: &str) -> Vec<String> {
    TOKEN_RE
        .find_iter(text)
        .map(|m| m.as_str().to_lowercase())
        .collect()
}

/// FNV-1a 64-bit hash.
fn fnv1a(bytes: &[u8]) -> u64 {
    let mut hash: u64 = 0xcbf29ce484222325;
    for &byte in bytes {
        hash ^= byte as u64;
        hash = hash.wrapping_mul(0x100000001b3);
    }
    hash
}

/// Cosine similarity between two embeddings.
///
/// Length-mismatched or zero-norm inputs score 0.0.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }

    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a > 0.0 && norm_b > 0.0 {
        dot / (norm_a * norm_b)
    } else {
        0.0
    }
}
