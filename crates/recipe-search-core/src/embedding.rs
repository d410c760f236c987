//! Embedding trait and vector utilities.
//!
//! Defines the [`Embedder`] trait that all embedding backends implement,
//! the fixed vector dimensionality shared by the embedder and the index,
//! and the cosine similarity used by in-memory search.
//!
//! The hosted OpenAI implementation lives in the `recipe-search` app crate.

use anyhow::{bail, Result};
use async_trait::async_trait;

/// Dimensionality of every embedding vector written to or queried from
/// the index. Pinned at index creation time and never changed while the
/// index exists.
pub const EMBEDDING_DIMS: usize = 1536;

/// Turns text into a fixed-length embedding vector.
///
/// Implementations perform at most one remote call per [`embed`](Embedder::embed)
/// invocation and surface remote failures unchanged.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Returns the model identifier (e.g. `"text-embedding-3-small"`).
    fn model_name(&self) -> &str;

    /// Returns the vector dimensionality this embedder produces.
    fn dims(&self) -> usize {
        EMBEDDING_DIMS
    }

    /// Embed a single text.
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;
}

/// Fail unless `vector` has exactly `expected` components.
pub fn check_dims(vector: &[f32], expected: usize) -> Result<()> {
    if vector.len() != expected {
        bail!(
            "Embedding dimension mismatch: expected {}, got {}",
            expected,
            vector.len()
        );
    }
    Ok(())
}

/// Compute cosine similarity between two embedding vectors.
///
/// Returns a value in `[-1.0, 1.0]`:
/// - `1.0` = identical direction
/// - `0.0` = orthogonal (unrelated)
/// - `-1.0` = opposite direction
///
/// Returns `0.0` for empty vectors, vectors of different lengths, or a
/// zero-magnitude input.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;

    for (x, y) in a.iter().zip(b.iter()) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    let denom = norm_a.sqrt() * norm_b.sqrt();
    if denom < f32::EPSILON {
        return 0.0;
    }

    dot / denom
}
