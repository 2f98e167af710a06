//! Deterministic embedding backend for tests and offline runs.
//!
//! Vectors are derived from a fixed seed and the text, so the same text
//! always maps to the same unit vector and unrelated texts land close to
//! orthogonal in high dimensions. The output carries no semantics.

use async_trait::async_trait;
use kb_core::{KbError, KbResult};

use crate::provider::EmbeddingProvider;

/// Seeded, deterministic embedding provider.
#[derive(Debug, Clone)]
pub struct StubEmbedder {
    dimensions: usize,
    seed: u64,
}

impl StubEmbedder {
    pub fn new(dimensions: usize, seed: u64) -> Self {
        Self { dimensions, seed }
    }

    /// Produce the vector for `text` without going through the trait.
    pub fn vector_for(&self, text: &str) -> Vec<f32> {
        let mut state = fnv1a(self.seed, text.as_bytes());
        let mut vector: Vec<f32> = (0..self.dimensions)
            .map(|_| {
                let bits = splitmix64(&mut state);
                // top 24 bits → [0, 1) → [-1, 1)
                ((bits >> 40) as f32 / (1u64 << 24) as f32) * 2.0 - 1.0
            })
            .collect();

        let norm: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for value in &mut vector {
                *value /= norm;
            }
        }
        vector
    }
}

fn fnv1a(seed: u64, bytes: &[u8]) -> u64 {
    let mut hash: u64 = 0xcbf2_9ce4_8422_2325 ^ seed;
    for byte in bytes {
        hash ^= u64::from(*byte);
        hash = hash.wrapping_mul(0x0100_0000_01b3);
    }
    hash
}

fn splitmix64(state: &mut u64) -> u64 {
    *state = state.wrapping_add(0x9e37_79b9_7f4a_7c15);
    let mut z = *state;
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}

#[async_trait]
impl EmbeddingProvider for StubEmbedder {
    async fn embed(&self, text: &str) -> KbResult<Vec<f32>> {
        if self.dimensions == 0 {
            return Err(KbError::provider("stub", "stub embedder configured with 0 dimensions"));
        }
        Ok(self.vector_for(text))
    }

    fn dimensions(&self) -> Option<usize> {
        Some(self.dimensions)
    }

    fn name(&self) -> &str {
        "stub"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kb_core::similarity::cosine_similarity;

    #[tokio::test]
    async fn test_same_text_same_vector() {
        let stub = StubEmbedder::new(64, 7);
        let a = stub.embed("alt attributes").await.unwrap();
        let b = stub.embed("alt attributes").await.unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
    }

    #[test]
    fn test_vectors_are_unit_length() {
        let stub = StubEmbedder::new(128, 1);
        let v = stub.vector_for("paragraph length");
        let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_seed_changes_output() {
        let a = StubEmbedder::new(32, 1).vector_for("same");
        let b = StubEmbedder::new(32, 2).vector_for("same");
        assert_ne!(a, b);
    }

    #[test]
    fn test_different_texts_are_not_identical() {
        let stub = StubEmbedder::new(256, 42);
        let a = stub.vector_for("brand voice");
        let b = stub.vector_for("image alt text");
        assert!(cosine_similarity(&a, &b) < 0.5);
    }

    #[tokio::test]
    async fn test_zero_dimensions_is_error() {
        let err = StubEmbedder::new(0, 1).embed("x").await.unwrap_err();
        assert!(err.is_provider());
    }
}
