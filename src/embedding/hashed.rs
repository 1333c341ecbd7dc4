//! Deterministic hashed embeddings for offline runs and tests.
//!
//! A linear-congruential generator seeded from the text bytes produces a
//! normalized pseudo-embedding. The vectors carry no semantic signal, but
//! they are stable across runs and platforms, which is all the determinism
//! tests and offline smoke runs need.

use crate::core::errors::Result;
use crate::embedding::provider::EmbeddingProvider;

/// Deterministic pseudo-embedding provider.
#[derive(Debug, Clone)]
pub struct HashedEmbedder {
    dimension: usize,
}

impl Default for HashedEmbedder {
    fn default() -> Self {
        Self { dimension: 256 }
    }
}

impl HashedEmbedder {
    /// Create an embedder producing vectors of the given dimension.
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension: dimension.max(1),
        }
    }

    /// Output vector dimension.
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    fn generate(&self, text: &str) -> Vec<f32> {
        let mut state = 0u64;
        for &byte in text.as_bytes() {
            state = state.wrapping_mul(1_103_515_245).wrapping_add(u64::from(byte));
        }

        let mut embedding = vec![0.0f32; self.dimension];
        for value in &mut embedding {
            state = state.wrapping_mul(1_103_515_245).wrapping_add(12_345);
            let normalized = (state as f64 / u64::MAX as f64) * 2.0 - 1.0;
            *value = normalized as f32;
        }

        let norm: f32 = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for value in &mut embedding {
                *value /= norm;
            }
        }

        embedding
    }
}

impl EmbeddingProvider for HashedEmbedder {
    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        Ok(self.generate(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::provider::cosine_similarity;

    #[test]
    fn identical_text_embeds_identically() {
        let embedder = HashedEmbedder::default();
        let a = embedder.embed("quantum fourier transform").unwrap();
        let b = embedder.embed("quantum fourier transform").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn different_text_embeds_differently() {
        let embedder = HashedEmbedder::default();
        let a = embedder.embed("grover search").unwrap();
        let b = embedder.embed("phase estimation").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn embeddings_are_unit_norm() {
        let embedder = HashedEmbedder::new(64);
        let v = embedder.embed("some summary text").unwrap();
        assert_eq!(v.len(), 64);
        let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5);
    }

    #[test]
    fn self_similarity_is_one() {
        let embedder = HashedEmbedder::default();
        let v = embedder.embed("amplitude amplification").unwrap();
        let sim = cosine_similarity(&v, &v).unwrap();
        assert!((sim - 1.0).abs() < 1e-6);
    }

    #[test]
    fn embed_many_preserves_order() {
        let embedder = HashedEmbedder::default();
        let texts = vec!["one".to_string(), "two".to_string(), "three".to_string()];
        let batch = embedder.embed_many(&texts).unwrap();
        assert_eq!(batch.len(), 3);
        for (text, vector) in texts.iter().zip(&batch) {
            assert_eq!(&embedder.embed(text).unwrap(), vector);
        }
    }
}
