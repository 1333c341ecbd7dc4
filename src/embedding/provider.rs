//! Embedding provider interface.

use crate::core::errors::Result;

/// External collaborator producing fixed-length text embeddings.
///
/// Implementations must be deterministic for identical text; the matcher's
/// byte-identical-output guarantee depends on it. `embed_many` exists to
/// amortize backend latency and must preserve input order.
pub trait EmbeddingProvider {
    /// Embed a single text.
    fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Embed several texts, returning vectors in input order.
    fn embed_many(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        texts.iter().map(|text| self.embed(text)).collect()
    }
}

/// Cosine similarity between two vectors: dot(u, v) / (‖u‖ · ‖v‖).
///
/// Returns `None` for mismatched dimensions or zero-norm vectors, where the
/// similarity is undefined; callers treat `None` as "never matches" rather
/// than propagating zero or NaN.
pub fn cosine_similarity(u: &[f32], v: &[f32]) -> Option<f64> {
    if u.len() != v.len() || u.is_empty() {
        return None;
    }

    let dot: f64 = u.iter().zip(v).map(|(a, b)| f64::from(*a) * f64::from(*b)).sum();
    let norm_u: f64 = u.iter().map(|x| f64::from(*x).powi(2)).sum::<f64>().sqrt();
    let norm_v: f64 = v.iter().map(|x| f64::from(*x).powi(2)).sum::<f64>().sqrt();

    if norm_u == 0.0 || norm_v == 0.0 {
        return None;
    }

    Some(dot / (norm_u * norm_v))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn cosine_identical_vectors() {
        let v = vec![0.5, 0.5, 0.5];
        assert_relative_eq!(cosine_similarity(&v, &v).unwrap(), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn cosine_orthogonal_vectors() {
        let u = vec![1.0, 0.0];
        let v = vec![0.0, 1.0];
        assert_relative_eq!(cosine_similarity(&u, &v).unwrap(), 0.0, epsilon = 1e-9);
    }

    #[test]
    fn cosine_opposite_vectors() {
        let u = vec![1.0, 0.0];
        let v = vec![-1.0, 0.0];
        assert_relative_eq!(cosine_similarity(&u, &v).unwrap(), -1.0, epsilon = 1e-9);
    }

    #[test]
    fn cosine_undefined_cases() {
        assert!(cosine_similarity(&[1.0, 0.0], &[0.0, 0.0]).is_none());
        assert!(cosine_similarity(&[0.0], &[0.0]).is_none());
        assert!(cosine_similarity(&[1.0], &[1.0, 0.0]).is_none());
        assert!(cosine_similarity(&[], &[]).is_none());
    }
}
