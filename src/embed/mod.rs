//! Embedding provider abstraction (spec §4.7, C9).
//!
//! Trait-based, matching the teacher's preference for a narrow trait at the
//! provider seam (`src/index.rs::VectorIndex`) generalized here to
//! `EmbeddingProvider`. Two concrete providers talk to a local Ollama server
//! and a remote HuggingFace-style inference endpoint over plain HTTP/JSON,
//! built on `reqwest` (promoted from the teacher's optional llm-summaries
//! dependency to a required one, since this abstraction is core).

pub mod providers;
pub mod retry;
pub mod service;

use crate::error::CoreError;
use async_trait::async_trait;

/// What an embedding is being computed for — lets providers route to their
/// index-time vs. query-time model when the two differ.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Purpose {
    Warm,
    Search,
}

#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub endpoint: String,
    pub model: String,
    pub api_key: Option<String>,
}

/// Uniform contract over an external embedding model service.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Embed a single text, returning a dense vector of the provider's model dimension.
    async fn embed(&self, text: &str) -> Result<Vec<f32>, CoreError>;

    /// Embed a batch of texts in one round trip where the provider supports it.
    /// Default implementation falls back to sequential single embeds.
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, CoreError> {
        let mut out = Vec::with_capacity(texts.len());
        for text in texts {
            out.push(self.embed(text).await?);
        }
        Ok(out)
    }

    fn config(&self) -> &ProviderConfig;

    /// The model dimension, when known without a round trip.
    fn dimension(&self) -> Option<usize> {
        None
    }

    /// Short identifier for this provider (`"ollama"`, `"huggingface"`),
    /// used for index/search compatibility checks. Empty string is a
    /// wildcard that never disqualifies a match.
    fn provider_name(&self) -> &str {
        ""
    }
}

/// Rescale `vector` to unit L2 length in place. A no-op (up to float error)
/// on an already-normalized vector, and on an all-zero vector.
pub fn normalize_vector(vector: &mut [f32]) {
    let norm: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for x in vector.iter_mut() {
            *x /= norm;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedProvider {
        config: ProviderConfig,
        dim: usize,
    }

    #[async_trait]
    impl EmbeddingProvider for FixedProvider {
        async fn embed(&self, text: &str) -> Result<Vec<f32>, CoreError> {
            if text.is_empty() {
                return Err(CoreError::invalid_input("empty text"));
            }
            Ok(vec![1.0; self.dim])
        }

        fn config(&self) -> &ProviderConfig {
            &self.config
        }

        fn dimension(&self) -> Option<usize> {
            Some(self.dim)
        }
    }

    #[tokio::test]
    async fn embed_batch_default_impl_calls_embed_sequentially() {
        let provider = FixedProvider {
            config: ProviderConfig {
                endpoint: "local".into(),
                model: "m".into(),
                api_key: None,
            },
            dim: 4,
        };
        let result = provider
            .embed_batch(&["a".to_string(), "b".to_string()])
            .await
            .unwrap();
        assert_eq!(result.len(), 2);
        assert_eq!(result[0].len(), 4);
    }

    #[test]
    fn normalize_vector_yields_unit_length() {
        let mut v = vec![3.0, 4.0];
        normalize_vector(&mut v);
        let len_sq: f32 = v.iter().map(|x| x * x).sum();
        assert!((len_sq - 1.0).abs() < 1e-6);
    }

    #[test]
    fn normalize_vector_is_idempotent() {
        let mut v = vec![1.0, 2.0, 3.0];
        normalize_vector(&mut v);
        let once = v.clone();
        normalize_vector(&mut v);
        for (a, b) in once.iter().zip(v.iter()) {
            assert!((a - b).abs() < 1e-6);
        }
    }

    #[test]
    fn normalize_vector_leaves_zero_vector_untouched() {
        let mut v = vec![0.0, 0.0, 0.0];
        normalize_vector(&mut v);
        assert_eq!(v, vec![0.0, 0.0, 0.0]);
    }

    #[tokio::test]
    async fn embed_batch_surfaces_first_error() {
        let provider = FixedProvider {
            config: ProviderConfig {
                endpoint: "local".into(),
                model: "m".into(),
                api_key: None,
            },
            dim: 4,
        };
        let result = provider.embed_batch(&["".to_string()]).await;
        assert!(result.is_err());
    }
}
