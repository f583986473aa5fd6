//! Embedding service (spec §4.7).
//!
//! Owns the warm (index-time) and search (query-time) providers plus an
//! in-memory keyed cache of `text hash -> vector`, and drives every call
//! through the retry loop in [`crate::embed::retry`].

use super::retry::{with_retry, RetryOutcome};
use super::{normalize_vector, EmbeddingProvider, Purpose};
use crate::cache::embedding::EmbeddingCache;
use crate::error::CoreError;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

pub struct EmbeddingService {
    warm: Arc<dyn EmbeddingProvider>,
    search: Arc<dyn EmbeddingProvider>,
    cache: EmbeddingCache,
}

impl EmbeddingService {
    pub fn new(
        warm: Arc<dyn EmbeddingProvider>,
        search: Arc<dyn EmbeddingProvider>,
        cache_max_entries: usize,
        cache_max_bytes: Option<usize>,
    ) -> Self {
        let model_tag = format!("{}/{}", warm.config().model, search.config().model);
        Self {
            warm,
            search,
            cache: EmbeddingCache::new(cache_max_entries, cache_max_bytes, model_tag),
        }
    }

    fn provider_for(&self, purpose: Purpose) -> &Arc<dyn EmbeddingProvider> {
        match purpose {
            Purpose::Warm => &self.warm,
            Purpose::Search => &self.search,
        }
    }

    /// Model name configured for the search-side provider, used to check
    /// index compatibility before running a query.
    pub fn search_model(&self) -> &str {
        &self.search.config().model
    }

    /// Identifier of the warm (index-time) provider, used to check index
    /// compatibility before running a build.
    pub fn warm_provider_name(&self) -> &str {
        self.warm.provider_name()
    }

    /// Identifier of the search-side provider, used to check index
    /// compatibility before running a query.
    pub fn search_provider_name(&self) -> &str {
        self.search.provider_name()
    }

    /// Embed `texts`, serving cache hits directly and retrying cache misses
    /// through the provider selected by `purpose`. Cancellable via `token`.
    pub async fn embed(
        &self,
        token: &CancellationToken,
        purpose: Purpose,
        texts: &[String],
    ) -> Result<Vec<Vec<f32>>, CoreError> {
        let provider = self.provider_for(purpose).clone();
        let mut out = Vec::with_capacity(texts.len());

        for text in texts {
            if let Some(cached) = self.cache.get(text) {
                out.push(cached);
                continue;
            }

            let provider = provider.clone();
            let text_owned = text.clone();
            let outcome = with_retry(token, move || {
                let provider = provider.clone();
                let text = text_owned.clone();
                async move { provider.embed(&text).await }
            })
            .await;

            match outcome {
                RetryOutcome::Completed(Ok(mut vector)) => {
                    // Cosine similarity downstream assumes unit-length
                    // vectors; normalize here once so cached entries are
                    // already normalized on every future hit.
                    normalize_vector(&mut vector);
                    self.cache.set(text, vector.clone());
                    out.push(vector);
                }
                RetryOutcome::Completed(Err(e)) => return Err(e),
                RetryOutcome::Cancelled => {
                    return Err(CoreError::invalid_input("embedding cancelled"))
                }
            }
        }

        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embed::ProviderConfig;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicU32, Ordering};

    struct CountingProvider {
        config: ProviderConfig,
        calls: Arc<AtomicU32>,
    }

    #[async_trait]
    impl EmbeddingProvider for CountingProvider {
        async fn embed(&self, text: &str) -> Result<Vec<f32>, CoreError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(vec![text.len() as f32])
        }

        fn config(&self) -> &ProviderConfig {
            &self.config
        }
    }

    fn provider(calls: Arc<AtomicU32>) -> Arc<dyn EmbeddingProvider> {
        Arc::new(CountingProvider {
            config: ProviderConfig {
                endpoint: "local".into(),
                model: "m".into(),
                api_key: None,
            },
            calls,
        })
    }

    #[tokio::test]
    async fn repeated_text_is_served_from_cache_after_first_call() {
        let calls = Arc::new(AtomicU32::new(0));
        let service = EmbeddingService::new(provider(calls.clone()), provider(calls.clone()), 10, None);
        let token = CancellationToken::new();
        let texts = vec!["hello".to_string(), "hello".to_string()];
        let result = service.embed(&token, Purpose::Warm, &texts).await.unwrap();
        assert_eq!(result.len(), 2);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    struct FixedVectorProvider {
        config: ProviderConfig,
        vector: Vec<f32>,
    }

    #[async_trait]
    impl EmbeddingProvider for FixedVectorProvider {
        async fn embed(&self, _text: &str) -> Result<Vec<f32>, CoreError> {
            Ok(self.vector.clone())
        }

        fn config(&self) -> &ProviderConfig {
            &self.config
        }
    }

    #[tokio::test]
    async fn embed_returns_unit_length_vectors() {
        let provider: Arc<dyn EmbeddingProvider> = Arc::new(FixedVectorProvider {
            config: ProviderConfig {
                endpoint: "local".into(),
                model: "m".into(),
                api_key: None,
            },
            vector: vec![3.0, 4.0],
        });
        let service = EmbeddingService::new(provider.clone(), provider, 10, None);
        let token = CancellationToken::new();
        let result = service
            .embed(&token, Purpose::Warm, &["anything".to_string()])
            .await
            .unwrap();
        let len_sq: f32 = result[0].iter().map(|x| x * x).sum();
        assert!((len_sq - 1.0).abs() < 1e-4);
    }

    #[tokio::test]
    async fn warm_and_search_purposes_route_to_distinct_providers() {
        let warm_calls = Arc::new(AtomicU32::new(0));
        let search_calls = Arc::new(AtomicU32::new(0));
        let service = EmbeddingService::new(
            provider(warm_calls.clone()),
            provider(search_calls.clone()),
            10,
            None,
        );
        let token = CancellationToken::new();
        service
            .embed(&token, Purpose::Warm, &["a".to_string()])
            .await
            .unwrap();
        service
            .embed(&token, Purpose::Search, &["b".to_string()])
            .await
            .unwrap();
        assert_eq!(warm_calls.load(Ordering::SeqCst), 1);
        assert_eq!(search_calls.load(Ordering::SeqCst), 1);
    }
}
