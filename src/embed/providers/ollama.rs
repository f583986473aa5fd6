//! Local Ollama embedding provider (spec §4.7).
//!
//! Ollama's `/api/embeddings` endpoint takes `{model, prompt}` and returns
//! `{embedding: [f32; N]}` — the simplest of the two provider shapes, no
//! auth header required for a local server.

use crate::embed::{EmbeddingProvider, ProviderConfig};
use crate::error::CoreError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[derive(Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    prompt: &'a str,
}

#[derive(Deserialize)]
struct EmbedResponse {
    embedding: Vec<f32>,
}

pub struct OllamaProvider {
    config: ProviderConfig,
    client: reqwest::Client,
}

impl OllamaProvider {
    pub fn new(endpoint: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            config: ProviderConfig {
                endpoint: endpoint.into(),
                model: model.into(),
                api_key: None,
            },
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl EmbeddingProvider for OllamaProvider {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, CoreError> {
        if text.is_empty() {
            return Err(CoreError::invalid_input("empty text"));
        }
        let url = format!("{}/api/embeddings", self.config.endpoint.trim_end_matches('/'));
        let response = self
            .client
            .post(&url)
            .json(&EmbedRequest {
                model: &self.config.model,
                prompt: text,
            })
            .send()
            .await
            .map_err(classify_reqwest_error)?;

        if !response.status().is_success() {
            return Err(classify_status(response.status()));
        }

        let body: EmbedResponse = response
            .json()
            .await
            .map_err(|e| CoreError::Other(e.into()))?;
        Ok(body.embedding)
    }

    fn config(&self) -> &ProviderConfig {
        &self.config
    }

    fn provider_name(&self) -> &str {
        "ollama"
    }
}

fn classify_reqwest_error(err: reqwest::Error) -> CoreError {
    if err.is_timeout() || err.is_connect() {
        CoreError::ProviderUnavailable(err.to_string())
    } else {
        CoreError::Other(err.into())
    }
}

fn classify_status(status: reqwest::StatusCode) -> CoreError {
    match status.as_u16() {
        401 | 403 => CoreError::AuthFailure(format!("status {status}")),
        404 => CoreError::InvalidModel(format!("status {status}")),
        429 | 500..=599 => CoreError::ProviderUnavailable(format!("status {status}")),
        _ => CoreError::Other(anyhow::anyhow!("unexpected status {status}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn empty_text_is_rejected_before_any_network_call() {
        let provider = OllamaProvider::new("http://localhost:11434", "nomic-embed-text");
        let result = provider.embed("").await;
        assert!(matches!(result, Err(CoreError::InvalidInput(_))));
    }

    #[test]
    fn classify_status_maps_429_to_retryable() {
        let err = classify_status(reqwest::StatusCode::TOO_MANY_REQUESTS);
        assert!(err.is_retryable());
    }

    #[test]
    fn classify_status_maps_401_to_non_retryable_auth_failure() {
        let err = classify_status(reqwest::StatusCode::UNAUTHORIZED);
        assert!(!err.is_retryable());
        assert!(matches!(err, CoreError::AuthFailure(_)));
    }
}
