//! Remote HuggingFace-style inference endpoint provider (spec §4.7).
//!
//! Feature-extraction endpoints accept `{inputs: [String]}` and return a
//! nested array of per-token or pooled vectors; this provider requests the
//! pooled form and requires a bearer API key, unlike the local Ollama server.

use crate::embed::{EmbeddingProvider, ProviderConfig};
use crate::error::CoreError;
use async_trait::async_trait;
use serde::Serialize;

#[derive(Serialize)]
struct EmbedRequest<'a> {
    inputs: Vec<&'a str>,
}

pub struct HuggingFaceProvider {
    config: ProviderConfig,
    client: reqwest::Client,
}

impl HuggingFaceProvider {
    pub fn new(endpoint: impl Into<String>, model: impl Into<String>, api_key: String) -> Self {
        Self {
            config: ProviderConfig {
                endpoint: endpoint.into(),
                model: model.into(),
                api_key: Some(api_key),
            },
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl EmbeddingProvider for HuggingFaceProvider {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, CoreError> {
        if text.is_empty() {
            return Err(CoreError::invalid_input("empty text"));
        }
        let Some(api_key) = &self.config.api_key else {
            return Err(CoreError::AuthFailure("missing API key".into()));
        };

        let url = format!(
            "{}/pipeline/feature-extraction/{}",
            self.config.endpoint.trim_end_matches('/'),
            self.config.model
        );
        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&EmbedRequest { inputs: vec![text] })
            .send()
            .await
            .map_err(classify_reqwest_error)?;

        if !response.status().is_success() {
            return Err(classify_status(response.status()));
        }

        let body: Vec<Vec<f32>> = response
            .json()
            .await
            .map_err(|e| CoreError::Other(e.into()))?;
        body.into_iter()
            .next()
            .ok_or_else(|| CoreError::Other(anyhow::anyhow!("empty embedding response")))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, CoreError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        let Some(api_key) = &self.config.api_key else {
            return Err(CoreError::AuthFailure("missing API key".into()));
        };
        let url = format!(
            "{}/pipeline/feature-extraction/{}",
            self.config.endpoint.trim_end_matches('/'),
            self.config.model
        );
        let inputs: Vec<&str> = texts.iter().map(String::as_str).collect();
        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&EmbedRequest { inputs })
            .send()
            .await
            .map_err(classify_reqwest_error)?;

        if !response.status().is_success() {
            return Err(classify_status(response.status()));
        }

        response.json().await.map_err(|e| CoreError::Other(e.into()))
    }

    fn config(&self) -> &ProviderConfig {
        &self.config
    }

    fn provider_name(&self) -> &str {
        "huggingface"
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
