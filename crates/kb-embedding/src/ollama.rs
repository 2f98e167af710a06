//! Ollama HTTP client for embedding generation.
//!
//! Uses the Ollama API at /api/embeddings.

use std::time::Duration;

use async_trait::async_trait;
use kb_core::config::{DEFAULT_DIMENSIONS, DEFAULT_OLLAMA_MODEL};
use kb_core::{KbError, KbResult};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::provider::EmbeddingProvider;

/// Ollama embedding client.
#[derive(Clone)]
pub struct OllamaEmbedder {
    base_url: String,
    model: String,
    dimensions: Option<usize>,
    client: reqwest::Client,
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    prompt: &'a str,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    embedding: Vec<f32>,
}

impl OllamaEmbedder {
    /// Create a new Ollama client with specified URL and model.
    pub fn new(base_url: &str, model: &str, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_default();

        // nomic-embed-text is 768-d; other models report whatever they return
        let dimensions = (model == DEFAULT_OLLAMA_MODEL).then_some(DEFAULT_DIMENSIONS);

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            dimensions,
            client,
        }
    }
}

#[async_trait]
impl EmbeddingProvider for OllamaEmbedder {
    async fn embed(&self, text: &str) -> KbResult<Vec<f32>> {
        let request = EmbeddingRequest {
            model: &self.model,
            prompt: text,
        };

        let response = self
            .client
            .post(format!("{}/api/embeddings", self.base_url))
            .json(&request)
            .send()
            .await
            .map_err(|e| KbError::provider("ollama", format!("Failed to connect to Ollama: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(KbError::provider("ollama", format!("Ollama API error ({}): {}", status, body)));
        }

        let result: EmbeddingResponse = response
            .json()
            .await
            .map_err(|e| KbError::provider("ollama", format!("Failed to parse Ollama response: {}", e)))?;

        debug!(dim = result.embedding.len(), "Generated embedding");

        Ok(result.embedding)
    }

    fn dimensions(&self) -> Option<usize> {
        self.dimensions
    }

    fn name(&self) -> &str {
        "ollama"
    }
}
