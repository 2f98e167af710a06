//! Vertex AI embedding client.
//!
//! Calls the publisher model `:predict` REST endpoint, e.g.
//! `text-embedding-004`, and reads `predictions[0].embeddings.values`.
//!
//! Requests carry either a fixed bearer token or headers minted from
//! Application Default Credentials, which refresh themselves on expiry.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use google_cloud_auth::credentials::{Builder as CredentialsBuilder, CacheableResource, Credentials};
use kb_core::config::{DEFAULT_DIMENSIONS, DEFAULT_VERTEX_MODEL};
use kb_core::{KbError, KbResult};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde::{Deserialize, Serialize};
use tokio::sync::OnceCell;
use tracing::{debug, info};

use crate::provider::EmbeddingProvider;

/// Task type tuned for retrieval corpora.
pub const RETRIEVAL_DOCUMENT: &str = "RETRIEVAL_DOCUMENT";

/// OAuth scope requested for Application Default Credentials.
pub const CLOUD_PLATFORM_SCOPE: &str = "https://www.googleapis.com/auth/cloud-platform";

/// How requests are authorized.
#[derive(Clone)]
enum VertexAuth {
    /// Fixed bearer token from configuration.
    Token(String),
    /// Application Default Credentials, resolved on first use.
    Adc(Arc<OnceCell<Credentials>>),
}

/// Vertex AI embedding client.
#[derive(Clone)]
pub struct VertexEmbedder {
    endpoint: String,
    auth: VertexAuth,
    dimensions: Option<usize>,
    client: reqwest::Client,
}

#[derive(Serialize)]
struct PredictRequest<'a> {
    instances: [Instance<'a>; 1],
    parameters: serde_json::Value,
}

#[derive(Serialize)]
struct Instance<'a> {
    content: &'a str,
    task_type: &'a str,
}

#[derive(Deserialize)]
struct PredictResponse {
    #[serde(default)]
    predictions: Vec<Prediction>,
}

#[derive(Deserialize)]
struct Prediction {
    embeddings: Embeddings,
}

#[derive(Deserialize)]
struct Embeddings {
    values: Vec<f32>,
}

/// Build the `:predict` URL for a Google publisher model.
pub fn predict_endpoint(project: &str, location: &str, model: &str) -> String {
    format!(
        "https://{location}-aiplatform.googleapis.com/v1/projects/{project}/locations/{location}/publishers/google/models/{model}:predict"
    )
}

/// Extract the first embedding from a `:predict` response body.
pub fn parse_predict_response(body: &str) -> KbResult<Vec<f32>> {
    let response: PredictResponse = serde_json::from_str(body)
        .map_err(|e| KbError::provider("vertex", format!("Failed to parse Vertex AI response: {}", e)))?;

    let prediction = response
        .predictions
        .into_iter()
        .next()
        .ok_or_else(|| KbError::provider("vertex", "No prediction returned for embedding"))?;

    if prediction.embeddings.values.is_empty() {
        return Err(KbError::provider("vertex", "Prediction contained an empty embedding"));
    }

    Ok(prediction.embeddings.values)
}

impl VertexEmbedder {
    /// Create a client for `model` in `project`/`location`.
    ///
    /// `access_token` is sent as a bearer token. Without it the client loads
    /// Application Default Credentials on the first request.
    pub fn new(
        project: &str,
        location: &str,
        model: &str,
        access_token: Option<String>,
        timeout: Duration,
    ) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_default();

        let dimensions = (model == DEFAULT_VERTEX_MODEL).then_some(DEFAULT_DIMENSIONS);

        let auth = match access_token.filter(|t| !t.trim().is_empty()) {
            Some(token) => VertexAuth::Token(token),
            None => VertexAuth::Adc(Arc::new(OnceCell::new())),
        };

        Self {
            endpoint: predict_endpoint(project, location, model),
            auth,
            dimensions,
            client,
        }
    }

    /// Authorization headers for the next request.
    async fn auth_headers(&self) -> KbResult<HeaderMap> {
        match &self.auth {
            VertexAuth::Token(token) => {
                let value = HeaderValue::from_str(&format!("Bearer {}", token))
                    .map_err(|e| KbError::config(format!("Invalid Vertex AI access token: {}", e)))?;
                let mut headers = HeaderMap::new();
                headers.insert(AUTHORIZATION, value);
                Ok(headers)
            }
            VertexAuth::Adc(cell) => {
                let credentials = cell
                    .get_or_try_init(|| async {
                        let credentials = CredentialsBuilder::default()
                            .with_scopes([CLOUD_PLATFORM_SCOPE])
                            .build()
                            .map_err(|e| {
                                KbError::provider("vertex", format!("Failed to load Application Default Credentials: {}", e))
                            })?;
                        info!("Loaded Application Default Credentials for Vertex AI");
                        Ok::<_, KbError>(credentials)
                    })
                    .await?;

                match credentials.headers(http::Extensions::new()).await {
                    Ok(CacheableResource::New { data, .. }) => Ok(data),
                    Ok(CacheableResource::NotModified) => Err(KbError::provider(
                        "vertex",
                        "Credentials returned no authorization headers",
                    )),
                    Err(e) => Err(KbError::provider(
                        "vertex",
                        format!("Failed to obtain access token: {}", e),
                    )),
                }
            }
        }
    }
}

#[async_trait]
impl EmbeddingProvider for VertexEmbedder {
    async fn embed(&self, text: &str) -> KbResult<Vec<f32>> {
        let request = PredictRequest {
            instances: [Instance {
                content: text,
                task_type: RETRIEVAL_DOCUMENT,
            }],
            parameters: serde_json::json!({}),
        };

        let headers = self.auth_headers().await?;

        let response = self
            .client
            .post(&self.endpoint)
            .headers(headers)
            .json(&request)
            .send()
            .await
            .map_err(|e| KbError::provider("vertex", format!("Failed to connect to Vertex AI: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| KbError::provider("vertex", format!("Failed to read Vertex AI response: {}", e)))?;

        if !status.is_success() {
            return Err(KbError::provider("vertex", format!("Vertex AI API error ({}): {}", status, body)));
        }

        let embedding = parse_predict_response(&body)?;
        debug!(dim = embedding.len(), "Generated embedding");
        Ok(embedding)
    }

    fn dimensions(&self) -> Option<usize> {
        self.dimensions
    }

    fn name(&self) -> &str {
        "vertex"
    }
}
