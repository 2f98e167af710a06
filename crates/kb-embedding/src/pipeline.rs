//! Wiring: configuration → provider, backend, store and ranker.

use std::sync::Arc;
use std::time::Duration;

use kb_core::config::{EmbeddingBackend, EmbeddingConfig, StorageBackend, StorageConfig};
use kb_core::{Category, DocumentBackend, KbConfig, KbError, KbResult, KnowledgeDocument, ScoredResult};
use kb_redis::RedisBackend;
use tracing::info;

use crate::memory::InMemoryBackend;
use crate::ollama::OllamaEmbedder;
use crate::provider::EmbeddingProvider;
use crate::ranker::SimilarityRanker;
use crate::resilient::{ResilientEmbedder, RetryPolicy};
use crate::seed::seed_default_rules;
use crate::store::DocumentStore;
use crate::stub::StubEmbedder;
use crate::vertex::VertexEmbedder;

/// Construct the configured embedding provider.
///
/// Network providers are wrapped in [`ResilientEmbedder`]; the stub is
/// returned bare since it cannot fail transiently.
pub fn build_provider(config: &EmbeddingConfig) -> KbResult<Arc<dyn EmbeddingProvider>> {
    let policy = RetryPolicy::from(config);
    let timeout = Duration::from_secs(config.timeout_secs);

    let provider: Arc<dyn EmbeddingProvider> = match config.backend {
        EmbeddingBackend::Vertex => {
            let project = config
                .project_id
                .as_deref()
                .filter(|p| !p.trim().is_empty())
                .ok_or_else(|| KbError::config("Vertex embedding backend requires a project id"))?;
            let vertex = VertexEmbedder::new(
                project,
                &config.location,
                &config.model,
                config.access_token.clone(),
                timeout,
            );
            Arc::new(ResilientEmbedder::new(vertex, policy))
        }
        EmbeddingBackend::Ollama => {
            let ollama = OllamaEmbedder::new(&config.ollama_url, &config.ollama_model, timeout);
            Arc::new(ResilientEmbedder::new(ollama, policy))
        }
        EmbeddingBackend::Stub => Arc::new(StubEmbedder::new(config.stub_dimensions, config.stub_seed)),
    };

    info!(provider = provider.name(), dim = ?provider.dimensions(), "Embedding provider ready");
    Ok(provider)
}

/// Construct the configured storage backend, connecting to Redis if needed.
pub async fn build_backend(config: &StorageConfig) -> KbResult<Arc<dyn DocumentBackend>> {
    let backend: Arc<dyn DocumentBackend> = match config.backend {
        StorageBackend::Redis => Arc::new(RedisBackend::connect(&config.redis_url, &config.collection).await?),
        StorageBackend::Memory => Arc::new(InMemoryBackend::new()),
    };
    info!(backend = backend.name(), collection = %config.collection, "Document backend ready");
    Ok(backend)
}

/// The retrieval pipeline as callers see it: add a document, retrieve top-K.
#[derive(Clone)]
pub struct KnowledgeBase {
    store: DocumentStore,
    ranker: SimilarityRanker,
    default_limit: usize,
}

impl KnowledgeBase {
    /// Assemble from already-constructed parts.
    pub fn new(
        embedder: Arc<dyn EmbeddingProvider>,
        backend: Arc<dyn DocumentBackend>,
        default_limit: usize,
    ) -> Self {
        let store = DocumentStore::new(embedder.clone(), backend);
        let ranker = SimilarityRanker::new(embedder, store.clone());
        Self {
            store,
            ranker,
            default_limit,
        }
    }

    /// Build every component from configuration.
    pub async fn from_config(config: &KbConfig) -> KbResult<Self> {
        let embedder = build_provider(&config.embedding)?;
        let backend = build_backend(&config.storage).await?;
        Ok(Self::new(embedder, backend, config.search.default_limit))
    }

    pub async fn add(&self, content: &str, category: Category) -> KbResult<KnowledgeDocument> {
        self.store.add(content, category).await
    }

    pub async fn list_all(&self) -> KbResult<Vec<KnowledgeDocument>> {
        self.store.list_all().await
    }

    pub async fn find_similar(&self, query: &str, limit: usize) -> Vec<ScoredResult> {
        self.ranker.find_similar(query, limit).await
    }

    /// [`find_similar`](Self::find_similar) with the configured default limit.
    pub async fn find_similar_with_default(&self, query: &str) -> Vec<ScoredResult> {
        self.ranker.find_similar(query, self.default_limit).await
    }

    pub async fn seed_defaults(&self) -> KbResult<Vec<KnowledgeDocument>> {
        seed_default_rules(&self.store).await
    }

    pub fn default_limit(&self) -> usize {
        self.default_limit
    }
}
