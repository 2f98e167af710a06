//! Document store: embeds new knowledge and persists it through a backend.

use std::sync::Arc;

use kb_core::{Category, DocumentBackend, KbError, KbResult, KnowledgeDocument};
use tracing::info;

use crate::provider::EmbeddingProvider;

/// Adds knowledge entries and reads the whole collection back.
#[derive(Clone)]
pub struct DocumentStore {
    embedder: Arc<dyn EmbeddingProvider>,
    backend: Arc<dyn DocumentBackend>,
}

impl DocumentStore {
    pub fn new(embedder: Arc<dyn EmbeddingProvider>, backend: Arc<dyn DocumentBackend>) -> Self {
        Self { embedder, backend }
    }

    /// Embed `content` and persist it.
    ///
    /// Exactly one embedding call is made. Nothing is written if embedding
    /// fails, returns an empty vector, or disagrees with the provider's
    /// declared dimensionality.
    pub async fn add(&self, content: &str, category: Category) -> KbResult<KnowledgeDocument> {
        if content.trim().is_empty() {
            return Err(KbError::validation("Knowledge content must not be empty"));
        }

        let embedding = self.embedder.embed(content).await?;
        if embedding.is_empty() {
            return Err(KbError::provider(
                self.embedder.name(),
                "provider returned an empty embedding",
            ));
        }
        if let Some(expected) = self.embedder.dimensions() {
            if embedding.len() != expected {
                return Err(KbError::DimensionMismatch {
                    expected,
                    actual: embedding.len(),
                });
            }
        }

        let doc = KnowledgeDocument::new(content, category, embedding);
        self.backend.insert(&doc).await?;

        info!(
            id = %doc.id,
            category = %doc.category,
            dim = doc.dimensions(),
            backend = self.backend.name(),
            "Knowledge added"
        );

        Ok(doc)
    }

    /// Every stored document, unfiltered.
    pub async fn list_all(&self) -> KbResult<Vec<KnowledgeDocument>> {
        self.backend.list_all().await
    }
}
