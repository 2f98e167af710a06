//! In-memory document backend.
//!
//! Suitable for tests and throwaway runs; contents vanish with the process.

use async_trait::async_trait;
use kb_core::{DocumentBackend, KbResult, KnowledgeDocument};
use tokio::sync::RwLock;

/// Documents held in insertion order behind a `tokio::sync::RwLock`.
#[derive(Debug, Default)]
pub struct InMemoryBackend {
    documents: RwLock<Vec<KnowledgeDocument>>,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from pre-built documents, bypassing embedding.
    pub fn with_documents(documents: Vec<KnowledgeDocument>) -> Self {
        Self {
            documents: RwLock::new(documents),
        }
    }

    pub async fn len(&self) -> usize {
        self.documents.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.documents.read().await.is_empty()
    }
}

#[async_trait]
impl DocumentBackend for InMemoryBackend {
    async fn insert(&self, doc: &KnowledgeDocument) -> KbResult<()> {
        self.documents.write().await.push(doc.clone());
        Ok(())
    }

    async fn list_all(&self) -> KbResult<Vec<KnowledgeDocument>> {
        Ok(self.documents.read().await.clone())
    }

    fn name(&self) -> &str {
        "memory"
    }
}
