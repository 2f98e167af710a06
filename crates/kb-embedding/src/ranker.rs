//! Top-K similarity retrieval over the whole knowledge collection.
//!
//! Retrieval augments generation and must never take the caller down with
//! it: every failure collapses to an empty result list.

use std::sync::Arc;

use kb_core::similarity::{rank_documents, SCAN_WARN_THRESHOLD};
use kb_core::{KbResult, ScoredResult};
use tracing::{debug, info, warn};

use crate::provider::EmbeddingProvider;
use crate::store::DocumentStore;

/// Embeds a query and ranks every stored document against it.
#[derive(Clone)]
pub struct SimilarityRanker {
    embedder: Arc<dyn EmbeddingProvider>,
    store: DocumentStore,
}

impl SimilarityRanker {
    pub fn new(embedder: Arc<dyn EmbeddingProvider>, store: DocumentStore) -> Self {
        Self { embedder, store }
    }

    /// Return up to `limit` documents ordered by descending cosine similarity.
    ///
    /// An empty list means either nothing matched or retrieval failed; the
    /// failure is logged, never returned.
    pub async fn find_similar(&self, query: &str, limit: usize) -> Vec<ScoredResult> {
        match self.try_find_similar(query, limit).await {
            Ok(results) => results,
            Err(e) => {
                warn!(error = %e, "Knowledge search failed, returning no context");
                Vec::new()
            }
        }
    }

    async fn try_find_similar(&self, query: &str, limit: usize) -> KbResult<Vec<ScoredResult>> {
        if limit == 0 {
            return Ok(Vec::new());
        }

        debug!(query = %preview(query, 50), limit, "Searching knowledge");

        let query_vector = self.embedder.embed(query).await?;

        let documents = self.store.list_all().await?;
        if documents.is_empty() {
            return Ok(Vec::new());
        }
        if documents.len() > SCAN_WARN_THRESHOLD {
            warn!(
                count = documents.len(),
                threshold = SCAN_WARN_THRESHOLD,
                "Knowledge collection exceeds full-scan comfort zone"
            );
        }

        let results = rank_documents(&query_vector, &documents, limit);

        info!(
            found = results.len(),
            scanned = documents.len(),
            top_score = ?results.first().map(|r| r.score),
            "Knowledge search complete"
        );

        Ok(results)
    }
}

fn preview(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryBackend;
    use crate::stub::StubEmbedder;
    use crate::testing::{FailingEmbedder, FixedEmbedder};
    use async_trait::async_trait;
    use kb_core::{Category, DocumentBackend, KbError, KnowledgeDocument};

    fn ranker_with(embedder: Arc<dyn EmbeddingProvider>, backend: Arc<dyn DocumentBackend>) -> SimilarityRanker {
        let store = DocumentStore::new(embedder.clone(), backend);
        SimilarityRanker::new(embedder, store)
    }

    fn axis_embedder() -> Arc<dyn EmbeddingProvider> {
        Arc::new(FixedEmbedder::new([
            ("x-axis", vec![1.0, 0.0]),
            ("y-axis", vec![0.0, 1.0]),
            ("mostly-x", vec![0.9, 0.1]),
            ("query", vec![1.0, 0.0]),
        ]))
    }

    #[tokio::test]
    async fn test_top_two_scenario() {
        let embedder = axis_embedder();
        let store = DocumentStore::new(embedder.clone(), Arc::new(InMemoryBackend::new()));
        for content in ["x-axis", "y-axis", "mostly-x"] {
            store.add(content, Category::General).await.unwrap();
        }
        let ranker = SimilarityRanker::new(embedder, store);

        let results = ranker.find_similar("query", 2).await;

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].content, "x-axis");
        assert!((results[0].score - 1.0).abs() < 1e-6);
        assert_eq!(results[1].content, "mostly-x");
        assert!((results[1].score - 0.994).abs() < 1e-3);
    }

    #[tokio::test]
    async fn test_self_query_scores_highest() {
        let embedder: Arc<dyn EmbeddingProvider> = Arc::new(StubEmbedder::new(128, 9));
        let store = DocumentStore::new(embedder.clone(), Arc::new(InMemoryBackend::new()));
        let contents = [
            "Titles under sixty characters",
            "Formal but warm brand voice",
            "Benefits before features",
            "Short paragraphs for mobile",
        ];
        for content in contents {
            store.add(content, Category::General).await.unwrap();
        }
        let ranker = SimilarityRanker::new(embedder, store);

        for content in contents {
            let results = ranker.find_similar(content, 1).await;
            assert_eq!(results[0].content, content);
            assert!((results[0].score - 1.0).abs() < 1e-4);
        }
    }

    #[tokio::test]
    async fn test_empty_store_returns_empty() {
        let ranker = ranker_with(axis_embedder(), Arc::new(InMemoryBackend::new()));
        assert!(ranker.find_similar("query", 3).await.is_empty());
    }

    #[tokio::test]
    async fn test_provider_error_returns_empty() {
        let backend = Arc::new(InMemoryBackend::with_documents(vec![KnowledgeDocument::new(
            "stored",
            Category::General,
            vec![1.0, 0.0],
        )]));
        let ranker = ranker_with(Arc::new(FailingEmbedder), backend);

        assert!(ranker.find_similar("anything", 3).await.is_empty());
    }

    struct BrokenBackend;

    #[async_trait]
    impl DocumentBackend for BrokenBackend {
        async fn insert(&self, _doc: &KnowledgeDocument) -> KbResult<()> {
            Err(KbError::store("broken", "down"))
        }

        async fn list_all(&self) -> KbResult<Vec<KnowledgeDocument>> {
            Err(KbError::store("broken", "down"))
        }

        fn name(&self) -> &str {
            "broken"
        }
    }

    #[tokio::test]
    async fn test_store_error_returns_empty() {
        let ranker = ranker_with(axis_embedder(), Arc::new(BrokenBackend));
        assert!(ranker.find_similar("query", 3).await.is_empty());
    }

    #[tokio::test]
    async fn test_malformed_documents_are_excluded() {
        let backend = Arc::new(InMemoryBackend::with_documents(vec![
            KnowledgeDocument::new("missing", Category::General, Vec::new()),
            KnowledgeDocument::new("wrong-size", Category::General, vec![1.0, 0.0, 0.0]),
            KnowledgeDocument::new("good", Category::General, vec![0.0, 1.0]),
        ]));
        let ranker = ranker_with(axis_embedder(), backend);

        let results = ranker.find_similar("query", 10).await;

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].content, "good");
        assert_eq!(results[0].score, 0.0);
    }

    #[tokio::test]
    async fn test_limit_bounds_results() {
        let embedder: Arc<dyn EmbeddingProvider> = Arc::new(StubEmbedder::new(16, 1));
        let store = DocumentStore::new(embedder.clone(), Arc::new(InMemoryBackend::new()));
        for i in 0..5 {
            store.add(&format!("rule {i}"), Category::General).await.unwrap();
        }
        let ranker = SimilarityRanker::new(embedder, store);

        assert_eq!(ranker.find_similar("rule 1", 3).await.len(), 3);
        assert_eq!(ranker.find_similar("rule 1", 50).await.len(), 5);
        assert!(ranker.find_similar("rule 1", 0).await.is_empty());
    }

    #[test]
    fn test_preview_respects_char_boundaries() {
        assert_eq!(preview("éléphant", 3), "élé");
    }
}
