//! Bootstrap a knowledge base with the built-in rules.

use kb_core::seed::DEFAULT_RULES;
use kb_core::{KbResult, KnowledgeDocument};
use tracing::info;

use crate::store::DocumentStore;

/// Add every default rule in order. Stops at the first failure; rules added
/// before it stay stored.
pub async fn seed_default_rules(store: &DocumentStore) -> KbResult<Vec<KnowledgeDocument>> {
    info!(count = DEFAULT_RULES.len(), "Seeding knowledge base");

    let mut added = Vec::with_capacity(DEFAULT_RULES.len());
    for rule in DEFAULT_RULES {
        added.push(store.add(rule.content, rule.category).await?);
    }

    info!(count = added.len(), "Knowledge base seeded");
    Ok(added)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryBackend;
    use crate::stub::StubEmbedder;
    use crate::testing::FailingEmbedder;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_seeds_all_rules() {
        let store = DocumentStore::new(Arc::new(StubEmbedder::new(32, 42)), Arc::new(InMemoryBackend::new()));

        let added = seed_default_rules(&store).await.unwrap();

        assert_eq!(added.len(), DEFAULT_RULES.len());
        let stored = store.list_all().await.unwrap();
        assert_eq!(stored.len(), DEFAULT_RULES.len());
        for (doc, rule) in stored.iter().zip(DEFAULT_RULES) {
            assert_eq!(doc.content, rule.content);
            assert_eq!(doc.category, rule.category);
        }
    }

    #[tokio::test]
    async fn test_seed_stops_on_provider_failure() {
        let backend = Arc::new(InMemoryBackend::new());
        let store = DocumentStore::new(Arc::new(FailingEmbedder), backend.clone());

        assert!(seed_default_rules(&store).await.is_err());
        assert!(backend.is_empty().await);
    }
}
