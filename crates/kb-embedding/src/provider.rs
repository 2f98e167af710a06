//! Embedding provider seam.

use std::sync::Arc;

use async_trait::async_trait;
use kb_core::KbResult;

/// Turns text into a fixed-length vector for similarity comparison.
///
/// Providers are constructed once and injected into the store and ranker;
/// nothing downstream inspects the environment to pick one.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Generate an embedding vector for the given text.
    async fn embed(&self, text: &str) -> KbResult<Vec<f32>>;

    /// Output dimensionality, when the provider knows it up front.
    fn dimensions(&self) -> Option<usize>;

    /// Short provider name used in logs and errors.
    fn name(&self) -> &str;
}

#[async_trait]
impl<P: EmbeddingProvider + ?Sized> EmbeddingProvider for Arc<P> {
    async fn embed(&self, text: &str) -> KbResult<Vec<f32>> {
        (**self).embed(text).await
    }

    fn dimensions(&self) -> Option<usize> {
        (**self).dimensions()
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
