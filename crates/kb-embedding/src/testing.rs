//! Test doubles for embedding providers.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use kb_core::{KbError, KbResult};

use crate::provider::EmbeddingProvider;

/// Returns preset vectors per exact text; unknown text is a provider error.
pub struct FixedEmbedder {
    vectors: HashMap<String, Vec<f32>>,
    dimensions: Option<usize>,
}

impl FixedEmbedder {
    pub fn new<'a>(pairs: impl IntoIterator<Item = (&'a str, Vec<f32>)>) -> Self {
        Self {
            vectors: pairs.into_iter().map(|(k, v)| (k.to_string(), v)).collect(),
            dimensions: None,
        }
    }

    pub fn with_dimensions(mut self, dimensions: usize) -> Self {
        self.dimensions = Some(dimensions);
        self
    }
}

#[async_trait]
impl EmbeddingProvider for FixedEmbedder {
    async fn embed(&self, text: &str) -> KbResult<Vec<f32>> {
        self.vectors
            .get(text)
            .cloned()
            .ok_or_else(|| KbError::provider("fixed", format!("no vector for '{}'", text)))
    }

    fn dimensions(&self) -> Option<usize> {
        self.dimensions
    }

    fn name(&self) -> &str {
        "fixed"
    }
}

/// Always unreachable.
pub struct FailingEmbedder;

#[async_trait]
impl EmbeddingProvider for FailingEmbedder {
    async fn embed(&self, _text: &str) -> KbResult<Vec<f32>> {
        Err(KbError::provider("failing", "provider unreachable"))
    }

    fn dimensions(&self) -> Option<usize> {
        None
    }

    fn name(&self) -> &str {
        "failing"
    }
}

/// Counts calls made to the wrapped provider.
pub struct CountingEmbedder<P> {
    inner: P,
    calls: AtomicUsize,
}

impl<P> CountingEmbedder<P> {
    pub fn new(inner: P) -> Self {
        Self {
            inner,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl<P: EmbeddingProvider> EmbeddingProvider for CountingEmbedder<P> {
    async fn embed(&self, text: &str) -> KbResult<Vec<f32>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.embed(text).await
    }

    fn dimensions(&self) -> Option<usize> {
        self.inner.dimensions()
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}
