//! Timeout and bounded retry around an embedding provider.

use std::time::Duration;

use async_trait::async_trait;
use kb_core::config::EmbeddingConfig;
use kb_core::{KbError, KbResult};
use tracing::warn;

use crate::provider::EmbeddingProvider;

/// Limits applied to every embedding call.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Budget for a single attempt.
    pub timeout: Duration,
    /// Extra attempts after the first failure.
    pub max_retries: u32,
    /// Linear backoff step: attempt `n` waits `n * backoff`.
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            max_retries: 2,
            backoff: Duration::from_millis(250),
        }
    }
}

impl RetryPolicy {
    /// Wait before retry number `attempt`, saturating instead of overflowing.
    pub fn backoff_for(&self, attempt: u32) -> Duration {
        self.backoff.saturating_mul(attempt)
    }
}

impl From<&EmbeddingConfig> for RetryPolicy {
    fn from(config: &EmbeddingConfig) -> Self {
        Self {
            timeout: Duration::from_secs(config.timeout_secs),
            max_retries: config.max_retries,
            backoff: Duration::from_millis(config.retry_backoff_ms),
        }
    }
}

/// Wraps a provider with a per-attempt timeout and retries on provider errors.
///
/// Non-provider errors (validation, dimension mismatch) are returned as is.
pub struct ResilientEmbedder<P> {
    inner: P,
    policy: RetryPolicy,
}

impl<P: EmbeddingProvider> ResilientEmbedder<P> {
    pub fn new(inner: P, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }
}

#[async_trait]
impl<P: EmbeddingProvider> EmbeddingProvider for ResilientEmbedder<P> {
    async fn embed(&self, text: &str) -> KbResult<Vec<f32>> {
        let attempts = self.policy.max_retries.saturating_add(1);
        let mut last_err = None;

        for attempt in 1..=attempts {
            let err = match tokio::time::timeout(self.policy.timeout, self.inner.embed(text)).await {
                Ok(Ok(vector)) => return Ok(vector),
                Ok(Err(e)) if !e.is_provider() => return Err(e),
                Ok(Err(e)) => e,
                Err(_) => KbError::provider(
                    self.inner.name(),
                    format!("embedding timed out after {:?}", self.policy.timeout),
                ),
            };

            warn!(
                provider = self.inner.name(),
                attempt,
                attempts,
                error = %err,
                "Embedding attempt failed"
            );
            last_err = Some(err);

            if attempt < attempts {
                tokio::time::sleep(self.policy.backoff_for(attempt)).await;
            }
        }

        Err(last_err.unwrap_or_else(|| KbError::provider(self.inner.name(), "no embedding attempt was made")))
    }

    fn dimensions(&self) -> Option<usize> {
        self.inner.dimensions()
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}
