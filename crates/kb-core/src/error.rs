//! Centralized error types for the knowledge base.

use thiserror::Error;

/// Main error type for knowledge base operations.
#[derive(Error, Debug)]
pub enum KbError {
    #[error("Embedding provider error ({provider}): {message}")]
    Provider { provider: String, message: String },

    #[error("Embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Storage error ({backend}): {message}")]
    Store { backend: String, message: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for knowledge base operations.
pub type KbResult<T> = Result<T, KbError>;

impl KbError {
    /// Create a provider error.
    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Create a storage error.
    pub fn store(backend: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Store {
            backend: backend.into(),
            message: message.into(),
        }
    }

    /// Create a validation error.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Whether the error came from the embedding provider.
    pub fn is_provider(&self) -> bool {
        matches!(self, Self::Provider { .. })
    }
}
