//! Knowledge base configuration.
//!
//! Values are resolved in three layers: built-in defaults, an optional TOML
//! file, then environment variables. Backends are chosen here and nowhere
//! else; business logic only ever receives constructed clients.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{KbError, KbResult};
use crate::similarity::DEFAULT_LIMIT;

/// Default Redis URL.
pub const DEFAULT_REDIS_URL: &str = "redis://127.0.0.1:6379";

/// Default collection name.
pub const DEFAULT_COLLECTION: &str = "knowledge_base";

/// Default Vertex AI region.
pub const DEFAULT_VERTEX_LOCATION: &str = "europe-west1";

/// Default Vertex AI embedding model.
pub const DEFAULT_VERTEX_MODEL: &str = "text-embedding-004";

/// Default Ollama API URL.
pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";

/// Default Ollama embedding model.
pub const DEFAULT_OLLAMA_MODEL: &str = "nomic-embed-text";

/// Output dimensionality of both default models.
pub const DEFAULT_DIMENSIONS: usize = 768;

/// Upper bound for `embedding.retry_backoff_ms`.
pub const MAX_RETRY_BACKOFF_MS: u64 = 60_000;

/// Where knowledge documents are persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Redis,
    Memory,
}

impl FromStr for StorageBackend {
    type Err = KbError;

    fn from_str(s: &str) -> KbResult<Self> {
        match s.trim().to_lowercase().as_str() {
            "redis" => Ok(Self::Redis),
            "memory" => Ok(Self::Memory),
            other => Err(KbError::config(format!(
                "Invalid storage backend: '{}'. Use: redis, memory",
                other
            ))),
        }
    }
}

impl fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Redis => "redis",
            Self::Memory => "memory",
        })
    }
}

/// Which embedding provider produces vectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingBackend {
    Vertex,
    Ollama,
    /// Deterministic seeded vectors. Only for tests and offline runs.
    Stub,
}

impl FromStr for EmbeddingBackend {
    type Err = KbError;

    fn from_str(s: &str) -> KbResult<Self> {
        match s.trim().to_lowercase().as_str() {
            "vertex" => Ok(Self::Vertex),
            "ollama" => Ok(Self::Ollama),
            "stub" => Ok(Self::Stub),
            other => Err(KbError::config(format!(
                "Invalid embedding backend: '{}'. Use: vertex, ollama, stub",
                other
            ))),
        }
    }
}

impl fmt::Display for EmbeddingBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Vertex => "vertex",
            Self::Ollama => "ollama",
            Self::Stub => "stub",
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub redis_url: String,
    pub collection: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::Redis,
            redis_url: DEFAULT_REDIS_URL.to_string(),
            collection: DEFAULT_COLLECTION.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    pub backend: EmbeddingBackend,

    // Vertex AI
    pub project_id: Option<String>,
    pub location: String,
    pub model: String,
    #[serde(skip_serializing)]
    pub access_token: Option<String>,

    // Ollama
    pub ollama_url: String,
    pub ollama_model: String,

    // Stub
    pub stub_dimensions: usize,
    pub stub_seed: u64,

    /// Per-attempt timeout for one embedding call.
    pub timeout_secs: u64,
    pub max_retries: u32,
    pub retry_backoff_ms: u64,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            backend: EmbeddingBackend::Vertex,
            project_id: None,
            location: DEFAULT_VERTEX_LOCATION.to_string(),
            model: DEFAULT_VERTEX_MODEL.to_string(),
            access_token: None,
            ollama_url: DEFAULT_OLLAMA_URL.to_string(),
            ollama_model: DEFAULT_OLLAMA_MODEL.to_string(),
            stub_dimensions: DEFAULT_DIMENSIONS,
            stub_seed: 42,
            timeout_secs: 30,
            max_retries: 2,
            retry_backoff_ms: 250,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub default_limit: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_limit: DEFAULT_LIMIT,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3030,
        }
    }
}

/// Full knowledge base configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct KbConfig {
    pub storage: StorageConfig,
    pub embedding: EmbeddingConfig,
    pub search: SearchConfig,
    pub server: ServerConfig,
}

impl KbConfig {
    /// Parse a TOML document. Missing keys keep their defaults.
    pub fn from_toml_str(content: &str) -> KbResult<Self> {
        toml::from_str(content).map_err(|e| KbError::config(format!("Invalid config file: {}", e)))
    }

    /// Read a TOML config file.
    pub fn from_file(path: &Path) -> KbResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Resolve the configuration: file (if given), then process environment,
    /// then validation.
    pub fn load(path: Option<&Path>) -> KbResult<Self> {
        let mut config = match path {
            Some(p) => {
                debug!(path = %p.display(), "Loading config file");
                Self::from_file(p)?
            }
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Apply environment overrides through `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F) -> KbResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("KB_REDIS_URL").or_else(|| lookup("REDIS_URL")) {
            self.storage.redis_url = url;
        }
        if let Some(backend) = lookup("KB_STORAGE_BACKEND") {
            self.storage.backend = backend.parse()?;
        }
        if let Some(collection) = lookup("KB_COLLECTION") {
            self.storage.collection = collection;
        }
        if let Some(backend) = lookup("KB_EMBEDDING_BACKEND") {
            self.embedding.backend = backend.parse()?;
        }
        if let Some(project) = lookup("GCP_PROJECT_ID") {
            self.embedding.project_id = Some(project);
        }
        if let Some(location) = lookup("VERTEX_AI_LOCATION") {
            self.embedding.location = location;
        }
        if let Some(model) = lookup("VERTEX_AI_EMBEDDING_MODEL") {
            self.embedding.model = model;
        }
        if let Some(token) = lookup("GOOGLE_ACCESS_TOKEN") {
            self.embedding.access_token = Some(token);
        }
        if let Some(url) = lookup("OLLAMA_URL") {
            self.embedding.ollama_url = url;
        }
        if let Some(model) = lookup("OLLAMA_EMBED_MODEL") {
            self.embedding.ollama_model = model;
        }
        Ok(())
    }

    /// Check cross-field constraints.
    pub fn validate(&self) -> KbResult<()> {
        if self.search.default_limit == 0 {
            return Err(KbError::config("search.default_limit must be greater than 0"));
        }
        if self.embedding.timeout_secs == 0 {
            return Err(KbError::config("embedding.timeout_secs must be greater than 0"));
        }
        if self.embedding.retry_backoff_ms > MAX_RETRY_BACKOFF_MS {
            return Err(KbError::config(format!(
                "embedding.retry_backoff_ms must be at most {}",
                MAX_RETRY_BACKOFF_MS
            )));
        }
        if self.storage.collection.trim().is_empty() {
            return Err(KbError::config("storage.collection must not be empty"));
        }
        match self.embedding.backend {
            EmbeddingBackend::Vertex => {
                let has_project = self
                    .embedding
                    .project_id
                    .as_deref()
                    .is_some_and(|p| !p.trim().is_empty());
                if !has_project {
                    return Err(KbError::config(
                        "Vertex embedding backend requires embedding.project_id (or GCP_PROJECT_ID)",
                    ));
                }
            }
            EmbeddingBackend::Stub if self.embedding.stub_dimensions == 0 => {
                return Err(KbError::config("embedding.stub_dimensions must be greater than 0"));
            }
            _ => {}
        }
        Ok(())
    }
}
