//! # KB Embedding
//!
//! Embedding providers, the knowledge document store, and brute-force
//! cosine similarity retrieval over it.

pub mod memory;
pub mod ollama;
pub mod pipeline;
pub mod provider;
pub mod ranker;
pub mod resilient;
pub mod seed;
pub mod store;
pub mod stub;
pub mod vertex;

#[cfg(test)]
pub(crate) mod testing;

pub use memory::InMemoryBackend;
pub use ollama::OllamaEmbedder;
pub use pipeline::{build_backend, build_provider, KnowledgeBase};
pub use provider::EmbeddingProvider;
pub use ranker::SimilarityRanker;
pub use resilient::{ResilientEmbedder, RetryPolicy};
pub use seed::seed_default_rules;
pub use store::DocumentStore;
pub use stub::StubEmbedder;
pub use vertex::VertexEmbedder;
