//! KB Core Library
//!
//! Domain model, ranking and configuration for the knowledge retrieval pipeline.

pub mod config;
pub mod error;
pub mod knowledge;
pub mod seed;
pub mod similarity;

pub use config::KbConfig;
pub use error::{KbError, KbResult};
pub use knowledge::model::{Category, DocumentSummary, KnowledgeDocument, ScoredResult};
pub use knowledge::DocumentBackend;
