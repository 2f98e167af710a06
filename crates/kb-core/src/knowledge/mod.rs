//! Knowledge entries and the storage seam they are persisted through.

pub mod model;

use async_trait::async_trait;

use crate::error::KbResult;
use model::KnowledgeDocument;

/// Persistence backend for the knowledge collection.
///
/// Backends only support whole-collection reads; there is no update,
/// delete or filtered query path.
#[async_trait]
pub trait DocumentBackend: Send + Sync {
    /// Persist one document. Either the whole record is written or nothing is.
    async fn insert(&self, doc: &KnowledgeDocument) -> KbResult<()>;

    /// Return every stored document.
    async fn list_all(&self) -> KbResult<Vec<KnowledgeDocument>>;

    /// Short backend name used in logs and errors.
    fn name(&self) -> &str;
}
