//! Application state.

use kb_embedding::KnowledgeBase;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub kb: KnowledgeBase,
}

impl AppState {
    pub fn new(kb: KnowledgeBase) -> Self {
        Self { kb }
    }
}
