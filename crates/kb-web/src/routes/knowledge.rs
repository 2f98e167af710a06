//! Knowledge route handlers.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use kb_core::{Category, DocumentSummary, KbError, ScoredResult};
use serde::Deserialize;

use crate::state::AppState;

#[derive(Deserialize)]
pub struct AddKnowledgeRequest {
    pub content: String,
    pub category: Option<String>,
}

#[derive(Deserialize)]
pub struct SearchParams {
    pub q: String,
    pub limit: Option<usize>,
}

fn error_response(err: KbError) -> (StatusCode, String) {
    let status = match &err {
        KbError::Validation(_) => StatusCode::BAD_REQUEST,
        KbError::Provider { .. } | KbError::DimensionMismatch { .. } => StatusCode::BAD_GATEWAY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, err.to_string())
}

pub async fn add_knowledge(
    State(state): State<AppState>,
    Json(req): Json<AddKnowledgeRequest>,
) -> Result<(StatusCode, Json<DocumentSummary>), (StatusCode, String)> {
    let category = match req.category.as_deref() {
        Some(c) => c.parse::<Category>().map_err(error_response)?,
        None => Category::default(),
    };

    let doc = state.kb.add(&req.content, category).await.map_err(error_response)?;

    Ok((StatusCode::CREATED, Json(DocumentSummary::from(&doc))))
}

pub async fn list_knowledge(
    State(state): State<AppState>,
) -> Result<Json<Vec<DocumentSummary>>, (StatusCode, String)> {
    let docs = state.kb.list_all().await.map_err(error_response)?;
    Ok(Json(docs.iter().map(DocumentSummary::from).collect()))
}

/// Always answers 200; a failed retrieval is an empty list.
pub async fn search_knowledge(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Json<Vec<ScoredResult>> {
    let limit = params.limit.unwrap_or_else(|| state.kb.default_limit());
    Json(state.kb.find_similar(&params.q, limit).await)
}
