//! Knowledge base domain models.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{KbError, KbResult};

/// Tag attached to a knowledge entry. Stored but never used for ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    BrandVoice,
    TechnicalSeo,
    ContentQuality,
    Strategy,
    #[default]
    General,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Self::BrandVoice,
        Self::TechnicalSeo,
        Self::ContentQuality,
        Self::Strategy,
        Self::General,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BrandVoice => "brand_voice",
            Self::TechnicalSeo => "technical_seo",
            Self::ContentQuality => "content_quality",
            Self::Strategy => "strategy",
            Self::General => "general",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = KbError;

    fn from_str(s: &str) -> KbResult<Self> {
        match s.trim() {
            "brand_voice" => Ok(Self::BrandVoice),
            "technical_seo" => Ok(Self::TechnicalSeo),
            "content_quality" => Ok(Self::ContentQuality),
            "strategy" => Ok(Self::Strategy),
            "general" => Ok(Self::General),
            other => Err(KbError::validation(format!(
                "Invalid category: '{}'. Use: brand_voice, technical_seo, content_quality, strategy, general",
                other
            ))),
        }
    }
}

/// A stored knowledge entry with its embedding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeDocument {
    pub id: String,
    pub content: String,
    pub category: Category,
    pub embedding: Vec<f32>,
    pub created_at: DateTime<Utc>,
}

impl KnowledgeDocument {
    /// Build a new document stamped with a fresh id and the current time.
    pub fn new(content: impl Into<String>, category: Category, embedding: Vec<f32>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            content: content.into(),
            category,
            embedding,
            created_at: Utc::now(),
        }
    }

    /// Whether this document can take part in ranking.
    pub fn has_embedding(&self) -> bool {
        !self.embedding.is_empty()
    }

    pub fn dimensions(&self) -> usize {
        self.embedding.len()
    }
}

/// One ranked retrieval hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredResult {
    pub content: String,
    pub score: f32,
}

/// A document without its vector, for listings and API responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentSummary {
    pub id: String,
    pub content: String,
    pub category: Category,
    pub dimensions: usize,
    pub created_at: DateTime<Utc>,
}

impl From<&KnowledgeDocument> for DocumentSummary {
    fn from(doc: &KnowledgeDocument) -> Self {
        Self {
            id: doc.id.clone(),
            content: doc.content.clone(),
            category: doc.category,
            dimensions: doc.dimensions(),
            created_at: doc.created_at,
        }
    }
}
