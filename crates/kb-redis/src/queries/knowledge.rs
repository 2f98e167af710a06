//! Knowledge document queries against Redis.
//!
//! Layout per collection:
//! - `kb:{collection}:doc:{id}` hash, field `data` holds the document JSON
//! - `kb:{collection}:docs` sorted set of ids scored by creation time (ms)

use chrono::{DateTime, Utc};
use kb_core::{Category, KnowledgeDocument};
use redis::AsyncCommands;
use serde_json::Value;
use tracing::{debug, warn};

use crate::client::{RedisPool, RedisResult};

fn doc_key(collection: &str, id: &str) -> String {
    format!("kb:{}:doc:{}", collection, id)
}

fn index_key(collection: &str) -> String {
    format!("kb:{}:docs", collection)
}

/// Store a document and index it in one MULTI/EXEC transaction.
pub async fn insert_document(
    pool: &RedisPool,
    collection: &str,
    doc: &KnowledgeDocument,
) -> RedisResult<()> {
    let payload = serde_json::to_string(doc)?;
    let mut conn = pool.clone();

    let (): () = redis::pipe()
        .atomic()
        .hset(doc_key(collection, &doc.id), "data", payload)
        .ignore()
        .zadd(index_key(collection), &doc.id, doc.created_at.timestamp_millis())
        .ignore()
        .query_async(&mut conn)
        .await?;

    debug!(collection, id = %doc.id, "Stored knowledge document");
    Ok(())
}

/// Read every document in the collection, oldest first.
///
/// Records that cannot be decoded at all are skipped; see [`decode_document`].
pub async fn list_documents(
    pool: &RedisPool,
    collection: &str,
) -> RedisResult<Vec<KnowledgeDocument>> {
    let mut conn = pool.clone();
    let ids: Vec<String> = conn.zrange(index_key(collection), 0, -1).await?;
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    let mut pipe = redis::pipe();
    for id in &ids {
        pipe.hget(doc_key(collection, id), "data");
    }
    let rows: Vec<Option<String>> = pipe.query_async(&mut conn).await?;

    let docs = ids
        .iter()
        .zip(rows)
        .filter_map(|(id, row)| match row {
            Some(json) => decode_document(id, &json),
            None => {
                warn!(collection, id = %id, "Indexed document has no record");
                None
            }
        })
        .collect();

    Ok(docs)
}

/// Decode a stored record leniently.
///
/// A record without string content is unusable and yields `None`. A missing
/// or non-numeric embedding decodes as an empty vector so the ranker leaves
/// the document out. Unknown categories fall back to `general`.
pub fn decode_document(id: &str, json: &str) -> Option<KnowledgeDocument> {
    let value: Value = match serde_json::from_str(json) {
        Ok(v) => v,
        Err(e) => {
            warn!(id, error = %e, "Skipping unparseable knowledge record");
            return None;
        }
    };

    let Some(content) = value.get("content").and_then(Value::as_str) else {
        warn!(id, "Skipping knowledge record without content");
        return None;
    };

    let category = value
        .get("category")
        .and_then(Value::as_str)
        .and_then(|c| c.parse::<Category>().ok())
        .unwrap_or_default();

    let embedding = match value.get("embedding").and_then(Value::as_array) {
        Some(values) => {
            let parsed: Option<Vec<f32>> = values
                .iter()
                .map(|v| v.as_f64().map(|f| f as f32))
                .collect();
            parsed.unwrap_or_else(|| {
                warn!(id, "Knowledge record has a non-numeric embedding");
                Vec::new()
            })
        }
        None => {
            warn!(id, "Knowledge record has no embedding array");
            Vec::new()
        }
    };

    let created_at = value
        .get("created_at")
        .and_then(Value::as_str)
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_default();

    let id = value
        .get("id")
        .and_then(Value::as_str)
        .unwrap_or(id)
        .to_string();

    Some(KnowledgeDocument {
        id,
        content: content.to_string(),
        category,
        embedding,
        created_at,
    })
}
