//! [`DocumentBackend`] implementation over Redis.

use async_trait::async_trait;
use kb_core::{DocumentBackend, KbResult, KnowledgeDocument};

use crate::client::{init_pool, RedisPool};
use crate::queries::knowledge;

/// Knowledge collection persisted in Redis.
#[derive(Clone)]
pub struct RedisBackend {
    pool: RedisPool,
    collection: String,
}

impl RedisBackend {
    /// Wrap an existing pool.
    pub fn new(pool: RedisPool, collection: impl Into<String>) -> Self {
        Self {
            pool,
            collection: collection.into(),
        }
    }

    /// Connect to Redis and bind to `collection`.
    pub async fn connect(redis_url: &str, collection: &str) -> KbResult<Self> {
        let pool = init_pool(redis_url).await?;
        Ok(Self::new(pool, collection))
    }
}

#[async_trait]
impl DocumentBackend for RedisBackend {
    async fn insert(&self, doc: &KnowledgeDocument) -> KbResult<()> {
        knowledge::insert_document(&self.pool, &self.collection, doc).await?;
        Ok(())
    }

    async fn list_all(&self) -> KbResult<Vec<KnowledgeDocument>> {
        Ok(knowledge::list_documents(&self.pool, &self.collection).await?)
    }

    fn name(&self) -> &str {
        "redis"
    }
}
