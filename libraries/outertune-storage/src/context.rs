use crate::queues;
use async_trait::async_trait;
use outertune_core::{QueueId, QueueRecord, QueueRepository, Result};
use sqlx::SqlitePool;

/// Queue repository backed by `SQLite`
#[derive(Debug, Clone)]
pub struct SqliteQueueRepository {
    pool: SqlitePool,
}

impl SqliteQueueRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl QueueRepository for SqliteQueueRepository {
    async fn load_all(&self) -> Result<Vec<QueueRecord>> {
        Ok(queues::load_all(&self.pool).await?)
    }

    async fn save_queue(&self, queue: &QueueRecord) -> Result<()> {
        Ok(queues::save(&self.pool, queue).await?)
    }

    async fn update_queue(&self, queue: &QueueRecord) -> Result<()> {
        Ok(queues::update_metadata(&self.pool, queue).await?)
    }

    async fn rewrite_queue(&self, queue: &QueueRecord) -> Result<()> {
        Ok(queues::save(&self.pool, queue).await?)
    }

    async fn delete_queue(&self, id: QueueId) -> Result<()> {
        Ok(queues::delete(&self.pool, id).await?)
    }

    async fn update_all(&self, records: &[QueueRecord]) -> Result<()> {
        Ok(queues::save_all(&self.pool, records).await?)
    }
}
