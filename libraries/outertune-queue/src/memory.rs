//! In-memory queue repository
//!
//! Keeps records in a map behind an async lock. Used when persistence should
//! survive a board rebuild but not the process, and as the repository in
//! tests.

use async_trait::async_trait;
use outertune_core::{CoreError, QueueId, QueueRecord, QueueRepository, Result};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Mutex;

/// `QueueRepository` backed by a `BTreeMap`
#[derive(Debug, Default)]
pub struct MemoryRepository {
    queues: Mutex<BTreeMap<QueueId, QueueRecord>>,
    fail_writes: AtomicBool,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the repository with existing records
    pub fn with_records(records: impl IntoIterator<Item = QueueRecord>) -> Self {
        let queues = records.into_iter().map(|r| (r.id, r)).collect();
        Self {
            queues: Mutex::new(queues),
            fail_writes: AtomicBool::new(false),
        }
    }

    /// Make every write return an error (for exercising failure paths)
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn check_writable(&self) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            Err(CoreError::storage("writes disabled"))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl QueueRepository for MemoryRepository {
    async fn load_all(&self) -> Result<Vec<QueueRecord>> {
        let queues = self.queues.lock().await;
        let mut records: Vec<QueueRecord> = queues.values().cloned().collect();
        records.sort_by_key(|r| r.index);
        Ok(records)
    }

    async fn save_queue(&self, queue: &QueueRecord) -> Result<()> {
        self.check_writable()?;
        self.queues.lock().await.insert(queue.id, queue.clone());
        Ok(())
    }

    async fn update_queue(&self, queue: &QueueRecord) -> Result<()> {
        self.check_writable()?;
        if let Some(stored) = self.queues.lock().await.get_mut(&queue.id) {
            stored.title.clone_from(&queue.title);
            stored.is_shuffled = queue.is_shuffled;
            stored.queue_pos = queue.queue_pos;
            stored.index = queue.index;
            stored.continuation.clone_from(&queue.continuation);
        }
        Ok(())
    }

    async fn rewrite_queue(&self, queue: &QueueRecord) -> Result<()> {
        self.check_writable()?;
        self.queues.lock().await.insert(queue.id, queue.clone());
        Ok(())
    }

    async fn delete_queue(&self, id: QueueId) -> Result<()> {
        self.check_writable()?;
        self.queues.lock().await.remove(&id);
        Ok(())
    }
}
