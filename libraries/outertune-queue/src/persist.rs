//! Write-through persistence for the board
//!
//! Every write is dispatched as its own background task: no batching, no
//! ordering between tasks, no retry. Failures are logged and dropped, so the
//! stored copy is only eventually consistent with the in-memory board (last
//! write wins).

use crate::error::{QueueError, Result};
use outertune_core::{QueueId, QueueRecord, QueueRepository};
use std::future::Future;
use std::sync::{Arc, Mutex};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Fire-and-forget dispatcher in front of a `QueueRepository`
///
/// Cloning is cheap and clones share the bulk lock and the task list.
#[derive(Clone)]
pub struct Persister {
    repository: Arc<dyn QueueRepository>,
    runtime: Handle,

    /// Advisory lock held by bulk `update_all` writes
    bulk_lock: Arc<tokio::sync::Mutex<()>>,

    /// Tasks dispatched and not yet awaited by `settle`
    in_flight: Arc<Mutex<Vec<JoinHandle<()>>>>,
}

impl Persister {
    /// Create a persister on the current tokio runtime
    pub fn new(repository: Arc<dyn QueueRepository>) -> Result<Self> {
        let runtime = Handle::try_current().map_err(|_| QueueError::NoRuntime)?;
        Ok(Self::with_handle(repository, runtime))
    }

    /// Create a persister that spawns onto `runtime`
    pub fn with_handle(repository: Arc<dyn QueueRepository>, runtime: Handle) -> Self {
        Self {
            repository,
            runtime,
            bulk_lock: Arc::new(tokio::sync::Mutex::new(())),
            in_flight: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Repository behind this persister
    pub fn repository(&self) -> &Arc<dyn QueueRepository> {
        &self.repository
    }

    /// Insert a new queue with its tracks
    pub fn save(&self, record: QueueRecord) {
        let repository = Arc::clone(&self.repository);
        self.dispatch("save", record.id, async move {
            repository.save_queue(&record).await
        });
    }

    /// Update queue metadata
    pub fn update(&self, record: QueueRecord) {
        let repository = Arc::clone(&self.repository);
        self.dispatch("update", record.id, async move {
            repository.update_queue(&record).await
        });
    }

    /// Replace a queue's track list
    pub fn rewrite(&self, record: QueueRecord) {
        let repository = Arc::clone(&self.repository);
        self.dispatch("rewrite", record.id, async move {
            repository.rewrite_queue(&record).await
        });
    }

    /// Delete a queue
    pub fn delete(&self, id: QueueId) {
        let repository = Arc::clone(&self.repository);
        self.dispatch("delete", id, async move { repository.delete_queue(id).await });
    }

    /// Save every queue while holding the bulk lock
    pub fn update_all(&self, records: Vec<QueueRecord>) {
        let repository = Arc::clone(&self.repository);
        let bulk_lock = Arc::clone(&self.bulk_lock);
        let count = records.len();
        self.dispatch("update_all", -1, async move {
            let _guard = bulk_lock.lock().await;
            debug!(count, "Saving all queues");
            repository.update_all(&records).await
        });
    }

    /// Wait for every write dispatched so far
    ///
    /// Writes dispatched while waiting are awaited too.
    pub async fn settle(&self) {
        loop {
            let pending = match self.in_flight.lock() {
                Ok(mut in_flight) => std::mem::take(&mut *in_flight),
                Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
            };
            if pending.is_empty() {
                return;
            }
            for handle in pending {
                if let Err(e) = handle.await {
                    warn!(error = %e, "Queue persistence task panicked");
                }
            }
        }
    }

    fn dispatch<F>(&self, operation: &'static str, queue_id: QueueId, write: F)
    where
        F: Future<Output = outertune_core::Result<()>> + Send + 'static,
    {
        let handle = self.runtime.spawn(async move {
            match write.await {
                Ok(()) => debug!(operation, queue_id, "Queue persisted"),
                Err(e) => warn!(operation, queue_id, error = %e, "Queue persistence failed"),
            }
        });

        let mut in_flight = match self.in_flight.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        in_flight.retain(|task| !task.is_finished());
        in_flight.push(handle);
    }
}

impl std::fmt::Debug for Persister {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Persister").finish_non_exhaustive()
    }
}
