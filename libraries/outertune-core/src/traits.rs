/// Collaborator traits consumed by the queue engine
use crate::error::Result;
use crate::types::{QueueId, QueueRecord, TrackRef};
use async_trait::async_trait;

/// Persistent storage for queues
///
/// Implementations back the queue board across process death. The board
/// dispatches every call as an independent background task, so
/// implementations must tolerate concurrent calls for the same queue
/// (last write wins).
#[async_trait]
pub trait QueueRepository: Send + Sync {
    /// Load every stored queue with its tracks, ordered by display index
    async fn load_all(&self) -> Result<Vec<QueueRecord>>;

    /// Insert a queue with all of its tracks, replacing any existing row
    async fn save_queue(&self, queue: &QueueRecord) -> Result<()>;

    /// Update queue metadata only (title, shuffle flag, position, index,
    /// continuation). Unknown ids are ignored.
    async fn update_queue(&self, queue: &QueueRecord) -> Result<()>;

    /// Atomically replace a queue's full track list together with its metadata
    async fn rewrite_queue(&self, queue: &QueueRecord) -> Result<()>;

    /// Delete a queue and its tracks. Unknown ids are ignored.
    async fn delete_queue(&self, id: QueueId) -> Result<()>;

    /// Save every queue in one pass
    async fn update_all(&self, queues: &[QueueRecord]) -> Result<()> {
        for queue in queues {
            self.save_queue(queue).await?;
        }
        Ok(())
    }
}

/// The media player's active timeline
///
/// Ranges are half-open (`start..end`). Implementors are expected to apply
/// range edits without interrupting the currently playing item when it lies
/// outside the edited range.
pub trait PlaybackSink {
    /// Number of items in the timeline
    fn item_count(&self) -> usize;

    /// Index of the current item, `None` when the timeline is empty
    fn current_index(&self) -> Option<usize>;

    /// Id of the current item
    fn current_item_id(&self) -> Option<&str>;

    /// Replace the whole timeline
    fn set_items(&mut self, items: Vec<TrackRef>);

    /// Insert items before `index`
    fn add_items(&mut self, index: usize, items: Vec<TrackRef>);

    /// Replace `start..end` with `items`
    fn replace_items(&mut self, start: usize, end: usize, items: Vec<TrackRef>);

    /// Remove `start..end`
    fn remove_items(&mut self, start: usize, end: usize);

    /// Make the item at `index` current
    fn seek_to(&mut self, index: usize);
}
