//! Board Events
//!
//! Event-based communication for UI synchronization. The board queues an
//! event for every structural change; the UI drains them with
//! `QueueBoard::drain_events` and re-reads whatever it displays.

use outertune_core::QueueId;
use serde::{Deserialize, Serialize};

/// Events emitted by the queue board
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoardEvent {
    /// A queue was created (new title or extension)
    QueueCreated {
        /// Id of the new queue
        id: QueueId,
        /// Its title
        title: String,
    },

    /// The oldest queue was dropped to stay within capacity
    QueueEvicted {
        /// Id of the evicted queue
        id: QueueId,
    },

    /// A queue was deleted on request
    QueueDeleted {
        /// Id of the deleted queue
        id: QueueId,
    },

    /// Tracks, order or position of a queue changed
    QueueChanged {
        /// Id of the changed queue
        id: QueueId,
        /// New track count
        length: usize,
    },

    /// A different queue is now current (or none)
    CurrentQueueChanged {
        /// Id of the current queue
        id: Option<QueueId>,
    },

    /// Shuffle was toggled on the current queue
    ShuffleChanged {
        /// Whether shuffle is now enabled
        enabled: bool,
    },
}
