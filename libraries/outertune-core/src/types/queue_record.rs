//! Persisted form of a queue

use super::TrackRef;
use serde::{Deserialize, Serialize};

/// Queue identifier, assigned by the board
pub type QueueId = i64;

/// One queue as stored by a `QueueRepository`
///
/// Plain data with no behaviour; the queue engine converts it to and from its
/// in-memory queue type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueRecord {
    /// Board-assigned id
    pub id: QueueId,

    /// Title, also the dedup key between queues
    pub title: String,

    /// Tracks in insertion (unshuffled) order
    pub tracks: Vec<TrackRef>,

    /// Tracks in shuffled order; same multiset as `tracks`
    pub shuffled: Vec<TrackRef>,

    /// Whether the shuffled order is the active one
    pub is_shuffled: bool,

    /// Index into the active order, -1 when the queue is empty
    pub queue_pos: i32,

    /// Display order among all queues (recency, most recent last)
    pub index: i32,

    /// Radio/playlist id used to fetch more items
    pub continuation: Option<String>,
}

impl QueueRecord {
    /// Create an unshuffled record positioned at the first track
    pub fn new(id: QueueId, title: impl Into<String>, tracks: Vec<TrackRef>) -> Self {
        let queue_pos = if tracks.is_empty() { -1 } else { 0 };
        Self {
            id,
            title: title.into(),
            shuffled: tracks.clone(),
            tracks,
            is_shuffled: false,
            queue_pos,
            index: 0,
            continuation: None,
        }
    }

    /// Tracks in whichever order is active
    pub fn active(&self) -> &[TrackRef] {
        if self.is_shuffled {
            &self.shuffled
        } else {
            &self.tracks
        }
    }
}
