//! A single named queue
//!
//! Holds two orders of the same tracks:
//! - Unshuffled: insertion order, the stable identity of the queue
//! - Shuffled: the random order played while shuffle is on
//!
//! While shuffle is off the shuffled order mirrors the unshuffled one, so both
//! lists always hold the same multiset of tracks.

use crate::{
    error::{QueueError, Result},
    index::index_after_move,
    shuffle::shuffle_tracks,
};
use outertune_core::{QueueId, QueueRecord, TrackRef};

/// One named queue on the board
///
/// Structure:
/// ```text
/// Mix (shuffled)
/// ─────────────────────────────
/// unshuffled: A B C D E
/// shuffled:   C A E B D   <- active
///                 ^ position = 1 (A)
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct MultiQueue {
    id: QueueId,
    title: String,

    /// Insertion order
    unshuffled: Vec<TrackRef>,

    /// Shuffled order (mirror of `unshuffled` while not shuffled)
    shuffled: Vec<TrackRef>,

    is_shuffled: bool,

    /// Index into the active order, `None` only when empty
    position: Option<usize>,

    /// Display order among all queues
    index: usize,

    /// Radio/playlist id for fetching more items
    continuation: Option<String>,
}

impl MultiQueue {
    /// Create an unshuffled queue starting at `start` (clamped)
    pub fn new(id: QueueId, title: impl Into<String>, tracks: Vec<TrackRef>, start: usize) -> Self {
        let position = clamp_position(start, tracks.len());
        Self {
            id,
            title: title.into(),
            shuffled: tracks.clone(),
            unshuffled: tracks,
            is_shuffled: false,
            position,
            index: 0,
            continuation: None,
        }
    }

    /// Rebuild a queue from storage
    ///
    /// A shuffled order that is not a permutation of the tracks (or any order
    /// while shuffle is off) is replaced by the insertion order.
    pub fn from_record(record: QueueRecord) -> Self {
        let QueueRecord {
            id,
            title,
            tracks,
            shuffled,
            is_shuffled,
            queue_pos,
            index,
            continuation,
        } = record;

        let is_shuffled = is_shuffled && same_multiset(&tracks, &shuffled);
        let shuffled = if is_shuffled { shuffled } else { tracks.clone() };
        let position = usize::try_from(queue_pos)
            .ok()
            .and_then(|pos| clamp_position(pos, tracks.len()));

        Self {
            id,
            title,
            unshuffled: tracks,
            shuffled,
            is_shuffled,
            position,
            index: usize::try_from(index).unwrap_or(0),
            continuation,
        }
    }

    /// Snapshot for storage
    pub fn to_record(&self) -> QueueRecord {
        QueueRecord {
            id: self.id,
            title: self.title.clone(),
            tracks: self.unshuffled.clone(),
            shuffled: self.shuffled.clone(),
            is_shuffled: self.is_shuffled,
            queue_pos: self
                .position
                .and_then(|pos| i32::try_from(pos).ok())
                .unwrap_or(-1),
            index: i32::try_from(self.index).unwrap_or(i32::MAX),
            continuation: self.continuation.clone(),
        }
    }

    /// Copy of this queue under a new id and title
    pub(crate) fn fork(&self, id: QueueId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            ..self.clone()
        }
    }

    pub fn id(&self) -> QueueId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Tracks in insertion order
    pub fn tracks(&self) -> &[TrackRef] {
        &self.unshuffled
    }

    /// Tracks in shuffled order
    pub fn shuffled_tracks(&self) -> &[TrackRef] {
        &self.shuffled
    }

    /// Tracks in the order currently played
    pub fn active(&self) -> &[TrackRef] {
        if self.is_shuffled {
            &self.shuffled
        } else {
            &self.unshuffled
        }
    }

    pub fn is_shuffled(&self) -> bool {
        self.is_shuffled
    }

    /// Current index into `active()`
    pub fn position(&self) -> Option<usize> {
        self.position
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub(crate) fn set_index(&mut self, index: usize) {
        self.index = index;
    }

    pub fn continuation(&self) -> Option<&str> {
        self.continuation.as_deref()
    }

    pub(crate) fn set_continuation(&mut self, continuation: Option<String>) {
        self.continuation = continuation;
    }

    pub fn len(&self) -> usize {
        self.unshuffled.len()
    }

    pub fn is_empty(&self) -> bool {
        self.unshuffled.is_empty()
    }

    /// Track at the current position
    pub fn current_track(&self) -> Option<&TrackRef> {
        self.position.and_then(|pos| self.active().get(pos))
    }

    /// Index of the first track with `id` in the active order
    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.active().iter().position(|track| track.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.unshuffled.iter().any(|track| track.id == id)
    }

    /// Whether this is an extension queue for the given title suffix
    pub fn is_extension(&self, suffix: &str) -> bool {
        self.title.ends_with(suffix)
    }

    /// Title with any extension suffix stripped
    pub fn base_title<'a>(&'a self, suffix: &str) -> &'a str {
        self.title.strip_suffix(suffix).unwrap_or(&self.title)
    }

    /// Point at `index` of the active order
    pub fn set_position(&mut self, index: usize) -> Result<()> {
        if index >= self.len() {
            return Err(QueueError::IndexOutOfBounds {
                index,
                len: self.len(),
            });
        }
        self.position = Some(index);
        Ok(())
    }

    /// Overwrite both orders with `tracks`, unshuffled, at `start` (clamped)
    pub(crate) fn replace_tracks(&mut self, tracks: Vec<TrackRef>, start: usize) {
        self.position = clamp_position(start, tracks.len());
        self.shuffled = tracks.clone();
        self.unshuffled = tracks;
        self.is_shuffled = false;
    }

    /// Append to the end of both orders; the position is left alone
    pub(crate) fn append_tracks(&mut self, tracks: Vec<TrackRef>) {
        self.shuffled.extend(tracks.iter().cloned());
        self.unshuffled.extend(tracks);
        if self.position.is_none() && !self.unshuffled.is_empty() {
            self.position = Some(0);
        }
    }

    /// Insert tracks into the active order at `at` (append when `None`)
    ///
    /// While shuffled the tracks are appended to the insertion order, so the
    /// unshuffled list keeps its history. The current position keeps pointing
    /// at the same track. Returns the index of the first inserted track.
    pub fn add_tracks(&mut self, tracks: Vec<TrackRef>, at: Option<usize>) -> Result<usize> {
        let len = self.len();
        let at = at.unwrap_or(len);
        if at > len {
            return Err(QueueError::IndexOutOfBounds { index: at, len });
        }
        if tracks.is_empty() {
            return Ok(at);
        }

        let count = tracks.len();
        if self.is_shuffled {
            self.shuffled.splice(at..at, tracks.iter().cloned());
            self.unshuffled.extend(tracks);
        } else {
            self.unshuffled.splice(at..at, tracks.iter().cloned());
            self.shuffled.splice(at..at, tracks);
        }

        self.position = match self.position {
            Some(pos) if at <= pos => Some(pos + count),
            Some(pos) => Some(pos),
            None => Some(at),
        };
        Ok(at)
    }

    /// Remove the track at `index` of the active order
    ///
    /// Removing the current track leaves the position on the track that slid
    /// into its slot (or the new last track).
    pub fn remove_song(&mut self, index: usize) -> Result<TrackRef> {
        let len = self.len();
        if index >= len {
            return Err(QueueError::IndexOutOfBounds { index, len });
        }

        let removed = if self.is_shuffled {
            let removed = self.shuffled.remove(index);
            if let Some(pos) = self.unshuffled.iter().position(|t| t.same_track(&removed)) {
                self.unshuffled.remove(pos);
            }
            removed
        } else {
            self.shuffled.remove(index);
            self.unshuffled.remove(index)
        };

        self.position = match self.position {
            _ if self.unshuffled.is_empty() => None,
            Some(pos) if index < pos => Some(pos - 1),
            Some(pos) => Some(pos.min(self.len() - 1)),
            None => None,
        };
        Ok(removed)
    }

    /// Move a track within the active order
    ///
    /// `current_playing` is the player's index before the move; the returned
    /// index is where that item sits afterwards, which also becomes the
    /// queue's position.
    pub fn move_song(&mut self, from: usize, to: usize, current_playing: usize) -> Result<usize> {
        let len = self.len();
        for index in [from, to] {
            if index >= len {
                return Err(QueueError::IndexOutOfBounds { index, len });
            }
        }

        if self.is_shuffled {
            let track = self.shuffled.remove(from);
            self.shuffled.insert(to, track);
        } else {
            let track = self.unshuffled.remove(from);
            self.unshuffled.insert(to, track);
            let mirror = self.shuffled.remove(from);
            self.shuffled.insert(to, mirror);
        }

        let playing = index_after_move(current_playing, from, to);
        self.position = clamp_position(playing, len);
        Ok(playing)
    }

    /// Shuffle the queue
    ///
    /// With `preserve_current` the playing track is moved to the front of the
    /// new order. The position is reset to the front either way.
    pub(crate) fn shuffle(&mut self, preserve_current: bool) {
        let pinned = if preserve_current {
            self.current_track()
                .and_then(|current| self.unshuffled.iter().position(|t| t.same_track(current)))
        } else {
            None
        };

        let mut order = self.unshuffled.clone();
        shuffle_tracks(&mut order, pinned);

        self.shuffled = order;
        self.is_shuffled = true;
        self.position = clamp_position(0, self.len());
    }

    /// Return to insertion order, keeping the playing track current
    pub(crate) fn unshuffle(&mut self) {
        let current_id = self.current_track().map(|track| track.id.clone());

        self.is_shuffled = false;
        self.shuffled = self.unshuffled.clone();
        self.position = current_id
            .and_then(|id| self.index_of(&id))
            .or_else(|| clamp_position(0, self.len()));
    }
}

fn clamp_position(pos: usize, len: usize) -> Option<usize> {
    if len == 0 {
        None
    } else {
        Some(pos.min(len - 1))
    }
}

fn same_multiset(a: &[TrackRef], b: &[TrackRef]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut left: Vec<&str> = a.iter().map(|t| t.id.as_str()).collect();
    let mut right: Vec<&str> = b.iter().map(|t| t.id.as_str()).collect();
    left.sort_unstable();
    right.sort_unstable();
    left == right
}
