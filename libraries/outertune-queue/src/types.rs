//! Core types for queue management

use outertune_core::TrackRef;
use serde::{Deserialize, Serialize};

/// Maximum number of queues kept on a board
pub const MAX_QUEUES: usize = 20;

/// Marker appended (after `" +"`) to the title of an extension queue
///
/// Zero-width, so the visible title stays `"<base> +"`.
pub const EXTENSION_MARKER: &str = "\u{200B}";

/// Configuration for a queue board
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    /// Maximum number of queues before the oldest is evicted (default: 20)
    pub max_queues: usize,

    /// Write queues through to the repository (default: true)
    pub persist: bool,

    /// Extension title marker (default: U+200B)
    pub extension_marker: String,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            max_queues: MAX_QUEUES,
            persist: true,
            extension_marker: EXTENSION_MARKER.to_string(),
        }
    }
}

impl BoardConfig {
    /// Full suffix that marks an extension queue title
    pub fn extension_suffix(&self) -> String {
        format!(" +{}", self.extension_marker)
    }

    /// Title of the extension queue spawned from `base`
    pub fn extension_title(&self, base: &str) -> String {
        format!("{}{}", base, self.extension_suffix())
    }
}

/// Arguments of `QueueBoard::add_queue`
///
/// Built with `new` and refined with the chained setters; every flag defaults
/// to `false` and the start index to 0.
#[derive(Debug, Clone, PartialEq)]
pub struct AddQueueRequest {
    /// Queue title (dedup key)
    pub title: String,

    /// Tracks to play, in insertion order
    pub items: Vec<TrackRef>,

    /// Shuffle the queue after creating/replacing it
    pub shuffle: bool,

    /// Never treat the request as a pure jump
    pub force_insert: bool,

    /// Overwrite an existing queue's contents
    pub replace: bool,

    /// Merge only tracks not already present
    pub delta: bool,

    /// Continuation key when the items come from a radio/mix
    pub continuation: Option<String>,

    /// Index into `items` of the track to start at
    pub start_index: usize,
}

impl AddQueueRequest {
    /// Create a request with every flag cleared
    pub fn new(title: impl Into<String>, items: Vec<TrackRef>) -> Self {
        Self {
            title: title.into(),
            items,
            shuffle: false,
            force_insert: false,
            replace: false,
            delta: false,
            continuation: None,
            start_index: 0,
        }
    }

    /// Shuffle after insert
    #[must_use]
    pub fn shuffle(mut self, shuffle: bool) -> Self {
        self.shuffle = shuffle;
        self
    }

    /// Skip the jump-only check
    #[must_use]
    pub fn force_insert(mut self, force: bool) -> Self {
        self.force_insert = force;
        self
    }

    /// Overwrite existing contents
    #[must_use]
    pub fn replace(mut self, replace: bool) -> Self {
        self.replace = replace;
        self
    }

    /// Delta-merge into existing contents
    #[must_use]
    pub fn delta(mut self, delta: bool) -> Self {
        self.delta = delta;
        self
    }

    /// Mark the items as a radio with a continuation key
    #[must_use]
    pub fn radio(mut self, continuation: impl Into<String>) -> Self {
        self.continuation = Some(continuation.into());
        self
    }

    /// Start at `items[index]`
    #[must_use]
    pub fn start_index(mut self, index: usize) -> Self {
        self.start_index = index;
        self
    }

    /// Whether the request carries a radio continuation
    pub fn is_radio(&self) -> bool {
        self.continuation.is_some()
    }

    /// The track playback should start on
    pub(crate) fn start_track(&self) -> Option<&TrackRef> {
        self.items
            .get(self.start_index)
            .or_else(|| self.items.first())
    }
}

/// What `QueueBoard::add_queue` did
///
/// `index` is the board index of the affected queue after the call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AddOutcome {
    /// Nothing to add
    Ignored,

    /// New queue created and made current
    Created { index: usize },

    /// Existing queue overwritten and made current
    Replaced { index: usize },

    /// Same content resubmitted; only the position moved
    Jumped { index: usize },

    /// Missing tracks delta-merged into an existing queue
    Merged { index: usize, added: usize },

    /// New extension queue cloned from its base and made current
    Extended { index: usize },

    /// Tracks appended to an existing extension queue; playback untouched
    AppendedToExtension { index: usize, added: usize },
}

impl AddOutcome {
    /// Whether the player timeline must be reloaded from the board
    pub fn needs_reload(&self) -> bool {
        matches!(
            self,
            AddOutcome::Created { .. }
                | AddOutcome::Replaced { .. }
                | AddOutcome::Merged { .. }
                | AddOutcome::Extended { .. }
        )
    }

    /// Board index of the affected queue
    pub fn index(&self) -> Option<usize> {
        match *self {
            AddOutcome::Ignored => None,
            AddOutcome::Created { index }
            | AddOutcome::Replaced { index }
            | AddOutcome::Jumped { index }
            | AddOutcome::Merged { index, .. }
            | AddOutcome::Extended { index }
            | AddOutcome::AppendedToExtension { index, .. } => Some(index),
        }
    }
}
