//! Pushing a queue into the player timeline
//!
//! When the player is already playing the queue's current track the timeline
//! is edited around it instead of being replaced, so playback continues
//! without a gap or restart.

use crate::queue::MultiQueue;
use outertune_core::PlaybackSink;
use tracing::debug;

/// How `sync_sink` updated the player
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkSync {
    /// Playing item kept; neighbours rebuilt around it
    Seamless { position: usize },

    /// Whole timeline replaced
    Replaced { position: Option<usize> },
}

impl SinkSync {
    /// Index the player sits on afterwards (per the queue)
    pub fn position(&self) -> Option<usize> {
        match *self {
            SinkSync::Seamless { position } => Some(position),
            SinkSync::Replaced { position } => position,
        }
    }
}

/// Load `queue` into `sink`
///
/// Seamless when the sink's current item is the queue's current track:
/// - position 0: everything around the playing item is removed and the rest
///   of the queue appended after it
/// - position > 0: the ranges after and before the playing item are replaced
///   independently, the playing slot itself is never touched
///
/// Otherwise the timeline is replaced wholesale and, with `auto_seek`, the
/// player is told to seek to the queue position.
pub fn sync_sink(queue: &MultiQueue, sink: &mut dyn PlaybackSink, auto_seek: bool) -> SinkSync {
    let items = queue.active();
    let position = queue.position();

    let playing = match (position, sink.current_index(), sink.current_item_id()) {
        (Some(pos), Some(current), Some(id)) if items.get(pos).is_some_and(|t| t.id == id) => {
            Some((pos, current))
        }
        _ => None,
    };

    let Some((pos, current)) = playing else {
        debug!(queue_id = queue.id(), "Replacing player timeline");
        sink.set_items(items.to_vec());
        if auto_seek {
            if let Some(pos) = position {
                sink.seek_to(pos);
            }
        }
        return SinkSync::Replaced { position };
    };

    debug!(queue_id = queue.id(), pos, current, "Seamless player timeline update");
    let count = sink.item_count();

    if pos == 0 {
        if current + 1 < count {
            sink.remove_items(current + 1, count);
        }
        if current > 0 {
            sink.remove_items(0, current);
        }
        if items.len() > 1 {
            sink.add_items(1, items[1..].to_vec());
        }
    } else {
        // After first, so `current` stays valid for the leading range
        sink.replace_items(current + 1, count, items[pos + 1..].to_vec());
        sink.replace_items(0, current, items[..pos].to_vec());
    }

    SinkSync::Seamless { position: pos }
}
