//! Shared fixtures for queue integration tests

#![allow(dead_code)]

use outertune_core::{PlaybackSink, TrackRef};
use std::time::Duration;

pub fn track(id: &str) -> TrackRef {
    TrackRef::remote(
        id,
        format!("Song {}", id),
        Duration::from_secs(200),
        format!("https://music.example/watch?v={}", id),
    )
}

pub fn tracks(ids: &[&str]) -> Vec<TrackRef> {
    ids.iter().map(|id| track(id)).collect()
}

pub fn ids(tracks: &[TrackRef]) -> Vec<String> {
    tracks.iter().map(|t| t.id.clone()).collect()
}

/// Operations a `RecordingSink` received
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkOp {
    SetItems(usize),
    Add { index: usize, count: usize },
    Replace { start: usize, end: usize, count: usize },
    Remove { start: usize, end: usize },
    Seek(usize),
}

/// Player double that keeps its current item stable across range edits, the
/// way a media player timeline does
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub items: Vec<TrackRef>,
    pub current: Option<usize>,
    pub ops: Vec<SinkOp>,
}

impl RecordingSink {
    pub fn playing(items: Vec<TrackRef>, current: usize) -> Self {
        Self {
            items,
            current: Some(current),
            ops: Vec::new(),
        }
    }

    pub fn item_ids(&self) -> Vec<String> {
        ids(&self.items)
    }

    /// Whether the whole timeline was ever replaced
    pub fn was_reset(&self) -> bool {
        self.ops.iter().any(|op| matches!(op, SinkOp::SetItems(_)))
    }

    fn adjust_for_splice(&mut self, start: usize, end: usize, inserted: usize) {
        self.current = match self.current {
            Some(c) if c >= end => Some(c - (end - start) + inserted),
            Some(c) if c >= start => {
                if self.items.is_empty() {
                    None
                } else {
                    Some(start.min(self.items.len() - 1))
                }
            }
            Some(c) => Some(c),
            None if !self.items.is_empty() => Some(0),
            None => None,
        };
    }
}

impl PlaybackSink for RecordingSink {
    fn item_count(&self) -> usize {
        self.items.len()
    }

    fn current_index(&self) -> Option<usize> {
        self.current
    }

    fn current_item_id(&self) -> Option<&str> {
        self.current
            .and_then(|c| self.items.get(c))
            .map(|t| t.id.as_str())
    }

    fn set_items(&mut self, items: Vec<TrackRef>) {
        self.ops.push(SinkOp::SetItems(items.len()));
        self.current = if items.is_empty() { None } else { Some(0) };
        self.items = items;
    }

    fn add_items(&mut self, index: usize, items: Vec<TrackRef>) {
        self.ops.push(SinkOp::Add {
            index,
            count: items.len(),
        });
        let count = items.len();
        self.items.splice(index..index, items);
        self.adjust_for_splice(index, index, count);
    }

    fn replace_items(&mut self, start: usize, end: usize, items: Vec<TrackRef>) {
        self.ops.push(SinkOp::Replace {
            start,
            end,
            count: items.len(),
        });
        let count = items.len();
        self.items.splice(start..end, items);
        self.adjust_for_splice(start, end, count);
    }

    fn remove_items(&mut self, start: usize, end: usize) {
        self.ops.push(SinkOp::Remove { start, end });
        self.items.drain(start..end);
        self.adjust_for_splice(start, end, 0);
    }

    fn seek_to(&mut self, index: usize) {
        self.ops.push(SinkOp::Seek(index));
        self.current = Some(index);
    }
}
