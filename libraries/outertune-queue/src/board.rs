//! Queue board - core orchestration
//!
//! Owns every queue, the notion of a "current" queue, and the write-through
//! to storage. Queues are ordered by recency of use, most recent last.

use crate::{
    error::{QueueError, Result},
    events::BoardEvent,
    index::index_after_move,
    persist::Persister,
    queue::MultiQueue,
    sync::{sync_sink, SinkSync},
    types::{AddOutcome, AddQueueRequest, BoardConfig},
};
use outertune_core::{PlaybackSink, QueueId, TrackRef};
use std::collections::HashSet;
use tracing::{debug, info, warn};

/// In-memory manager of all queues
///
/// Mutations are not internally synchronized: the board expects a single
/// logical caller (the playback service's event handlers). Only the bulk
/// `save_all` write takes the persister's advisory lock.
///
/// Every public mutating operation promotes the queue it touched to most
/// recently used exactly once, through `bubble_up`.
#[derive(Debug)]
pub struct QueueBoard {
    config: BoardConfig,

    /// Recency order, most recently used last
    queues: Vec<MultiQueue>,

    /// Index of the current queue
    current: Option<usize>,

    /// Player timeline no longer backed by the current queue
    detached_head: bool,

    initialized: bool,
    shuffle_enabled: bool,
    next_id: QueueId,

    persister: Option<Persister>,

    // Event queue for UI synchronization
    pending_events: Vec<BoardEvent>,
}

impl QueueBoard {
    /// Create an empty board without persistence
    pub fn new(config: BoardConfig) -> Self {
        Self {
            config,
            queues: Vec::new(),
            current: None,
            detached_head: false,
            initialized: true,
            shuffle_enabled: false,
            next_id: 1,
            persister: None,
            pending_events: Vec::new(),
        }
    }

    /// Create a board that writes through `persister`
    ///
    /// The board stays uninitialized until `rehydrate` has run. With
    /// `config.persist` off the persister is dropped.
    pub fn with_persister(config: BoardConfig, persister: Persister) -> Self {
        if !config.persist {
            return Self::new(config);
        }
        Self {
            initialized: false,
            persister: Some(persister),
            ..Self::new(config)
        }
    }

    // ===== Accessors =====

    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    pub fn queues(&self) -> &[MultiQueue] {
        &self.queues
    }

    pub fn queue(&self, idx: usize) -> Option<&MultiQueue> {
        self.queues.get(idx)
    }

    pub fn len(&self) -> usize {
        self.queues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queues.is_empty()
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn is_detached_head(&self) -> bool {
        self.detached_head
    }

    /// Shuffle state of the current queue as last set by the board
    pub fn is_shuffle_enabled(&self) -> bool {
        self.shuffle_enabled
    }

    pub fn persister(&self) -> Option<&Persister> {
        self.persister.as_ref()
    }

    /// Index of the current queue
    ///
    /// A stale index falls back to the most recently used queue.
    pub fn current_index(&self) -> Option<usize> {
        match self.current {
            Some(idx) if idx < self.queues.len() => Some(idx),
            Some(idx) => {
                warn!(idx, len = self.queues.len(), "Stale current queue index, using last queue");
                self.queues.len().checked_sub(1)
            }
            None => None,
        }
    }

    pub fn current_queue(&self) -> Option<&MultiQueue> {
        self.current_index().and_then(|idx| self.queues.get(idx))
    }

    /// Board index of the queue titled exactly `title`
    pub fn find_by_title(&self, title: &str) -> Option<usize> {
        self.queues.iter().position(|q| q.title() == title)
    }

    /// Take all events queued since the last call
    pub fn drain_events(&mut self) -> Vec<BoardEvent> {
        std::mem::take(&mut self.pending_events)
    }

    /// Mark the player timeline as no longer backed by the board
    pub fn detach_head(&mut self) {
        self.detached_head = true;
    }

    // ===== Adding =====

    /// Add tracks under a title
    ///
    /// Branches, in order:
    /// 1. no items: ignored
    /// 2. unknown title: new queue
    /// 3. `replace`: overwrite the existing queue
    /// 4. same size, every item already present, not `force_insert`: jump to
    ///    the start track without touching contents
    /// 5. `delta`: append only tracks not yet present
    /// 6. otherwise: append to the title's extension queue, creating it from
    ///    a copy of the base queue when it does not exist yet
    pub fn add_queue(&mut self, request: AddQueueRequest) -> AddOutcome {
        if request.items.is_empty() {
            return AddOutcome::Ignored;
        }

        match self.find_by_title(&request.title) {
            None => self.create_queue(request),
            Some(idx) if request.replace => self.replace_queue(idx, request),
            Some(idx) if !request.force_insert && self.holds_same_content(idx, &request.items) => {
                self.jump_to(idx, &request)
            }
            Some(idx) if request.delta => self.merge_delta(idx, request),
            Some(idx) => self.extend(idx, request),
        }
    }

    fn holds_same_content(&self, idx: usize, items: &[TrackRef]) -> bool {
        let queue = &self.queues[idx];
        items.len() == queue.len() && items.iter().all(|item| queue.contains(&item.id))
    }

    fn create_queue(&mut self, request: AddQueueRequest) -> AddOutcome {
        let start_id = request.start_track().map(|t| t.id.clone());
        let AddQueueRequest {
            title,
            items,
            shuffle,
            delta,
            continuation,
            ..
        } = request;

        let items = if delta { dedup_by_id(items) } else { items };
        let start = start_id
            .and_then(|id| items.iter().position(|t| t.id == id))
            .unwrap_or(0);

        self.evict_if_full();

        let mut queue = MultiQueue::new(self.allocate_id(), title, items, start);
        queue.set_continuation(continuation);
        if shuffle {
            queue.shuffle(true);
        }
        queue.set_index(self.queues.len());

        debug!(id = queue.id(), title = queue.title(), len = queue.len(), "Creating queue");
        self.emit(BoardEvent::QueueCreated {
            id: queue.id(),
            title: queue.title().to_string(),
        });
        self.with_persister_do(|p| p.save(queue.to_record()));

        self.queues.push(queue);
        let index = self.queues.len() - 1;
        self.set_current(index);
        AddOutcome::Created { index }
    }

    fn replace_queue(&mut self, idx: usize, request: AddQueueRequest) -> AddOutcome {
        let start_id = request.start_track().map(|t| t.id.clone());
        let queue = &mut self.queues[idx];

        let start = start_id
            .and_then(|id| request.items.iter().position(|t| t.id == id))
            .unwrap_or(0);
        queue.replace_tracks(request.items, start);
        if request.continuation.is_some() {
            queue.set_continuation(request.continuation);
        }
        if request.shuffle {
            queue.shuffle(true);
        }
        debug!(id = queue.id(), len = queue.len(), "Replacing queue contents");

        let index = self.bubble_up(idx);
        self.set_current(index);
        self.rewrite(index);
        AddOutcome::Replaced { index }
    }

    fn jump_to(&mut self, idx: usize, request: &AddQueueRequest) -> AddOutcome {
        let queue = &mut self.queues[idx];
        if let Some(pos) = request.start_track().and_then(|t| queue.index_of(&t.id)) {
            // index_of only yields valid positions
            let _ = queue.set_position(pos);
        }
        debug!(id = queue.id(), pos = ?queue.position(), "Jumping within existing queue");

        let index = self.bubble_up(idx);
        self.set_current(index);
        self.update(index);
        AddOutcome::Jumped { index }
    }

    fn merge_delta(&mut self, idx: usize, request: AddQueueRequest) -> AddOutcome {
        let start_id = request.start_track().map(|t| t.id.clone());
        let queue = &mut self.queues[idx];

        let mut seen: HashSet<String> = queue.tracks().iter().map(|t| t.id.clone()).collect();
        let fresh: Vec<TrackRef> = request
            .items
            .into_iter()
            .filter(|t| seen.insert(t.id.clone()))
            .collect();
        let added = fresh.len();
        queue.append_tracks(fresh);

        if let Some(pos) = start_id.and_then(|id| queue.index_of(&id)) {
            let _ = queue.set_position(pos);
        }
        if request.continuation.is_some() {
            queue.set_continuation(request.continuation);
        }
        debug!(id = queue.id(), added, "Delta-merged into queue");

        let index = self.bubble_up(idx);
        self.set_current(index);
        self.rewrite(index);
        AddOutcome::Merged { index, added }
    }

    fn extend(&mut self, idx: usize, request: AddQueueRequest) -> AddOutcome {
        let suffix = self.config.extension_suffix();
        let base = &self.queues[idx];
        let extension_title = self.config.extension_title(base.base_title(&suffix));

        let existing = if base.is_extension(&suffix) {
            Some(idx)
        } else {
            self.find_by_title(&extension_title)
        };

        if let Some(ext) = existing {
            let added = request.items.len();
            self.queues[ext].append_tracks(request.items);
            debug!(id = self.queues[ext].id(), added, "Appended to extension queue");

            let index = self.bubble_up(ext);
            self.rewrite(index);
            return AddOutcome::AppendedToExtension { index, added };
        }

        let id = self.allocate_id();
        let mut extension = self.queues[idx].fork(id, extension_title);
        extension.append_tracks(request.items);

        self.evict_if_full();
        extension.set_index(self.queues.len());

        info!(id, title = extension.title(), len = extension.len(), "Creating extension queue");
        self.emit(BoardEvent::QueueCreated {
            id,
            title: extension.title().to_string(),
        });
        self.with_persister_do(|p| p.save(extension.to_record()));

        self.queues.push(extension);
        let index = self.queues.len() - 1;
        self.set_current(index);
        AddOutcome::Extended { index }
    }

    /// Insert tracks into an existing queue ("play next" / "add to queue")
    ///
    /// `at` indexes the queue's active order; `None` appends. Returns the
    /// queue's board index afterwards.
    pub fn add_songs_to_queue(
        &mut self,
        idx: usize,
        tracks: Vec<TrackRef>,
        at: Option<usize>,
    ) -> Result<usize> {
        let queue = self.queues.get_mut(idx).ok_or(QueueError::QueueNotFound(idx))?;
        queue.add_tracks(tracks, at)?;

        let index = self.bubble_up(idx);
        self.rewrite(index);
        Ok(index)
    }

    // ===== Shuffle =====

    /// Shuffle a queue
    ///
    /// With `preserve_current` the playing track moves to the front. Returns
    /// the queue's board index afterwards.
    pub fn shuffle(&mut self, idx: usize, preserve_current: bool, bypass_persist: bool) -> Result<usize> {
        let queue = self.queues.get_mut(idx).ok_or(QueueError::QueueNotFound(idx))?;
        queue.shuffle(preserve_current);
        debug!(id = queue.id(), preserve_current, "Shuffled queue");

        self.set_shuffle_enabled(true);
        let index = self.bubble_up(idx);
        if bypass_persist {
            self.emit_changed(index);
        } else {
            self.rewrite(index);
        }
        Ok(index)
    }

    /// Restore insertion order, keeping the playing track current
    pub fn unshuffle(&mut self, idx: usize) -> Result<usize> {
        let queue = self.queues.get_mut(idx).ok_or(QueueError::QueueNotFound(idx))?;
        queue.unshuffle();
        debug!(id = queue.id(), pos = ?queue.position(), "Unshuffled queue");

        self.set_shuffle_enabled(false);
        let index = self.bubble_up(idx);
        self.rewrite(index);
        Ok(index)
    }

    pub fn shuffle_current(&mut self, preserve_current: bool) -> Result<usize> {
        let idx = self.current_index().ok_or(QueueError::QueueEmpty)?;
        self.shuffle(idx, preserve_current, false)
    }

    pub fn unshuffle_current(&mut self) -> Result<usize> {
        let idx = self.current_index().ok_or(QueueError::QueueEmpty)?;
        self.unshuffle(idx)
    }

    // ===== Reordering and removal =====

    /// Reorder queues on the board; the current pointer follows its queue
    pub fn move_queue(&mut self, from: usize, to: usize) -> Result<()> {
        let len = self.queues.len();
        for idx in [from, to] {
            if idx >= len {
                return Err(QueueError::QueueNotFound(idx));
            }
        }
        if from == to {
            return Ok(());
        }

        let queue = self.queues.remove(from);
        self.queues.insert(to, queue);
        self.current = self.current.map(|c| index_after_move(c, from, to));
        self.reindex(from.min(to), from.max(to) + 1);
        Ok(())
    }

    /// Move a track within a queue
    ///
    /// Returns where the player's `current_playing` item sits afterwards.
    pub fn move_song(
        &mut self,
        idx: usize,
        from: usize,
        to: usize,
        current_playing: usize,
    ) -> Result<usize> {
        let queue = self.queues.get_mut(idx).ok_or(QueueError::QueueNotFound(idx))?;
        let playing = queue.move_song(from, to, current_playing)?;

        let index = self.bubble_up(idx);
        self.rewrite(index);
        Ok(playing)
    }

    /// Remove a track from a queue
    ///
    /// A queue left empty is deleted from the board.
    pub fn remove_song(&mut self, idx: usize, song: usize) -> Result<TrackRef> {
        let queue = self.queues.get_mut(idx).ok_or(QueueError::QueueNotFound(idx))?;
        let removed = queue.remove_song(song)?;

        if queue.is_empty() {
            self.delete_queue(idx)?;
            return Ok(removed);
        }

        let index = self.bubble_up(idx);
        self.rewrite(index);
        Ok(removed)
    }

    /// Remove a track from the current queue
    pub fn remove_current_queue_song(&mut self, song: usize) -> Result<TrackRef> {
        let idx = self.current_index().ok_or(QueueError::QueueEmpty)?;
        self.remove_song(idx, song)
    }

    /// Delete a queue
    ///
    /// Deleting the current queue detaches the head and falls back to the
    /// most recently used remaining queue. Returns the new current index.
    pub fn delete_queue(&mut self, idx: usize) -> Result<Option<usize>> {
        if idx >= self.queues.len() {
            return Err(QueueError::QueueNotFound(idx));
        }

        let queue = self.queues.remove(idx);
        info!(id = queue.id(), title = queue.title(), "Deleting queue");
        self.with_persister_do(|p| p.delete(queue.id()));
        self.emit(BoardEvent::QueueDeleted { id: queue.id() });

        let current = self.current;
        self.current = match current {
            Some(c) if c == idx => {
                self.detached_head = true;
                let fallback = self.queues.len().checked_sub(1);
                self.shuffle_enabled = fallback.is_some_and(|i| self.queues[i].is_shuffled());
                let id = fallback.map(|i| self.queues[i].id());
                self.emit(BoardEvent::CurrentQueueChanged { id });
                fallback
            }
            Some(c) if c > idx => Some(c - 1),
            other => other,
        };
        self.reindex(idx, self.queues.len());
        Ok(self.current)
    }

    /// Delete every queue
    pub fn clear(&mut self) {
        for queue in std::mem::take(&mut self.queues) {
            self.with_persister_do(|p| p.delete(queue.id()));
            self.emit(BoardEvent::QueueDeleted { id: queue.id() });
        }
        if self.current.take().is_some() {
            self.emit(BoardEvent::CurrentQueueChanged { id: None });
        }
    }

    // ===== Player synchronization =====

    /// Make a queue current and load it into the player
    ///
    /// See `sync_sink` for when the update is seamless.
    pub fn set_curr_queue(
        &mut self,
        idx: usize,
        sink: &mut dyn PlaybackSink,
        auto_seek: bool,
    ) -> Result<SinkSync> {
        if idx >= self.queues.len() {
            warn!(idx, len = self.queues.len(), "Cannot switch to missing queue");
            return Err(QueueError::QueueNotFound(idx));
        }

        let index = self.bubble_up(idx);
        if index != idx {
            self.update(index);
        }
        self.set_current(index);
        Ok(sync_sink(&self.queues[index], sink, auto_seek))
    }

    /// Record that the player moved to `pos` of the current queue
    ///
    /// Ignored while the head is detached.
    pub fn set_curr_queue_pos(&mut self, pos: usize) -> Result<()> {
        if self.detached_head {
            debug!(pos, "Head detached, ignoring player position");
            return Ok(());
        }
        let idx = self.current_index().ok_or(QueueError::QueueEmpty)?;
        self.queues[idx].set_position(pos)?;
        self.update(idx);
        Ok(())
    }

    // ===== Persistence =====

    /// Load the board from the repository
    ///
    /// Queues beyond capacity (oldest first) are deleted from storage. The
    /// most recently used queue becomes current. Returns the number of queues
    /// loaded.
    pub async fn rehydrate(&mut self) -> Result<usize> {
        let Some(persister) = self.persister.clone() else {
            self.initialized = true;
            return Err(QueueError::PersistenceDisabled);
        };

        let records = persister.repository().load_all().await?;
        let mut queues: Vec<MultiQueue> = records.into_iter().map(MultiQueue::from_record).collect();
        queues.sort_by_key(MultiQueue::index);

        let capacity = self.capacity();
        if queues.len() > capacity {
            let overflow = queues.len() - capacity;
            for queue in queues.drain(..overflow) {
                info!(id = queue.id(), title = queue.title(), "Dropping queue over capacity");
                persister.delete(queue.id());
            }
        }

        let max_id = queues.iter().map(MultiQueue::id).max().unwrap_or(0);
        self.next_id = self.next_id.max(max_id + 1);
        self.queues = queues;
        self.reindex(0, self.queues.len());
        self.current = None;
        if let Some(last) = self.queues.len().checked_sub(1) {
            self.set_current(last);
        }
        self.initialized = true;

        info!(count = self.queues.len(), "Rehydrated queue board");
        Ok(self.queues.len())
    }

    /// Write every queue back under the bulk lock
    pub fn save_all(&mut self) {
        for (i, queue) in self.queues.iter_mut().enumerate() {
            queue.set_index(i);
        }
        let records = self.queues.iter().map(MultiQueue::to_record).collect();
        self.with_persister_do(|p| p.update_all(records));
    }

    /// Save everything and wait for all outstanding writes
    pub async fn shutdown(&mut self) {
        self.save_all();
        if let Some(persister) = &self.persister {
            persister.settle().await;
        }
    }

    // ===== Internals =====

    /// Promote a queue to most recently used
    ///
    /// The current pointer keeps following its queue. Only the queues that
    /// shifted down are persisted; the promoted queue is left to the caller.
    /// Returns the queue's new index.
    fn bubble_up(&mut self, idx: usize) -> usize {
        let last = self.queues.len() - 1;
        if idx >= last {
            return idx;
        }

        let mut queue = self.queues.remove(idx);
        queue.set_index(last);
        self.queues.push(queue);
        self.current = self.current.map(|c| index_after_move(c, idx, last));
        self.reindex(idx, last);
        last
    }

    /// Renumber display indexes in `start..end`, persisting changed ones
    fn reindex(&mut self, start: usize, end: usize) {
        for i in start..end.min(self.queues.len()) {
            if self.queues[i].index() != i {
                self.queues[i].set_index(i);
                self.update(i);
            }
        }
    }

    fn evict_if_full(&mut self) {
        let capacity = self.capacity();
        while self.queues.len() >= capacity {
            let evicted = self.queues.remove(0);
            info!(id = evicted.id(), title = evicted.title(), "Evicting least recently used queue");
            self.with_persister_do(|p| p.delete(evicted.id()));
            self.emit(BoardEvent::QueueEvicted { id: evicted.id() });

            self.current = match self.current {
                Some(0) | None => None,
                Some(c) => Some(c - 1),
            };
        }
        self.reindex(0, self.queues.len());
    }

    fn capacity(&self) -> usize {
        self.config.max_queues.max(1)
    }

    fn allocate_id(&mut self) -> QueueId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn set_current(&mut self, idx: usize) {
        let changed = self.current != Some(idx);
        self.current = Some(idx);
        self.detached_head = false;
        self.shuffle_enabled = self.queues[idx].is_shuffled();
        if changed {
            let id = Some(self.queues[idx].id());
            self.emit(BoardEvent::CurrentQueueChanged { id });
        }
    }

    fn set_shuffle_enabled(&mut self, enabled: bool) {
        self.shuffle_enabled = enabled;
        self.emit(BoardEvent::ShuffleChanged { enabled });
    }

    fn update(&mut self, idx: usize) {
        let record = self.queues[idx].to_record();
        self.with_persister_do(|p| p.update(record));
    }

    fn rewrite(&mut self, idx: usize) {
        let record = self.queues[idx].to_record();
        self.with_persister_do(|p| p.rewrite(record));
        self.emit_changed(idx);
    }

    fn emit_changed(&mut self, idx: usize) {
        let (id, length) = (self.queues[idx].id(), self.queues[idx].len());
        self.emit(BoardEvent::QueueChanged { id, length });
    }

    fn with_persister_do(&self, write: impl FnOnce(&Persister)) {
        if let Some(persister) = &self.persister {
            write(persister);
        }
    }

    fn emit(&mut self, event: BoardEvent) {
        self.pending_events.push(event);
    }
}

impl Default for QueueBoard {
    fn default() -> Self {
        Self::new(BoardConfig::default())
    }
}

/// Keep the first occurrence of every id
fn dedup_by_id(items: Vec<TrackRef>) -> Vec<TrackRef> {
    let mut seen = HashSet::new();
    items.into_iter().filter(|t| seen.insert(t.id.clone())).collect()
}
