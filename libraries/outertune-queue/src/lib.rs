//! OuterTune - Queue Management
//!
//! Platform-agnostic management of multiple named play queues.
//!
//! This crate provides:
//! - A board of up to 20 named queues, ordered by recency of use
//! - Add/merge semantics keyed by queue title (jump, replace, delta merge,
//!   extension queues)
//! - Shuffle/unshuffle that keeps the current track playing
//! - Reordering that keeps the "current" pointer on the same item
//! - Seamless reloads of the player timeline
//! - Write-through persistence dispatched as background tasks
//!
//! # Architecture
//!
//! `outertune-queue` does not know about any media framework or database:
//! - The player is reached through [`PlaybackSink`](outertune_core::PlaybackSink)
//! - Storage is reached through [`QueueRepository`](outertune_core::QueueRepository)
//!
//! # Example
//!
//! ```rust
//! use outertune_core::TrackRef;
//! use outertune_queue::{AddQueueRequest, BoardConfig, QueueBoard};
//! use std::time::Duration;
//!
//! let mut board = QueueBoard::new(BoardConfig::default());
//! let tracks: Vec<TrackRef> = ["a", "b", "c"]
//!     .iter()
//!     .map(|id| TrackRef::new(*id, id.to_uppercase(), Duration::from_secs(200)))
//!     .collect();
//!
//! let outcome = board.add_queue(AddQueueRequest::new("Mix", tracks.clone()));
//! assert!(outcome.needs_reload());
//!
//! // Submitting the same content again only moves the position
//! let again = board.add_queue(AddQueueRequest::new("Mix", tracks).start_index(2));
//! assert!(!again.needs_reload());
//! assert_eq!(board.current_queue().unwrap().position(), Some(2));
//! ```

mod board;
mod error;
pub mod events;
mod index;
mod memory;
mod persist;
mod queue;
mod shuffle;
mod sync;
pub mod types;

// Public exports
pub use board::QueueBoard;
pub use error::{QueueError, Result};
pub use events::BoardEvent;
pub use index::index_after_move;
pub use memory::MemoryRepository;
pub use persist::Persister;
pub use queue::MultiQueue;
pub use sync::{sync_sink, SinkSync};
pub use types::{AddOutcome, AddQueueRequest, BoardConfig, EXTENSION_MARKER, MAX_QUEUES};
