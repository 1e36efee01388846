//! OuterTune Core
//!
//! Platform-agnostic types, traits, and error handling shared by the queue
//! engine and its storage backends.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `TrackRef`, `TrackLocation`, `QueueRecord`
//! - **Collaborator Traits**: `QueueRepository` (persistent storage) and
//!   `PlaybackSink` (the media player timeline)
//! - **Error Handling**: Unified `CoreError` and `Result` types
//!
//! # Example
//!
//! ```rust
//! use outertune_core::{QueueRecord, TrackRef};
//! use std::time::Duration;
//!
//! let track = TrackRef::remote("dQw4w9WgXcQ", "Song", Duration::from_secs(212), "https://example.com/a");
//! let record = QueueRecord::new(1, "Mix", vec![track]);
//!
//! assert_eq!(record.queue_pos, 0);
//! assert!(!record.is_shuffled);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod traits;
pub mod types;

pub use error::{CoreError, Result};
pub use traits::{PlaybackSink, QueueRepository};
pub use types::{QueueId, QueueRecord, TrackLocation, TrackRef};
