//! Track references held by queues

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Where the playable bytes of a track live
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum TrackLocation {
    /// Streamed from the remote backend
    Remote {
        /// Stream or watch URL
        url: String,
    },

    /// File in the local library or download cache
    Local {
        /// Absolute path on disk
        path: PathBuf,
    },

    /// Not resolved yet (fetched lazily by the player)
    Unresolved,
}

impl TrackLocation {
    /// Storage discriminator
    pub fn kind(&self) -> &'static str {
        match self {
            TrackLocation::Remote { .. } => "remote",
            TrackLocation::Local { .. } => "local",
            TrackLocation::Unresolved => "unresolved",
        }
    }

    /// Storage payload (URL or path), if any
    pub fn value(&self) -> Option<String> {
        match self {
            TrackLocation::Remote { url } => Some(url.clone()),
            TrackLocation::Local { path } => Some(path.to_string_lossy().into_owned()),
            TrackLocation::Unresolved => None,
        }
    }

    /// Rebuild a location from its storage discriminator and payload
    ///
    /// Unknown kinds or a missing payload degrade to `Unresolved`.
    pub fn from_parts(kind: &str, value: Option<String>) -> Self {
        match (kind, value) {
            ("remote", Some(url)) => TrackLocation::Remote { url },
            ("local", Some(path)) => TrackLocation::Local {
                path: PathBuf::from(path),
            },
            _ => TrackLocation::Unresolved,
        }
    }
}

/// Minimal identity plus playable metadata for one track
///
/// The same track id may sit in several queues at once; the queue engine only
/// ever compares tracks by id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackRef {
    /// Backend video id or local library id
    pub id: String,

    /// Display title
    pub title: String,

    /// Display artist (optional)
    pub artist: Option<String>,

    /// Track duration
    pub duration: Duration,

    /// Source of the playable media
    pub location: TrackLocation,
}

impl TrackRef {
    /// Create a track with an unresolved location
    pub fn new(id: impl Into<String>, title: impl Into<String>, duration: Duration) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            artist: None,
            duration,
            location: TrackLocation::Unresolved,
        }
    }

    /// Create a streamed track
    pub fn remote(
        id: impl Into<String>,
        title: impl Into<String>,
        duration: Duration,
        url: impl Into<String>,
    ) -> Self {
        Self {
            location: TrackLocation::Remote { url: url.into() },
            ..Self::new(id, title, duration)
        }
    }

    /// Create a local-file track
    pub fn local(
        id: impl Into<String>,
        title: impl Into<String>,
        duration: Duration,
        path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            location: TrackLocation::Local { path: path.into() },
            ..Self::new(id, title, duration)
        }
    }

    /// Set the display artist
    #[must_use]
    pub fn with_artist(mut self, artist: impl Into<String>) -> Self {
        self.artist = Some(artist.into());
        self
    }

    /// Identity comparison used throughout the queue engine
    pub fn same_track(&self, other: &TrackRef) -> bool {
        self.id == other.id
    }
}
