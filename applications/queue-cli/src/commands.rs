//! Command implementations
//!
//! Each command returns its rendered output so `main` only prints.

use crate::error::{CliError, Result};
use outertune_core::{QueueId, QueueRecord};
use outertune_queue::{BoardConfig, MultiQueue, Persister, QueueBoard};
use outertune_storage::{queues, SqlitePool, SqliteQueueRepository, StorageError};
use serde::Serialize;
use std::fmt::Write;
use std::sync::Arc;
use tracing::info;

/// One line of `list`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueSummary {
    pub id: QueueId,
    pub title: String,
    pub tracks: usize,
    pub position: Option<usize>,
    pub shuffled: bool,
    pub extension: bool,
}

/// One track of `show`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackLine {
    pub id: String,
    pub title: String,
    pub artist: Option<String>,
    pub duration_secs: u64,
    pub current: bool,
}

fn summarize(record: QueueRecord, board: &BoardConfig) -> QueueSummary {
    let queue = MultiQueue::from_record(record);
    QueueSummary {
        id: queue.id(),
        title: queue.base_title(&board.extension_suffix()).to_string(),
        tracks: queue.len(),
        position: queue.position(),
        shuffled: queue.is_shuffled(),
        extension: queue.is_extension(&board.extension_suffix()),
    }
}

/// Every stored queue, oldest first
pub async fn list(pool: &SqlitePool, board: &BoardConfig, json: bool) -> Result<String> {
    let summaries: Vec<QueueSummary> = queues::load_all(pool)
        .await?
        .into_iter()
        .map(|record| summarize(record, board))
        .collect();

    if json {
        return Ok(serde_json::to_string_pretty(&summaries)?);
    }

    let mut out = String::new();
    if summaries.is_empty() {
        out.push_str("No saved queues\n");
        return Ok(out);
    }
    for summary in &summaries {
        let position = summary
            .position
            .map_or_else(|| "-".to_string(), |pos| (pos + 1).to_string());
        let _ = writeln!(
            out,
            "{:>4}  {}{}  [{}/{}]{}",
            summary.id,
            summary.title,
            if summary.extension { " (+)" } else { "" },
            position,
            summary.tracks,
            if summary.shuffled { " shuffled" } else { "" },
        );
    }
    Ok(out)
}

/// Tracks of one queue in play order
pub async fn show(pool: &SqlitePool, id: QueueId, json: bool) -> Result<String> {
    let record = queues::get_by_id(pool, id)
        .await?
        .ok_or(CliError::QueueNotFound(id))?;
    let queue = MultiQueue::from_record(record);

    let lines: Vec<TrackLine> = queue
        .active()
        .iter()
        .enumerate()
        .map(|(i, track)| TrackLine {
            id: track.id.clone(),
            title: track.title.clone(),
            artist: track.artist.clone(),
            duration_secs: track.duration.as_secs(),
            current: queue.position() == Some(i),
        })
        .collect();

    if json {
        return Ok(serde_json::to_string_pretty(&lines)?);
    }

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} ({} tracks{})",
        queue.title(),
        queue.len(),
        if queue.is_shuffled() { ", shuffled" } else { "" }
    );
    for (i, line) in lines.iter().enumerate() {
        let _ = writeln!(
            out,
            "{} {:>3}. {}{} ({}:{:02})",
            if line.current { ">" } else { " " },
            i + 1,
            line.title,
            line.artist
                .as_deref()
                .map(|artist| format!(" - {}", artist))
                .unwrap_or_default(),
            line.duration_secs / 60,
            line.duration_secs % 60,
        );
    }
    Ok(out)
}

/// Delete one stored queue
pub async fn delete(pool: &SqlitePool, id: QueueId) -> Result<()> {
    match queues::delete_existing(pool, id).await {
        Ok(()) => {
            info!(id, "Deleted queue");
            Ok(())
        }
        Err(StorageError::NotFound { .. }) => Err(CliError::QueueNotFound(id)),
        Err(e) => Err(e.into()),
    }
}

/// Shrink the stored board to the `keep` most recently used queues
///
/// Rehydrates a board capped at `keep`, which deletes the overflow, then
/// flushes it. Returns how many queues were removed.
pub async fn prune(pool: &SqlitePool, board: &BoardConfig, keep: usize) -> Result<usize> {
    if keep == 0 {
        return Err(CliError::InvalidArgument("--keep must be at least 1".to_string()));
    }

    let before = queues::count(pool).await?;

    let repository = Arc::new(SqliteQueueRepository::new(pool.clone()));
    let persister = Persister::new(repository)?;
    let config = BoardConfig {
        max_queues: keep,
        persist: true,
        ..board.clone()
    };
    let mut queue_board = QueueBoard::with_persister(config, persister);
    let kept = queue_board.rehydrate().await?;
    queue_board.shutdown().await;

    let removed = usize::try_from(before).unwrap_or(0).saturating_sub(kept);
    info!(kept, removed, "Pruned queue board");
    Ok(removed)
}
