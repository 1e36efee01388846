//! Queue persistence
//!
//! Free functions over a pool, one per repository operation. Multi-row
//! writes run in a transaction so a queue is never stored half-written.

use crate::{Result, StorageError};
use outertune_core::{QueueId, QueueRecord, TrackLocation, TrackRef};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteConnection, SqlitePool};
use std::collections::{HashMap, VecDeque};
use std::time::Duration;
use tracing::{debug, warn};

/// Load every stored queue, ordered by display index
pub async fn load_all(pool: &SqlitePool) -> Result<Vec<QueueRecord>> {
    let rows = sqlx::query(
        "SELECT id, title, is_shuffled, queue_pos, display_index, continuation
         FROM queues
         ORDER BY display_index, id",
    )
    .fetch_all(pool)
    .await?;

    let track_rows = sqlx::query(
        "SELECT queue_id, position, shuffled_position, track_id, title, artist,
                duration_ms, location_kind, location
         FROM queue_tracks
         ORDER BY queue_id, position",
    )
    .fetch_all(pool)
    .await?;

    let mut tracks_by_queue: HashMap<QueueId, Vec<(i64, TrackRef)>> = HashMap::new();
    for row in &track_rows {
        let queue_id: QueueId = row.try_get("queue_id")?;
        let shuffled_position: i64 = row.try_get("shuffled_position")?;
        tracks_by_queue
            .entry(queue_id)
            .or_default()
            .push((shuffled_position, track_from_row(row)?));
    }

    let mut records = Vec::with_capacity(rows.len());
    for row in &rows {
        let id: QueueId = row.try_get("id")?;
        let tracks = tracks_by_queue.remove(&id).unwrap_or_default();
        records.push(queue_from_row(row, tracks)?);
    }

    debug!(count = records.len(), "Loaded stored queues");
    Ok(records)
}

/// Load one queue
pub async fn get_by_id(pool: &SqlitePool, id: QueueId) -> Result<Option<QueueRecord>> {
    let Some(row) = sqlx::query(
        "SELECT id, title, is_shuffled, queue_pos, display_index, continuation
         FROM queues
         WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    else {
        return Ok(None);
    };

    let track_rows = sqlx::query(
        "SELECT queue_id, position, shuffled_position, track_id, title, artist,
                duration_ms, location_kind, location
         FROM queue_tracks
         WHERE queue_id = ?
         ORDER BY position",
    )
    .bind(id)
    .fetch_all(pool)
    .await?;

    let tracks = track_rows
        .iter()
        .map(|row| Ok((row.try_get::<i64, _>("shuffled_position")?, track_from_row(row)?)))
        .collect::<Result<Vec<_>>>()?;

    Ok(Some(queue_from_row(&row, tracks)?))
}

/// Number of stored queues
pub async fn count(pool: &SqlitePool) -> Result<i64> {
    let row = sqlx::query("SELECT COUNT(*) AS count FROM queues")
        .fetch_one(pool)
        .await?;
    Ok(row.try_get("count")?)
}

/// Insert or overwrite a queue together with its tracks
pub async fn save(pool: &SqlitePool, record: &QueueRecord) -> Result<()> {
    let mut tx = pool.begin().await?;
    write_queue(&mut tx, record).await?;
    tx.commit().await?;
    Ok(())
}

/// Insert or overwrite many queues in a single transaction
pub async fn save_all(pool: &SqlitePool, records: &[QueueRecord]) -> Result<()> {
    let mut tx = pool.begin().await?;
    for record in records {
        write_queue(&mut tx, record).await?;
    }
    tx.commit().await?;
    Ok(())
}

/// Update title, shuffle flag, position, display index and continuation
///
/// Tracks are left alone. Unknown ids are ignored.
pub async fn update_metadata(pool: &SqlitePool, record: &QueueRecord) -> Result<()> {
    let result = sqlx::query(
        "UPDATE queues
         SET title = ?, is_shuffled = ?, queue_pos = ?, display_index = ?, continuation = ?
         WHERE id = ?",
    )
    .bind(&record.title)
    .bind(record.is_shuffled)
    .bind(record.queue_pos)
    .bind(record.index)
    .bind(&record.continuation)
    .bind(record.id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        debug!(queue_id = record.id, "Metadata update for unknown queue ignored");
    }
    Ok(())
}

/// Delete a queue and its tracks
pub async fn delete(pool: &SqlitePool, id: QueueId) -> Result<()> {
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM queue_tracks WHERE queue_id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    sqlx::query("DELETE FROM queues WHERE id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(())
}

/// Delete a queue, failing when it does not exist
pub async fn delete_existing(pool: &SqlitePool, id: QueueId) -> Result<()> {
    if get_by_id(pool, id).await?.is_none() {
        return Err(StorageError::not_found("Queue", id.to_string()));
    }
    delete(pool, id).await
}

async fn write_queue(conn: &mut SqliteConnection, record: &QueueRecord) -> Result<()> {
    let shuffled_positions = shuffled_positions(record);
    let is_shuffled = record.is_shuffled && shuffled_positions.is_some();
    if record.is_shuffled && !is_shuffled {
        warn!(queue_id = record.id, "Shuffled order does not match tracks, storing unshuffled");
    }

    sqlx::query(
        "INSERT INTO queues (id, title, is_shuffled, queue_pos, display_index, continuation)
         VALUES (?, ?, ?, ?, ?, ?)
         ON CONFLICT(id) DO UPDATE SET
            title = excluded.title,
            is_shuffled = excluded.is_shuffled,
            queue_pos = excluded.queue_pos,
            display_index = excluded.display_index,
            continuation = excluded.continuation",
    )
    .bind(record.id)
    .bind(&record.title)
    .bind(is_shuffled)
    .bind(record.queue_pos)
    .bind(record.index)
    .bind(&record.continuation)
    .execute(&mut *conn)
    .await?;

    sqlx::query("DELETE FROM queue_tracks WHERE queue_id = ?")
        .bind(record.id)
        .execute(&mut *conn)
        .await?;

    for (position, track) in record.tracks.iter().enumerate() {
        let shuffled_position = shuffled_positions
            .as_ref()
            .map_or(position, |positions| positions[position]);

        sqlx::query(
            "INSERT INTO queue_tracks
                (queue_id, position, shuffled_position, track_id, title, artist,
                 duration_ms, location_kind, location)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(record.id)
        .bind(position as i64)
        .bind(shuffled_position as i64)
        .bind(&track.id)
        .bind(&track.title)
        .bind(&track.artist)
        .bind(i64::try_from(track.duration.as_millis()).unwrap_or(i64::MAX))
        .bind(track.location.kind())
        .bind(track.location.value())
        .execute(&mut *conn)
        .await?;
    }

    debug!(queue_id = record.id, tracks = record.tracks.len(), "Queue written");
    Ok(())
}

/// Slot of every insertion-order track in the shuffled order
///
/// Duplicate ids are matched first-come first-served. `None` when the
/// shuffled list is not a permutation of the tracks.
fn shuffled_positions(record: &QueueRecord) -> Option<Vec<usize>> {
    if record.shuffled.len() != record.tracks.len() {
        return None;
    }

    let mut slots: HashMap<&str, VecDeque<usize>> = HashMap::new();
    for (position, track) in record.tracks.iter().enumerate() {
        slots.entry(track.id.as_str()).or_default().push_back(position);
    }

    let mut positions = vec![0; record.tracks.len()];
    for (shuffled_position, track) in record.shuffled.iter().enumerate() {
        let position = slots.get_mut(track.id.as_str())?.pop_front()?;
        positions[position] = shuffled_position;
    }
    Some(positions)
}

fn track_from_row(row: &SqliteRow) -> Result<TrackRef> {
    let duration_ms: i64 = row.try_get("duration_ms")?;
    let kind: String = row.try_get("location_kind")?;

    Ok(TrackRef {
        id: row.try_get("track_id")?,
        title: row.try_get("title")?,
        artist: row.try_get("artist")?,
        duration: Duration::from_millis(u64::try_from(duration_ms).unwrap_or(0)),
        location: TrackLocation::from_parts(&kind, row.try_get("location")?),
    })
}

fn queue_from_row(row: &SqliteRow, mut tracks: Vec<(i64, TrackRef)>) -> Result<QueueRecord> {
    let id: QueueId = row.try_get("id")?;
    let queue_pos: i64 = row.try_get("queue_pos")?;
    let index: i64 = row.try_get("display_index")?;

    let insertion_order: Vec<TrackRef> = tracks.iter().map(|(_, track)| track.clone()).collect();
    tracks.sort_by_key(|(shuffled_position, _)| *shuffled_position);
    let shuffled: Vec<TrackRef> = tracks.into_iter().map(|(_, track)| track).collect();

    Ok(QueueRecord {
        id,
        title: row.try_get("title")?,
        tracks: insertion_order,
        shuffled,
        is_shuffled: row.try_get("is_shuffled")?,
        queue_pos: i32::try_from(queue_pos)
            .map_err(|_| StorageError::InvalidData(format!("queue {} position {}", id, queue_pos)))?,
        index: i32::try_from(index)
            .map_err(|_| StorageError::InvalidData(format!("queue {} index {}", id, index)))?,
        continuation: row.try_get("continuation")?,
    })
}
