//! OuterTune Storage
//!
//! `SQLite` persistence for the queue board.
//!
//! Each queue is one row in `queues` plus one row per track in
//! `queue_tracks`. Tracks are stored in insertion order and carry their slot
//! in the shuffled order, so both orders survive a restart.
//!
//! # Example
//!
//! ```rust,no_run
//! use outertune_core::QueueRepository;
//! use outertune_storage::{create_pool, run_migrations, SqliteQueueRepository};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = create_pool("sqlite://outertune.db").await?;
//! run_migrations(&pool).await?;
//!
//! let repository = SqliteQueueRepository::new(pool);
//! let queues = repository.load_all().await?;
//! println!("{} saved queues", queues.len());
//! # Ok(())
//! # }
//! ```

mod context;
mod error;

pub mod queues;

pub use context::SqliteQueueRepository;
pub use error::{Result, StorageError};
pub use sqlx::SqlitePool;

use sqlx::migrate::Migrator;
use tracing::{debug, info};

// Embed migrations into binary
static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Run database migrations
///
/// Call once at startup, before the board is rehydrated.
pub async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    MIGRATOR.run(pool).await?;
    debug!("Queue migrations applied");
    Ok(())
}

/// Create a new `SQLite` pool
///
/// # Arguments
///
/// * `database_url` - `SQLite` connection string (e.g. `sqlite://outertune.db`)
pub async fn create_pool(database_url: &str) -> Result<SqlitePool> {
    use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
    use std::str::FromStr;

    info!(database_url, "Opening queue database");

    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true)
        .journal_mode(SqliteJournalMode::Wal)
        // Persistence tasks run concurrently, wait for locks instead of failing
        .busy_timeout(std::time::Duration::from_secs(30));

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    Ok(pool)
}
