//! Write-through persistence tests
//!
//! Run the board against the in-memory repository and wait for background
//! writes with `Persister::settle`.

mod common;

use common::{ids, tracks};
use outertune_core::{QueueRecord, QueueRepository};
use outertune_queue::{
    AddQueueRequest, BoardConfig, MemoryRepository, Persister, QueueBoard, QueueError,
};
use std::sync::Arc;

fn record(id: i64, title: &str, index: i32, items: &[&str]) -> QueueRecord {
    let mut record = QueueRecord::new(id, title, tracks(items));
    record.index = index;
    record
}

async fn board_over(repository: Arc<MemoryRepository>) -> QueueBoard {
    let persister = Persister::new(repository).unwrap();
    let mut board = QueueBoard::with_persister(BoardConfig::default(), persister);
    board.rehydrate().await.unwrap();
    board
}

async fn settle(board: &QueueBoard) {
    board.persister().unwrap().settle().await;
}

async fn stored(repository: &MemoryRepository, title: &str) -> QueueRecord {
    repository
        .load_all()
        .await
        .unwrap()
        .into_iter()
        .find(|r| r.title == title)
        .unwrap()
}

#[tokio::test]
async fn test_created_queue_is_stored() {
    let repository = Arc::new(MemoryRepository::new());
    let mut board = board_over(repository.clone()).await;

    board.add_queue(AddQueueRequest::new("Mix", tracks(&["A", "B", "C"])).radio("RDAMVMA"));
    settle(&board).await;

    let stored = repository.load_all().await.unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].title, "Mix");
    assert_eq!(ids(&stored[0].tracks), vec!["A", "B", "C"]);
    assert_eq!(stored[0].queue_pos, 0);
    assert_eq!(stored[0].continuation.as_deref(), Some("RDAMVMA"));
}

#[tokio::test]
async fn test_position_and_contents_follow_board() {
    let repository = Arc::new(MemoryRepository::new());
    let mut board = board_over(repository.clone()).await;
    board.add_queue(AddQueueRequest::new("Mix", tracks(&["A", "B", "C"])));
    settle(&board).await;

    board.set_curr_queue_pos(2).unwrap();
    settle(&board).await;
    board.add_songs_to_queue(0, tracks(&["D"]), None).unwrap();
    settle(&board).await;

    let stored = repository.load_all().await.unwrap();
    assert_eq!(stored[0].queue_pos, 2);
    assert_eq!(ids(&stored[0].tracks), vec!["A", "B", "C", "D"]);
}

#[tokio::test]
async fn test_shuffle_is_stored() {
    let repository = Arc::new(MemoryRepository::new());
    let mut board = board_over(repository.clone()).await;
    board.add_queue(AddQueueRequest::new("Mix", tracks(&["A", "B", "C", "D"])));
    settle(&board).await;

    board.shuffle_current(true).unwrap();
    settle(&board).await;

    let stored = repository.load_all().await.unwrap();
    assert!(stored[0].is_shuffled);
    assert_eq!(stored[0].shuffled[0].id, "A");
    assert_eq!(ids(&stored[0].tracks), vec!["A", "B", "C", "D"]);
}

#[tokio::test]
async fn test_bypassed_shuffle_leaves_stored_queue_alone() {
    let repository = Arc::new(MemoryRepository::new());
    let mut board = board_over(repository.clone()).await;
    board.add_queue(AddQueueRequest::new("Mix", tracks(&["A", "B", "C", "D", "E"])).start_index(3));
    board.add_queue(AddQueueRequest::new("Other", tracks(&["F"])));
    settle(&board).await;
    let before = stored(&repository, "Mix").await;

    let index = board.shuffle(0, true, true).unwrap();
    settle(&board).await;

    assert_eq!(index, 1);
    assert_eq!(board.queue(1).unwrap().current_track().unwrap().id, "D");
    assert_eq!(stored(&repository, "Mix").await, before);
    assert!(!before.is_shuffled);
    assert_eq!(before.queue_pos, 3);
    assert_eq!(stored(&repository, "Other").await.index, 0);
}

#[tokio::test]
async fn test_switching_queue_stores_new_order() {
    let repository = Arc::new(MemoryRepository::new());
    let mut board = board_over(repository.clone()).await;
    board.add_queue(AddQueueRequest::new("Mix", tracks(&["A", "B"])));
    board.add_queue(AddQueueRequest::new("Other", tracks(&["C"])));
    settle(&board).await;

    let mut sink = common::RecordingSink::default();
    board.set_curr_queue(0, &mut sink, true).unwrap();
    settle(&board).await;

    assert_eq!(stored(&repository, "Other").await.index, 0);
    assert_eq!(stored(&repository, "Mix").await.index, 1);
}

#[tokio::test]
async fn test_deleted_queue_leaves_storage() {
    let repository = Arc::new(MemoryRepository::new());
    let mut board = board_over(repository.clone()).await;
    board.add_queue(AddQueueRequest::new("One", tracks(&["A"])));
    board.add_queue(AddQueueRequest::new("Two", tracks(&["B"])));
    settle(&board).await;

    board.delete_queue(0).unwrap();
    settle(&board).await;

    let stored = repository.load_all().await.unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].title, "Two");
    assert_eq!(stored[0].index, 0);
}

#[tokio::test]
async fn test_rehydrate_restores_recency_order() {
    let repository = Arc::new(MemoryRepository::with_records([
        record(4, "Newest", 2, &["C"]),
        record(2, "Oldest", 0, &["A"]),
        record(7, "Middle", 1, &["B"]),
    ]));

    let mut board = board_over(repository.clone()).await;

    let titles: Vec<&str> = board.queues().iter().map(|q| q.title()).collect();
    assert_eq!(titles, vec!["Oldest", "Middle", "Newest"]);
    assert_eq!(board.current_queue().unwrap().title(), "Newest");
    assert!(board.is_initialized());

    // Ids continue after the highest stored one
    board.add_queue(AddQueueRequest::new("Fresh", tracks(&["D"])));
    assert_eq!(board.current_queue().unwrap().id(), 8);
}

#[tokio::test]
async fn test_rehydrate_drops_overflow() {
    let records: Vec<QueueRecord> = (0..23)
        .map(|i| record(i + 1, &format!("Queue {}", i), i as i32, &["A"]))
        .collect();
    let repository = Arc::new(MemoryRepository::with_records(records));

    let board = board_over(repository.clone()).await;
    settle(&board).await;

    assert_eq!(board.len(), 20);
    assert_eq!(board.queue(0).unwrap().title(), "Queue 3");

    let stored = repository.load_all().await.unwrap();
    assert_eq!(stored.len(), 20);
    assert!(stored.iter().all(|r| r.title != "Queue 0"));
    let indexes: Vec<i32> = stored.iter().map(|r| r.index).collect();
    assert_eq!(indexes, (0..20).collect::<Vec<_>>());
}

#[tokio::test]
async fn test_rehydrate_repairs_bad_shuffle_state() {
    let mut broken = record(1, "Broken", 0, &["A", "B"]);
    broken.is_shuffled = true;
    broken.shuffled = tracks(&["A", "Z"]);
    broken.queue_pos = 9;
    let repository = Arc::new(MemoryRepository::with_records([broken]));

    let board = board_over(repository).await;

    let queue = board.current_queue().unwrap();
    assert!(!queue.is_shuffled());
    assert_eq!(ids(queue.active()), vec!["A", "B"]);
    assert!(queue.position().is_some_and(|pos| pos < 2));
}

#[tokio::test]
async fn test_shutdown_saves_everything() {
    let repository = Arc::new(MemoryRepository::new());
    let persister = Persister::new(repository.clone()).unwrap();
    let mut board = QueueBoard::with_persister(BoardConfig::default(), persister);
    board.rehydrate().await.unwrap();

    repository.fail_writes(true);
    board.add_queue(AddQueueRequest::new("One", tracks(&["A"])));
    board.add_queue(AddQueueRequest::new("Two", tracks(&["B", "C"])));
    settle(&board).await;
    assert!(repository.load_all().await.unwrap().is_empty());

    repository.fail_writes(false);
    board.shutdown().await;

    let stored = repository.load_all().await.unwrap();
    assert_eq!(stored.len(), 2);
    assert_eq!(stored[1].title, "Two");
    assert_eq!(ids(&stored[1].tracks), vec!["B", "C"]);
}

#[tokio::test]
async fn test_failed_writes_leave_board_usable() {
    let repository = Arc::new(MemoryRepository::new());
    repository.fail_writes(true);
    let mut board = board_over(repository.clone()).await;

    let outcome = board.add_queue(AddQueueRequest::new("Mix", tracks(&["A", "B"])));
    board.set_curr_queue_pos(1).unwrap();
    settle(&board).await;

    assert!(outcome.needs_reload());
    assert_eq!(board.current_queue().unwrap().position(), Some(1));
    assert!(repository.load_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_persistence_switched_off() {
    let repository = Arc::new(MemoryRepository::new());
    let persister = Persister::new(repository.clone()).unwrap();
    let config = BoardConfig {
        persist: false,
        ..Default::default()
    };
    let mut board = QueueBoard::with_persister(config, persister);

    assert!(board.persister().is_none());
    assert!(matches!(
        board.rehydrate().await,
        Err(QueueError::PersistenceDisabled)
    ));

    board.add_queue(AddQueueRequest::new("Mix", tracks(&["A"])));
    assert!(repository.load_all().await.unwrap().is_empty());
}
