//! Player timeline synchronization tests

mod common;

use common::{tracks, RecordingSink, SinkOp};
use outertune_queue::{sync_sink, AddQueueRequest, QueueBoard, SinkSync};

fn board_with(items: &[&str], pos: usize) -> QueueBoard {
    let mut board = QueueBoard::default();
    board.add_queue(AddQueueRequest::new("Mix", tracks(items)));
    board.set_curr_queue_pos(pos).unwrap();
    board
}

#[test]
fn test_seamless_at_queue_start() {
    let board = board_with(&["A", "B", "C"], 0);
    let mut sink = RecordingSink::playing(tracks(&["X", "A", "Y", "Z"]), 1);

    let result = sync_sink(board.current_queue().unwrap(), &mut sink, true);

    assert_eq!(result, SinkSync::Seamless { position: 0 });
    assert!(!sink.was_reset());
    assert_eq!(sink.item_ids(), vec!["A", "B", "C"]);
    assert_eq!(sink.current, Some(0));
    assert_eq!(
        sink.ops,
        vec![
            SinkOp::Remove { start: 2, end: 4 },
            SinkOp::Remove { start: 0, end: 1 },
            SinkOp::Add { index: 1, count: 2 },
        ]
    );
}

#[test]
fn test_seamless_mid_queue() {
    let board = board_with(&["A", "B", "C", "D"], 2);
    let mut sink = RecordingSink::playing(tracks(&["P", "C", "Q"]), 1);

    let result = sync_sink(board.current_queue().unwrap(), &mut sink, true);

    assert_eq!(result, SinkSync::Seamless { position: 2 });
    assert_eq!(sink.item_ids(), vec!["A", "B", "C", "D"]);
    assert_eq!(sink.current, Some(2));
    // The playing slot is never part of an edited range
    for op in &sink.ops {
        if let SinkOp::Replace { start, end, .. } = op {
            assert!(!(*start..*end).contains(&1));
        }
    }
}

#[test]
fn test_seamless_when_player_is_alone() {
    let board = board_with(&["A", "B", "C"], 1);
    let mut sink = RecordingSink::playing(tracks(&["B"]), 0);

    let result = sync_sink(board.current_queue().unwrap(), &mut sink, false);

    assert_eq!(result.position(), Some(1));
    assert_eq!(sink.item_ids(), vec!["A", "B", "C"]);
    assert_eq!(sink.current, Some(1));
}

#[test]
fn test_different_track_replaces_timeline_and_seeks() {
    let board = board_with(&["A", "B", "C", "D"], 2);
    let mut sink = RecordingSink::playing(tracks(&["X", "Y"]), 0);

    let result = sync_sink(board.current_queue().unwrap(), &mut sink, true);

    assert_eq!(result, SinkSync::Replaced { position: Some(2) });
    assert_eq!(sink.ops, vec![SinkOp::SetItems(4), SinkOp::Seek(2)]);
    assert_eq!(sink.current, Some(2));
}

#[test]
fn test_replace_without_auto_seek() {
    let board = board_with(&["A", "B"], 1);
    let mut sink = RecordingSink::default();

    let result = sync_sink(board.current_queue().unwrap(), &mut sink, false);

    assert_eq!(result, SinkSync::Replaced { position: Some(1) });
    assert_eq!(sink.ops, vec![SinkOp::SetItems(2)]);
}

#[test]
fn test_set_curr_queue_switches_and_syncs() {
    let mut board = QueueBoard::default();
    board.add_queue(AddQueueRequest::new("First", tracks(&["A", "B"])));
    board.add_queue(AddQueueRequest::new("Second", tracks(&["C", "D"])));
    let first = board.find_by_title("First").unwrap();

    let mut sink = RecordingSink::playing(tracks(&["C", "D"]), 0);
    let result = board.set_curr_queue(first, &mut sink, true).unwrap();

    assert!(matches!(result, SinkSync::Replaced { .. }));
    assert_eq!(board.current_queue().unwrap().title(), "First");
    assert_eq!(board.current_index(), Some(1));
    assert_eq!(sink.item_ids(), vec!["A", "B"]);
}

#[test]
fn test_set_curr_queue_missing_index() {
    let mut board = QueueBoard::default();
    let mut sink = RecordingSink::default();
    assert!(board.set_curr_queue(0, &mut sink, true).is_err());
    assert!(sink.ops.is_empty());
}
