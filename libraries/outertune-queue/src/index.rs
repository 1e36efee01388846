//! Index tracking across list reorders

/// Where a tracked element ends up after moving `from` to `to`
///
/// Matches `Vec::remove(from)` followed by `Vec::insert(to, _)`: the moved
/// element lands on `to`, elements strictly between the two shift one step
/// against the direction of the move, everything else stays put. Used for
/// both the board's current-queue pointer and a queue's current-track pointer.
pub fn index_after_move(tracked: usize, from: usize, to: usize) -> usize {
    if tracked == from {
        to
    } else if from < tracked && tracked <= to {
        tracked - 1
    } else if to <= tracked && tracked < from {
        tracked + 1
    } else {
        tracked
    }
}
