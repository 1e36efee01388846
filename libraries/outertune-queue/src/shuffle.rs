//! Shuffle for queue randomization
//!
//! Fisher-Yates via `rand`, with an optional pinned track kept at the front.

use outertune_core::TrackRef;
use rand::seq::SliceRandom;
use rand::thread_rng;

/// Shuffle tracks in place
///
/// When `pinned` names an index of the input, the track at that index is
/// moved to the front after the permutation. Out-of-range pins are ignored.
pub fn shuffle_tracks(tracks: &mut Vec<TrackRef>, pinned: Option<usize>) {
    if tracks.len() < 2 {
        return;
    }

    let pinned_id = pinned
        .and_then(|index| tracks.get(index))
        .map(|track| track.id.clone());

    let mut rng = thread_rng();
    tracks.shuffle(&mut rng);

    if let Some(id) = pinned_id {
        pin_to_front(tracks, &id);
    }
}

/// Move the first track with `id` to index 0
fn pin_to_front(tracks: &mut Vec<TrackRef>, id: &str) {
    if let Some(pos) = tracks.iter().position(|track| track.id == id) {
        let track = tracks.remove(pos);
        tracks.insert(0, track);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::time::Duration;

    fn create_test_track(id: &str) -> TrackRef {
        TrackRef::new(id, format!("Track {}", id), Duration::from_secs(180))
    }

    fn ids(tracks: &[TrackRef]) -> Vec<String> {
        tracks.iter().map(|t| t.id.clone()).collect()
    }

    #[test]
    fn shuffle_preserves_all_tracks() {
        let mut tracks: Vec<TrackRef> = (0..10).map(|i| create_test_track(&i.to_string())).collect();

        shuffle_tracks(&mut tracks, None);

        let unique: HashSet<String> = ids(&tracks).into_iter().collect();
        assert_eq!(tracks.len(), 10);
        assert_eq!(unique.len(), 10);
    }

    #[test]
    fn shuffle_changes_order() {
        let mut tracks: Vec<TrackRef> = (0..12).map(|i| create_test_track(&i.to_string())).collect();
        let original = ids(&tracks);

        shuffle_tracks(&mut tracks, None);

        // 1 in 12! chance of a false failure
        assert_ne!(original, ids(&tracks));
    }

    #[test]
    fn pinned_track_goes_first() {
        for pin in 0..5 {
            let mut tracks: Vec<TrackRef> = (0..5).map(|i| create_test_track(&i.to_string())).collect();
            shuffle_tracks(&mut tracks, Some(pin));
            assert_eq!(tracks[0].id, pin.to_string());
        }
    }

    #[test]
    fn out_of_range_pin_is_ignored() {
        let mut tracks: Vec<TrackRef> = (0..3).map(|i| create_test_track(&i.to_string())).collect();
        shuffle_tracks(&mut tracks, Some(7));
        assert_eq!(tracks.len(), 3);
    }

    #[test]
    fn shuffle_empty_and_single() {
        let mut empty: Vec<TrackRef> = vec![];
        shuffle_tracks(&mut empty, Some(0));
        assert!(empty.is_empty());

        let mut single = vec![create_test_track("1")];
        shuffle_tracks(&mut single, Some(0));
        assert_eq!(single[0].id, "1");
    }
}
