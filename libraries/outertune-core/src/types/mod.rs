mod queue_record;
mod track;

pub use queue_record::{QueueId, QueueRecord};
pub use track::{TrackLocation, TrackRef};
