pub mod fixtures;
pub mod recording_sink;
