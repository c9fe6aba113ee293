//! Frame input from outside the core
//!
//! The live pose estimator is an external collaborator; recordings of its
//! output are read here and validated before replay.

pub mod recording;

pub use recording::{RecordedEvent, RecordingError, RecordingReader, ReplayEvent};
