//! Air Canvas: freehand drawing driven by hand landmarks
//!
//! Turns a stream of 21-point hand landmark frames into gesture labels, a
//! smoothed cursor, stroke segments, snapshots and captures.

pub mod app;
pub mod config;
pub mod domain;
pub mod input;
pub mod ui;

pub use app::controller::{AppError, CanvasController};
pub use app::processor::{Effect, FrameEffects, FrameProcessor};
pub use domain::core::{Frame, HandLandmarks, Landmark, Point};
pub use domain::gesture::{Gesture, classify};
