//! Domain logic and core data structures
//!
//! This module contains pure per-frame logic that is independent
//! of rendering, file output and the landmark source.

pub mod capture;
pub mod core;
pub mod gesture;
pub mod smoothing;
