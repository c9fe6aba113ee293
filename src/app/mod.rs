//! Application orchestration layer
//!
//! This module coordinates between input, domain and UI layers.
//! It owns the stroke state machine and the per-frame processor.

pub mod cli;
pub mod controller;
pub mod processor;
pub mod replay;
pub mod state;
