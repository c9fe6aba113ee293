//! Configuration module for air-canvas
//!
//! Holds the brush palette and the TOML-backed runtime settings shared
//! between the frame processor, the rendering adapter and the CLI.

pub mod brush;
pub mod settings;

pub use brush::{Brush, BrushColor, BrushError, BrushSettings, Palette};
pub use settings::{AppConfig, ConfigError, TrackingConfig};
