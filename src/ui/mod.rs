//! Reference rendering and persistence collaborators
//!
//! Everything here executes effects produced by the frame processor:
//! tiny-skia surfaces for strokes and the skeleton overlay, ab_glyph text
//! for the status HUD, and on-disk output for captures and the gallery.

pub mod capture;
pub mod gallery;
pub mod hud;
pub mod overlay;
pub mod surface;

pub use capture::{CaptureError, CaptureExporter};
pub use gallery::{Snapshot, SnapshotGallery};
pub use hud::HudRenderer;
pub use overlay::OverlayRenderer;
pub use surface::{DrawingSurface, RenderError};
