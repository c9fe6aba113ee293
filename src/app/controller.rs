//! Application controller and effect adapter
//!
//! The controller owns the frame processor together with the concrete
//! rendering and persistence collaborators, and executes each frame's
//! effects against them. Failures of a single capture or snapshot are
//! logged and surfaced in the status board; they never touch stroke state.

use std::path::PathBuf;

use tracing::{debug, info, warn};

use crate::app::processor::{Effect, FrameEffects, FrameProcessor, StatusKind};
use crate::config::{AppConfig, BrushError, BrushSettings, ConfigError};
use crate::domain::core::Frame;
use crate::input::RecordingError;
use crate::ui::{
    CaptureError, CaptureExporter, DrawingSurface, HudRenderer, OverlayRenderer, RenderError,
    SnapshotGallery,
};

/// Application errors that can occur during controller operations
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Brush error: {0}")]
    Brush(#[from] BrushError),
    #[error("Render error: {0}")]
    Render(#[from] RenderError),
    #[error("Capture error: {0}")]
    Capture(#[from] CaptureError),
    #[error("Recording error: {0}")]
    Recording(#[from] RecordingError),
}

/// Latest values of the observability outputs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusBoard {
    pub status: String,
    pub kind: StatusKind,
    pub gesture: String,
    pub frame_rate: Option<u32>,
}

impl Default for StatusBoard {
    fn default() -> Self {
        Self {
            status: "Initializing...".to_string(),
            kind: StatusKind::Inactive,
            gesture: "None".to_string(),
            frame_rate: None,
        }
    }
}

impl StatusBoard {
    /// Lines shown by the HUD
    pub fn lines(&self) -> Vec<String> {
        let fps = self
            .frame_rate
            .map(|fps| fps.to_string())
            .unwrap_or_else(|| "-".to_string());
        vec![
            format!("Status: {}", self.status),
            format!("Gesture: {}", self.gesture),
            format!("FPS: {fps}"),
        ]
    }
}

/// Main application controller
///
/// Coordinates the processor and all collaborators. Single-threaded:
/// each frame is handled to completion before the next is accepted.
#[derive(Debug)]
pub struct CanvasController {
    processor: FrameProcessor,
    brush: BrushSettings,
    surface: DrawingSurface,
    overlay: OverlayRenderer,
    hud: HudRenderer,
    gallery: SnapshotGallery,
    exporter: CaptureExporter,
    status: StatusBoard,
    captures: Vec<PathBuf>,
}

impl CanvasController {
    /// Creates a controller from validated configuration
    ///
    /// # Returns
    /// CanvasController instance or AppError if initialization fails
    pub fn new(config: &AppConfig) -> Result<Self, AppError> {
        config.validate()?;

        let (width, height) = (config.canvas.width, config.canvas.height);
        let hud = match &config.output.font_path {
            Some(path) => HudRenderer::from_font_file(path)?,
            None => HudRenderer::disabled(),
        };

        let exporter = CaptureExporter::new(config.output.capture_dir.clone());
        info!(
            width,
            height,
            captures = %exporter.dir().display(),
            "canvas controller initialized"
        );
        Ok(Self {
            processor: FrameProcessor::new(width, height, &config.tracking),
            brush: config.brush.clone(),
            surface: DrawingSurface::new(width, height)?,
            overlay: OverlayRenderer::new(width, height)?,
            hud,
            gallery: SnapshotGallery::new(config.gallery.capacity),
            exporter,
            status: StatusBoard::default(),
            captures: Vec::new(),
        })
    }

    /// Runs one frame through the processor and executes its effects
    ///
    /// # Returns
    /// The effects that were executed, in order
    pub fn handle_frame(&mut self, frame: &Frame, now_ms: f64) -> Result<FrameEffects, AppError> {
        let brush = self.brush.brush()?;
        let effects = self.processor.process_frame(frame, now_ms, &brush);
        for effect in effects.iter() {
            self.execute(effect);
        }
        self.hud.render(self.overlay.pixmap_mut(), &self.status.lines());
        Ok(effects)
    }

    fn execute(&mut self, effect: &Effect) {
        match effect {
            Effect::DrawSegment { from, to, brush } => {
                self.surface.draw_segment(*from, *to, brush);
            }
            Effect::RenderOverlay { landmarks } => {
                self.overlay.render(landmarks.as_ref());
            }
            Effect::SaveSnapshot { reason } => {
                debug!(?reason, "saving snapshot");
                self.save_snapshot();
            }
            Effect::TriggerCapture { .. } => {
                self.trigger_capture();
            }
            Effect::SetStatus { text, kind } => {
                self.status.status = text.clone();
                self.status.kind = *kind;
            }
            Effect::SetGestureLabel(label) => {
                self.status.gesture = label.clone();
            }
            Effect::SetFrameRate(fps) => {
                self.status.frame_rate = Some(*fps);
            }
        }
    }

    fn save_snapshot(&mut self) {
        match self.surface.encode_png() {
            Ok(png) => {
                if let Some(evicted) = self.gallery.push(png) {
                    debug!(
                        sequence = evicted.sequence,
                        capacity = self.gallery.capacity(),
                        "gallery full, evicted oldest snapshot"
                    );
                }
            }
            Err(e) => {
                warn!("snapshot failed: {e}");
                self.report_failure(format!("Snapshot failed: {e}"));
            }
        }
    }

    fn trigger_capture(&mut self) {
        self.overlay.trigger_flash();
        let result = self
            .surface
            .encode_png()
            .map_err(CaptureError::from)
            .and_then(|png| self.exporter.export(&png));

        match result {
            Ok(path) => {
                info!("capture saved to {}", path.display());
                self.captures.push(path);
            }
            Err(e) => {
                warn!("capture failed: {e}");
                self.report_failure(format!("Capture failed: {e}"));
            }
        }
    }

    fn report_failure(&mut self, text: String) {
        self.status.status = text;
        self.status.kind = StatusKind::Inactive;
    }

    /// Manual download button; same path as the fist gesture
    pub fn download(&mut self) {
        self.trigger_capture();
    }

    /// Erases the drawing surface and empties the gallery
    pub fn clear_surface(&mut self) {
        info!("clearing drawing surface");
        self.surface.clear();
        self.gallery.clear();
    }

    pub fn select_color(&mut self, hex: &str) -> Result<(), AppError> {
        let color = self.brush.select_color(hex)?;
        debug!(color = %color.to_hex(), "brush color changed");
        Ok(())
    }

    pub fn set_brush_width(&mut self, width: u32) -> u32 {
        let width = self.brush.set_width(width);
        debug!(width, "brush width changed");
        width
    }

    /// Resizes the canvas; like a browser canvas, this wipes existing ink
    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), AppError> {
        self.surface = DrawingSurface::new(width, height)?;
        self.overlay = OverlayRenderer::new(width, height)?;
        self.processor.resize(width, height);
        Ok(())
    }

    pub fn processor(&self) -> &FrameProcessor {
        &self.processor
    }

    pub fn surface(&self) -> &DrawingSurface {
        &self.surface
    }

    pub fn overlay(&self) -> &OverlayRenderer {
        &self.overlay
    }

    pub fn gallery(&self) -> &SnapshotGallery {
        &self.gallery
    }

    pub fn status(&self) -> &StatusBoard {
        &self.status
    }

    pub fn brush(&self) -> &BrushSettings {
        &self.brush
    }

    /// Paths of captures written so far
    pub fn captures(&self) -> &[PathBuf] {
        &self.captures
    }
}
