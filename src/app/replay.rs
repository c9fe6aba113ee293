//! Drives a controller from a recorded event stream

use tracing::{debug, warn};

use crate::app::controller::{AppError, CanvasController};
use crate::input::{RecordingError, ReplayEvent};

/// Counters gathered over one replay
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplaySummary {
    pub frames: usize,
    pub rejected: usize,
    pub segments: usize,
    pub snapshots: usize,
    /// Capture files actually written
    pub captures: usize,
}

/// Feeds every event to the controller in order
///
/// Rejected lines and refused controls are logged and skipped. Read
/// failures and controller failures abort the replay.
pub fn replay<I>(controller: &mut CanvasController, events: I) -> Result<ReplaySummary, AppError>
where
    I: IntoIterator<Item = Result<ReplayEvent, RecordingError>>,
{
    let mut summary = ReplaySummary::default();

    for event in events {
        let event = match event {
            Ok(event) => event,
            Err(e @ RecordingError::Io(_)) => return Err(e.into()),
            Err(e) => {
                warn!("skipping recording entry: {e}");
                summary.rejected += 1;
                continue;
            }
        };

        match event {
            ReplayEvent::Frame { at_ms, frame } => {
                let effects = controller.handle_frame(&frame, at_ms)?;
                summary.frames += 1;
                summary.segments += effects.segment_count();
                summary.snapshots += effects.snapshot_count();
            }
            ReplayEvent::SelectColor { at_ms, color } => {
                if let Err(e) = controller.select_color(&color) {
                    warn!(at_ms, "ignoring color change: {e}");
                }
            }
            ReplayEvent::SetWidth { at_ms, width } => {
                let applied = controller.set_brush_width(width);
                debug!(at_ms, requested = width, applied, "brush width set");
            }
            ReplayEvent::Clear { .. } => controller.clear_surface(),
            ReplayEvent::Download { .. } => controller.download(),
        }
    }

    summary.captures = controller.captures().len();
    Ok(summary)
}
