//! Persistent drawing surface backed by tiny-skia
//!
//! Strokes accumulate on a transparent pixmap. Every segment is drawn with
//! round caps and joins so consecutive segments read as one smooth line.

use tiny_skia::{Color, FillRule, LineCap, LineJoin, Paint, PathBuilder, Pixmap, Stroke, Transform};

use crate::config::{Brush, BrushColor};
use crate::domain::core::Point;

/// Rendering errors
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("Failed to create {width}x{height} pixmap")]
    PixmapCreationFailed { width: u32, height: u32 },

    #[error("PNG encoding failed: {0}")]
    EncodingFailed(String),

    #[error("Font could not be loaded: {0}")]
    InvalidFont(String),
}

pub(crate) fn skia_color(color: BrushColor) -> Color {
    Color::from_rgba8(color.r, color.g, color.b, 255)
}

pub(crate) fn new_pixmap(width: u32, height: u32) -> Result<Pixmap, RenderError> {
    let mut pixmap =
        Pixmap::new(width, height).ok_or(RenderError::PixmapCreationFailed { width, height })?;
    pixmap.fill(Color::TRANSPARENT);
    Ok(pixmap)
}

/// The canvas that strokes are drawn onto and snapshots are taken from
#[derive(Debug, Clone)]
pub struct DrawingSurface {
    pixmap: Pixmap,
}

impl DrawingSurface {
    pub fn new(width: u32, height: u32) -> Result<Self, RenderError> {
        Ok(Self {
            pixmap: new_pixmap(width, height)?,
        })
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    /// Strokes one segment with the given brush
    ///
    /// A zero-length segment still leaves a dot, the way a round cap does.
    pub fn draw_segment(&mut self, from: Point, to: Point, brush: &Brush) {
        let mut paint = Paint::default();
        paint.set_color(skia_color(brush.color));
        paint.anti_alias = true;

        if from == to {
            if let Some(dot) = PathBuilder::from_circle(from.x, from.y, brush.width / 2.0) {
                self.pixmap
                    .fill_path(&dot, &paint, FillRule::Winding, Transform::identity(), None);
            }
            return;
        }

        let mut path_builder = PathBuilder::new();
        path_builder.move_to(from.x, from.y);
        path_builder.line_to(to.x, to.y);

        if let Some(path) = path_builder.finish() {
            let stroke = Stroke {
                width: brush.width,
                line_cap: LineCap::Round,
                line_join: LineJoin::Round,
                ..Stroke::default()
            };
            self.pixmap
                .stroke_path(&path, &paint, &stroke, Transform::identity(), None);
        }
    }

    /// Erases every stroke
    pub fn clear(&mut self) {
        self.pixmap.fill(Color::TRANSPARENT);
    }

    /// Encodes the current surface as PNG bytes
    pub fn encode_png(&self) -> Result<Vec<u8>, RenderError> {
        self.pixmap
            .encode_png()
            .map_err(|e| RenderError::EncodingFailed(e.to_string()))
    }

    /// Returns true if any pixel has been painted
    pub fn has_ink(&self) -> bool {
        self.pixmap.pixels().iter().any(|p| p.alpha() > 0)
    }

    /// Alpha of a single pixel, or None when out of bounds
    pub fn alpha_at(&self, x: u32, y: u32) -> Option<u8> {
        self.pixmap.pixel(x, y).map(|p| p.alpha())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Palette;

    fn brush(width: f32) -> Brush {
        Brush {
            color: Palette::default_color(),
            width,
        }
    }

    #[test]
    fn new_surface_is_blank() {
        let surface = DrawingSurface::new(64, 48).unwrap();
        assert_eq!((surface.width(), surface.height()), (64, 48));
        assert!(!surface.has_ink());
    }

    #[test]
    fn zero_sized_surface_is_rejected() {
        assert!(matches!(
            DrawingSurface::new(0, 10),
            Err(RenderError::PixmapCreationFailed { width: 0, height: 10 })
        ));
    }

    #[test]
    fn segment_paints_along_its_path() {
        let mut surface = DrawingSurface::new(100, 100).unwrap();
        surface.draw_segment(Point::new(10.0, 50.0), Point::new(90.0, 50.0), &brush(8.0));

        assert_eq!(surface.alpha_at(50, 50), Some(255));
        assert_eq!(surface.alpha_at(50, 10), Some(0));
    }

    #[test]
    fn round_cap_extends_past_endpoint() {
        let mut surface = DrawingSurface::new(100, 100).unwrap();
        surface.draw_segment(Point::new(20.0, 50.0), Point::new(80.0, 50.0), &brush(10.0));
        assert!(surface.alpha_at(83, 50).unwrap() > 0);
    }

    #[test]
    fn zero_length_segment_leaves_dot() {
        let mut surface = DrawingSurface::new(40, 40).unwrap();
        surface.draw_segment(Point::new(20.0, 20.0), Point::new(20.0, 20.0), &brush(8.0));
        assert_eq!(surface.alpha_at(20, 20), Some(255));
    }

    #[test]
    fn clear_erases_ink() {
        let mut surface = DrawingSurface::new(40, 40).unwrap();
        surface.draw_segment(Point::new(0.0, 0.0), Point::new(40.0, 40.0), &brush(4.0));
        assert!(surface.has_ink());
        surface.clear();
        assert!(!surface.has_ink());
    }

    #[test]
    fn encodes_png() {
        let surface = DrawingSurface::new(16, 16).unwrap();
        let png = surface.encode_png().unwrap();
        assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
    }
}
