//! Status text drawn over the overlay
//!
//! Text is rasterized with ab_glyph from a user supplied font file. When no
//! font is configured the HUD renders nothing; the status values are still
//! available to callers through the controller.

use std::path::Path;

use ab_glyph::{Font, FontVec, PxScale, ScaleFont, point};
use tiny_skia::{Color, Paint, Pixmap, Rect, Transform};

use crate::ui::surface::RenderError;

const LINE_SPACING: f32 = 1.2;
const MARGIN: f32 = 12.0;

pub struct HudRenderer {
    font: Option<FontVec>,
    size: f32,
    color: Color,
}

impl std::fmt::Debug for HudRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HudRenderer")
            .field("enabled", &self.font.is_some())
            .field("size", &self.size)
            .finish()
    }
}

impl HudRenderer {
    pub const DEFAULT_SIZE: f32 = 18.0;

    /// HUD that never draws
    pub fn disabled() -> Self {
        Self {
            font: None,
            size: Self::DEFAULT_SIZE,
            color: Color::WHITE,
        }
    }

    pub fn from_font_bytes(bytes: Vec<u8>) -> Result<Self, RenderError> {
        let font = FontVec::try_from_vec(bytes).map_err(|e| RenderError::InvalidFont(e.to_string()))?;
        Ok(Self {
            font: Some(font),
            ..Self::disabled()
        })
    }

    pub fn from_font_file(path: &Path) -> Result<Self, RenderError> {
        let bytes = std::fs::read(path)
            .map_err(|e| RenderError::InvalidFont(format!("{}: {e}", path.display())))?;
        Self::from_font_bytes(bytes)
    }

    pub fn is_enabled(&self) -> bool {
        self.font.is_some()
    }

    /// Draws `lines` top-left, one below the other
    pub fn render(&self, pixmap: &mut Pixmap, lines: &[String]) {
        let Some(font) = &self.font else {
            return;
        };

        let scaled = font.as_scaled(PxScale::from(self.size));
        let line_height = scaled.height() * LINE_SPACING;

        for (row, line) in lines.iter().enumerate() {
            let baseline = MARGIN + scaled.ascent() + row as f32 * line_height;
            let mut caret = point(MARGIN, baseline);

            for c in line.chars() {
                let mut glyph = scaled.scaled_glyph(c);
                glyph.position = caret;
                caret.x += scaled.h_advance(glyph.id);

                let Some(outlined) = font.outline_glyph(glyph) else {
                    continue;
                };
                let bounds = outlined.px_bounds();
                outlined.draw(|gx, gy, coverage| {
                    let x = bounds.min.x + gx as f32;
                    let y = bounds.min.y + gy as f32;
                    blend_pixel(pixmap, x, y, self.color, coverage);
                });
            }
        }
    }
}

fn blend_pixel(pixmap: &mut Pixmap, x: f32, y: f32, color: Color, coverage: f32) {
    if coverage <= 0.0 {
        return;
    }
    let Some(rect) = Rect::from_xywh(x, y, 1.0, 1.0) else {
        return;
    };

    let mut tinted = color;
    tinted.apply_opacity(coverage);
    let mut paint = Paint::default();
    paint.set_color(tinted);
    pixmap.fill_rect(rect, &paint, Transform::identity(), None);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_hud_draws_nothing() {
        let hud = HudRenderer::disabled();
        let mut pixmap = Pixmap::new(50, 50).unwrap();
        hud.render(&mut pixmap, &["Tracking Active".to_string()]);
        assert!(!hud.is_enabled());
        assert!(pixmap.pixels().iter().all(|p| p.alpha() == 0));
    }

    #[test]
    fn garbage_font_is_rejected() {
        let result = HudRenderer::from_font_bytes(vec![0u8; 32]);
        assert!(matches!(result, Err(RenderError::InvalidFont(_))));
    }

    #[test]
    fn missing_font_file_is_rejected() {
        let result = HudRenderer::from_font_file(Path::new("/nonexistent/font.ttf"));
        assert!(matches!(result, Err(RenderError::InvalidFont(_))));
    }

    #[test]
    fn blend_respects_coverage() {
        let mut pixmap = Pixmap::new(4, 4).unwrap();
        blend_pixel(&mut pixmap, 1.0, 1.0, Color::WHITE, 1.0);
        blend_pixel(&mut pixmap, 2.0, 2.0, Color::WHITE, 0.0);
        assert_eq!(pixmap.pixel(1, 1).unwrap().alpha(), 255);
        assert_eq!(pixmap.pixel(2, 2).unwrap().alpha(), 0);
    }
}
