//! Transient hand skeleton overlay
//!
//! Redrawn from scratch every frame on its own pixmap, separate from the
//! persistent drawing surface. Also hosts the flash shown when a capture
//! fires, which stays up until the next render.

use tiny_skia::{Color, FillRule, Paint, PathBuilder, Pixmap, Stroke, Transform};

use crate::domain::core::{HAND_CONNECTIONS, HandLandmarks};
use crate::ui::surface::{RenderError, new_pixmap};

/// Colors and sizes used for the skeleton
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct OverlayStyle {
    pub connector_color: Color,
    pub connector_width: f32,
    pub joint_color: Color,
    pub joint_radius: f32,
    pub flash_color: Color,
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            connector_color: Color::from_rgba8(0x6c, 0x5c, 0xe7, 255),
            connector_width: 1.0,
            joint_color: Color::from_rgba8(255, 255, 255, 255),
            joint_radius: 1.5,
            flash_color: Color::from_rgba8(255, 255, 255, 200),
        }
    }
}

#[derive(Debug, Clone)]
pub struct OverlayRenderer {
    pixmap: Pixmap,
    style: OverlayStyle,
    flashing: bool,
}

impl OverlayRenderer {
    pub fn new(width: u32, height: u32) -> Result<Self, RenderError> {
        Ok(Self {
            pixmap: new_pixmap(width, height)?,
            style: OverlayStyle::default(),
            flashing: false,
        })
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    pub fn pixmap_mut(&mut self) -> &mut Pixmap {
        &mut self.pixmap
    }

    /// Covers the overlay with the flash color right away
    ///
    /// The next `render` call replaces it.
    pub fn trigger_flash(&mut self) {
        self.pixmap.fill(self.style.flash_color);
        self.flashing = true;
    }

    pub fn is_flashing(&self) -> bool {
        self.flashing
    }

    /// Clears the overlay and draws `landmarks` (already mirrored), if any
    pub fn render(&mut self, landmarks: Option<&HandLandmarks>) {
        self.pixmap.fill(Color::TRANSPARENT);
        self.flashing = false;

        if let Some(landmarks) = landmarks {
            self.render_connectors(landmarks);
            self.render_joints(landmarks);
        }
    }

    fn to_pixels(&self, landmarks: &HandLandmarks, index: usize) -> (f32, f32) {
        let landmark = landmarks.get(index);
        (
            landmark.x * self.pixmap.width() as f32,
            landmark.y * self.pixmap.height() as f32,
        )
    }

    fn render_connectors(&mut self, landmarks: &HandLandmarks) {
        let mut path_builder = PathBuilder::new();
        for &(start, end) in HAND_CONNECTIONS.iter() {
            let (x1, y1) = self.to_pixels(landmarks, start);
            let (x2, y2) = self.to_pixels(landmarks, end);
            path_builder.move_to(x1, y1);
            path_builder.line_to(x2, y2);
        }

        if let Some(path) = path_builder.finish() {
            let mut paint = Paint::default();
            paint.set_color(self.style.connector_color);
            paint.anti_alias = true;

            let stroke = Stroke {
                width: self.style.connector_width,
                ..Stroke::default()
            };
            self.pixmap
                .stroke_path(&path, &paint, &stroke, Transform::identity(), None);
        }
    }

    fn render_joints(&mut self, landmarks: &HandLandmarks) {
        let mut paint = Paint::default();
        paint.set_color(self.style.joint_color);
        paint.anti_alias = true;

        for index in 0..landmarks.points().len() {
            let (x, y) = self.to_pixels(landmarks, index);
            if let Some(joint) = PathBuilder::from_circle(x, y, self.style.joint_radius) {
                self.pixmap
                    .fill_path(&joint, &paint, FillRule::Winding, Transform::identity(), None);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::core::fixtures::pointing_hand;
    use crate::domain::core::{INDEX_TIP, WRIST};

    fn painted(pixmap: &Pixmap) -> bool {
        pixmap.pixels().iter().any(|p| p.alpha() > 0)
    }

    #[test]
    fn renders_joints_at_landmark_positions() {
        let mut overlay = OverlayRenderer::new(200, 200).unwrap();
        let hand = pointing_hand();
        overlay.render(Some(&hand));

        let tip = hand.get(INDEX_TIP);
        let (x, y) = ((tip.x * 200.0) as u32, (tip.y * 200.0) as u32);
        assert!(overlay.pixmap().pixel(x, y).unwrap().alpha() > 0);
        let wrist = hand.get(WRIST);
        let (x, y) = ((wrist.x * 200.0) as u32, (wrist.y * 200.0) as u32);
        assert!(overlay.pixmap().pixel(x, y).unwrap().alpha() > 0);
    }

    #[test]
    fn render_without_hand_clears_previous_frame() {
        let mut overlay = OverlayRenderer::new(100, 100).unwrap();
        overlay.render(Some(&pointing_hand()));
        assert!(painted(overlay.pixmap()));

        overlay.render(None);
        assert!(!painted(overlay.pixmap()));
    }

    #[test]
    fn flash_shows_immediately_until_next_render() {
        let mut overlay = OverlayRenderer::new(10, 10).unwrap();
        overlay.render(Some(&pointing_hand()));
        overlay.trigger_flash();
        assert!(overlay.is_flashing());
        assert_eq!(overlay.pixmap().pixel(5, 5).unwrap().alpha(), 200);

        overlay.render(None);
        assert!(!overlay.is_flashing());
        assert!(!painted(overlay.pixmap()));
    }
}
