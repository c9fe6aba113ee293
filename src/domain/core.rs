//! Core domain types and operations
//!
//! This module defines the landmark data model shared by every other layer.
//! Landmarks live in normalized image space; `Point` lives in canvas pixels.
//! Nothing here knows about rendering or about where frames come from.

use thiserror::Error;

/// Number of landmarks the upstream pose estimator reports per hand
pub const LANDMARK_COUNT: usize = 21;

pub const WRIST: usize = 0;
pub const THUMB_CMC: usize = 1;
pub const THUMB_MCP: usize = 2;
pub const THUMB_IP: usize = 3;
pub const THUMB_TIP: usize = 4;
pub const INDEX_MCP: usize = 5;
pub const INDEX_PIP: usize = 6;
pub const INDEX_DIP: usize = 7;
pub const INDEX_TIP: usize = 8;
pub const MIDDLE_MCP: usize = 9;
pub const MIDDLE_PIP: usize = 10;
pub const MIDDLE_DIP: usize = 11;
pub const MIDDLE_TIP: usize = 12;
pub const RING_MCP: usize = 13;
pub const RING_PIP: usize = 14;
pub const RING_DIP: usize = 15;
pub const RING_TIP: usize = 16;
pub const PINKY_MCP: usize = 17;
pub const PINKY_PIP: usize = 18;
pub const PINKY_DIP: usize = 19;
pub const PINKY_TIP: usize = 20;

/// Bone connections used to draw the hand skeleton overlay
pub const HAND_CONNECTIONS: [(usize, usize); 21] = [
    (WRIST, THUMB_CMC), (THUMB_CMC, THUMB_MCP), (THUMB_MCP, THUMB_IP), (THUMB_IP, THUMB_TIP),
    (WRIST, INDEX_MCP), (INDEX_MCP, INDEX_PIP), (INDEX_PIP, INDEX_DIP), (INDEX_DIP, INDEX_TIP),
    (INDEX_MCP, MIDDLE_MCP), (MIDDLE_MCP, MIDDLE_PIP), (MIDDLE_PIP, MIDDLE_DIP), (MIDDLE_DIP, MIDDLE_TIP),
    (MIDDLE_MCP, RING_MCP), (RING_MCP, RING_PIP), (RING_PIP, RING_DIP), (RING_DIP, RING_TIP),
    (RING_MCP, PINKY_MCP), (PINKY_MCP, PINKY_PIP), (PINKY_PIP, PINKY_DIP), (PINKY_DIP, PINKY_TIP),
    (WRIST, PINKY_MCP),
];

/// Errors raised when a landmark set is rejected at the input boundary
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LandmarkError {
    #[error("expected {expected} landmarks, got {actual}")]
    WrongCount { expected: usize, actual: usize },

    #[error("landmark {index} has a non-finite coordinate ({x}, {y})")]
    NonFinite { index: usize, x: f32, y: f32 },
}

/// A single tracked hand point in normalized image space
///
/// `x` and `y` are nominally in `[0, 1]`; `y` grows downward, so a
/// smaller `y` means "higher up" in the camera image.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
}

impl Landmark {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another landmark in normalized units
    pub fn distance_to(&self, other: &Landmark) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Returns the landmark flipped horizontally (front-facing camera view)
    pub fn mirrored(&self) -> Landmark {
        Landmark::new(1.0 - self.x, self.y)
    }
}

/// A validated set of exactly 21 hand landmarks
///
/// The only way to build one from untrusted data is
/// [`HandLandmarks::try_from_points`], so everything downstream of the
/// boundary can index landmarks without re-checking.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandLandmarks {
    points: [Landmark; LANDMARK_COUNT],
}

impl HandLandmarks {
    /// Wraps an already well-formed array
    pub fn new(points: [Landmark; LANDMARK_COUNT]) -> Self {
        Self { points }
    }

    /// Validates and builds a landmark set from loosely typed input
    ///
    /// # Arguments
    /// * `points` - Landmarks in upstream index order
    ///
    /// # Returns
    /// HandLandmarks, or LandmarkError when the count is wrong or a
    /// coordinate is NaN/infinite
    pub fn try_from_points(points: &[Landmark]) -> Result<Self, LandmarkError> {
        if points.len() != LANDMARK_COUNT {
            return Err(LandmarkError::WrongCount {
                expected: LANDMARK_COUNT,
                actual: points.len(),
            });
        }

        let mut checked = [Landmark::default(); LANDMARK_COUNT];
        for (index, point) in points.iter().enumerate() {
            if !point.x.is_finite() || !point.y.is_finite() {
                return Err(LandmarkError::NonFinite {
                    index,
                    x: point.x,
                    y: point.y,
                });
            }
            checked[index] = *point;
        }

        Ok(Self { points: checked })
    }

    pub fn get(&self, index: usize) -> Landmark {
        self.points[index]
    }

    pub fn points(&self) -> &[Landmark; LANDMARK_COUNT] {
        &self.points
    }

    /// Returns a copy with every x coordinate mirrored
    pub fn mirrored(&self) -> HandLandmarks {
        let mut points = self.points;
        for point in points.iter_mut() {
            *point = point.mirrored();
        }
        HandLandmarks { points }
    }
}

/// One observation delivered by the pose estimator
#[derive(Debug, Clone, PartialEq)]
pub enum Frame {
    /// No hand was detected in this camera frame
    NoHand,
    /// A single hand was detected
    Hand(HandLandmarks),
}

impl Frame {
    pub fn landmarks(&self) -> Option<&HandLandmarks> {
        match self {
            Frame::NoHand => None,
            Frame::Hand(landmarks) => Some(landmarks),
        }
    }
}

/// Point in canvas pixel coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Projects a normalized landmark onto a canvas, mirroring x
    ///
    /// The camera faces the user, so the drawing surface shows the image
    /// flipped left-to-right.
    pub fn from_mirrored_landmark(landmark: Landmark, canvas_width: f32, canvas_height: f32) -> Self {
        Self {
            x: (1.0 - landmark.x) * canvas_width,
            y: landmark.y * canvas_height,
        }
    }
}
