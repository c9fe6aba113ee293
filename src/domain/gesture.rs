//! Gesture classification from a single landmark frame
//!
//! Classification is purely geometric: each finger is compared against its
//! own PIP and MCP joints along the image y axis. No state is carried from
//! one frame to the next.

use tracing::trace;

use crate::domain::core::{
    Frame, HandLandmarks, INDEX_MCP, INDEX_PIP, INDEX_TIP, MIDDLE_MCP, MIDDLE_PIP, MIDDLE_TIP,
    PINKY_MCP, PINKY_PIP, PINKY_TIP, RING_MCP, RING_PIP, RING_TIP, THUMB_TIP, WRIST,
};

/// Tip, PIP and MCP indices for the four non-thumb fingers
const FINGERS: [(usize, usize, usize); 4] = [
    (INDEX_TIP, INDEX_PIP, INDEX_MCP),
    (MIDDLE_TIP, MIDDLE_PIP, MIDDLE_MCP),
    (RING_TIP, RING_PIP, RING_MCP),
    (PINKY_TIP, PINKY_PIP, PINKY_MCP),
];

/// Discrete hand pose recognized in one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Gesture {
    /// No hand in the frame
    #[default]
    None,
    /// Index finger extended, the other three folded
    Pointing,
    /// All four fingers tucked below their knuckles
    Fist,
    /// All four fingers extended
    OpenPalm,
    /// A hand is present but matches no known pose
    Unknown,
}

impl Gesture {
    /// Human readable label for status displays
    pub fn label(&self) -> &'static str {
        match self {
            Self::None => "None",
            Self::Pointing => "Pointing",
            Self::Fist => "Fist",
            Self::OpenPalm => "Open Palm",
            Self::Unknown => "Unknown",
        }
    }
}

/// Auxiliary hand measurements in normalized units
///
/// These are measured alongside classification but deliberately play no
/// part in the decision. They are kept for debug output.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandGeometry {
    /// Distance between thumb tip and index tip
    pub pinch_distance: f32,
    /// Distance between wrist and index MCP, a proxy for hand size
    pub hand_scale: f32,
}

impl HandGeometry {
    pub fn measure(landmarks: &HandLandmarks) -> Self {
        Self {
            pinch_distance: landmarks.get(THUMB_TIP).distance_to(&landmarks.get(INDEX_TIP)),
            hand_scale: landmarks.get(WRIST).distance_to(&landmarks.get(INDEX_MCP)),
        }
    }
}

/// Classifies one hand into a gesture
///
/// Branches are checked in priority order and the first match wins:
/// Pointing, then Fist, then OpenPalm, else Unknown.
pub fn classify(landmarks: &HandLandmarks) -> Gesture {
    let geometry = HandGeometry::measure(landmarks);
    trace!(
        pinch = geometry.pinch_distance,
        scale = geometry.hand_scale,
        "hand geometry"
    );

    let y = |index: usize| landmarks.get(index).y;

    let mut extended_count = 0;
    let mut fist_candidate = true;
    for &(tip, pip, mcp) in FINGERS.iter() {
        if y(tip) < y(pip) {
            extended_count += 1;
        }
        if y(tip) < y(mcp) {
            fist_candidate = false;
        }
    }

    let index_extended = y(INDEX_TIP) < y(INDEX_PIP);
    let middle_folded = y(MIDDLE_TIP) > y(MIDDLE_PIP);
    let ring_folded = y(RING_TIP) > y(RING_PIP);
    let pinky_folded = y(PINKY_TIP) > y(PINKY_PIP);

    if index_extended && middle_folded && ring_folded && pinky_folded {
        return Gesture::Pointing;
    }

    if fist_candidate && extended_count == 0 {
        return Gesture::Fist;
    }

    if extended_count == FINGERS.len() {
        return Gesture::OpenPalm;
    }

    Gesture::Unknown
}

/// Classifies a whole frame; frames without a hand are `Gesture::None`
pub fn classify_frame(frame: &Frame) -> Gesture {
    match frame {
        Frame::NoHand => Gesture::None,
        Frame::Hand(landmarks) => classify(landmarks),
    }
}
