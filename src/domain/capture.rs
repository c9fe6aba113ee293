//! Rising-edge detection for the fist capture gesture

use crate::domain::gesture::Gesture;

/// Latch that fires once when a fist is formed and stays quiet while held
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FistLatch {
    held: bool,
}

impl FistLatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Observes this frame's gesture
    ///
    /// # Returns
    /// true only on the frame where the gesture changes into `Fist`
    pub fn observe(&mut self, gesture: Gesture) -> bool {
        let is_fist = gesture == Gesture::Fist;
        let fired = is_fist && !self.held;
        self.held = is_fist;
        fired
    }

    pub fn is_held(&self) -> bool {
        self.held
    }
}
