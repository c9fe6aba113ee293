//! Exponential moving average over the cursor point stream

use crate::domain::core::Point;

/// Default blend weight given to each new sample
pub const DEFAULT_ALPHA: f32 = 0.45;

/// Residual distance (pixels) at which the filter snaps onto its target
const SETTLE_EPSILON: f32 = 1e-3;

/// Blends one raw sample into the previous smoothed value, per axis
///
/// `alpha` near 1 favors the new sample (less lag), near 0 favors history.
pub fn ema(raw: Point, previous: Point, alpha: f32) -> Point {
    Point::new(
        blend_axis(raw.x, previous.x, alpha),
        blend_axis(raw.y, previous.y, alpha),
    )
}

fn blend_axis(raw: f32, previous: f32, alpha: f32) -> f32 {
    let blended = alpha * raw + (1.0 - alpha) * previous;
    if (blended - raw).abs() <= SETTLE_EPSILON {
        raw
    } else {
        blended
    }
}

/// Stateful EMA filter holding the current smoothed cursor
#[derive(Debug, Clone)]
pub struct EmaSmoother {
    alpha: f32,
    current: Point,
}

impl EmaSmoother {
    pub fn new(alpha: f32) -> Self {
        Self {
            alpha,
            current: Point::default(),
        }
    }

    /// Feeds one raw sample and returns the new smoothed point
    pub fn update(&mut self, raw: Point) -> Point {
        self.current = ema(raw, self.current, self.alpha);
        self.current
    }

    /// Jumps straight to `raw`, discarding history
    pub fn reseed(&mut self, raw: Point) -> Point {
        self.current = raw;
        self.current
    }

    pub fn current(&self) -> Point {
        self.current
    }
}

impl Default for EmaSmoother {
    fn default() -> Self {
        Self::new(DEFAULT_ALPHA)
    }
}
