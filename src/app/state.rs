//! Stroke state management
//!
//! Defines the drawing state machine that turns the noisy per-frame
//! "is the user pointing" signal into clean stroke segments and
//! commit/discard decisions. Transitions are a pure function of the
//! current state and one event, so the machine can be driven directly
//! from tests.

use tracing::debug;

use crate::config::TrackingConfig;
use crate::domain::core::Point;

/// Drawing state - idle, actively drawing, or riding out a short dropout
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum StrokeState {
    /// No stroke in progress
    #[default]
    Idle,
    /// The last frame was classified as Pointing
    Drawing(StrokeSession),
    /// Pointing stopped but the debounce buffer keeps the stroke alive
    Holding(StrokeSession),
}

impl StrokeState {
    pub fn is_idle(&self) -> bool {
        matches!(self, StrokeState::Idle)
    }

    pub fn session(&self) -> Option<&StrokeSession> {
        match self {
            StrokeState::Idle => None,
            StrokeState::Drawing(session) | StrokeState::Holding(session) => Some(session),
        }
    }
}

/// One continuous pointer-down stroke
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeSession {
    /// Frame timestamp (ms) of the first Pointing frame
    pub started_at_ms: f64,
    /// End point of the most recent segment
    pub last_point: Point,
    /// Remaining non-Pointing frames tolerated before the stroke ends
    pub buffer: u8,
}

impl StrokeSession {
    fn new(started_at_ms: f64, point: Point, buffer: u8) -> Self {
        Self {
            started_at_ms,
            last_point: point,
            buffer,
        }
    }

    pub fn elapsed_ms(&self, now_ms: f64) -> f64 {
        now_ms - self.started_at_ms
    }
}

/// Per-frame input to the stroke machine
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StrokeEvent {
    /// Hand present and classified as Pointing
    Pointing { point: Point, now_ms: f64 },
    /// Hand present with any other gesture
    NotPointing { point: Point, now_ms: f64 },
    /// The tracker lost the hand
    HandLost { now_ms: f64 },
}

/// Why a stroke was committed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitReason {
    /// Debounce buffer ran out after a long enough stroke
    Completed,
    /// Hand disappeared mid-stroke; no minimum duration applies
    HandLost,
}

/// Side effects requested by a transition
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StrokeAction {
    /// Draw a line from `from` to `to` with the current brush
    Segment { from: Point, to: Point },
    /// Persist the surface as a snapshot
    Commit { reason: CommitReason, duration_ms: f64 },
    /// Drop the stroke without saving (too short, likely a tap)
    Discard { duration_ms: f64 },
}

/// Result of processing one event
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub state: StrokeState,
    pub actions: Vec<StrokeAction>,
}

impl Transition {
    fn quiet(state: StrokeState) -> Self {
        Self {
            state,
            actions: Vec::new(),
        }
    }
}

/// State machine for stroke transitions
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeMachine {
    /// Buffer refill value
    debounce_frames: u8,
    min_stroke_ms: f64,
}

impl StrokeMachine {
    pub const DEFAULT_DEBOUNCE_FRAMES: u8 = 5;
    pub const DEFAULT_MIN_STROKE_MS: f64 = 200.0;

    pub fn new(debounce_frames: u8, min_stroke_ms: f64) -> Self {
        Self {
            debounce_frames,
            min_stroke_ms,
        }
    }

    pub fn from_config(config: &TrackingConfig) -> Self {
        Self::new(config.debounce_frames, config.min_stroke_ms)
    }

    /// Processes a stroke event and returns the new state plus actions
    ///
    /// # Arguments
    /// * `current_state` - State before this frame
    /// * `event` - What this frame observed
    ///
    /// # Returns
    /// The next state and the draw/commit actions it requires
    pub fn process_event(&self, current_state: StrokeState, event: StrokeEvent) -> Transition {
        match (current_state, event) {
            // First point of a new stroke: nothing to connect to yet
            (StrokeState::Idle, StrokeEvent::Pointing { point, now_ms }) => {
                debug!(x = point.x, y = point.y, "stroke: Idle -> Drawing");
                Transition::quiet(StrokeState::Drawing(StrokeSession::new(
                    now_ms,
                    point,
                    self.debounce_frames,
                )))
            }

            (StrokeState::Drawing(mut session), StrokeEvent::Pointing { point, .. })
            | (StrokeState::Holding(mut session), StrokeEvent::Pointing { point, .. }) => {
                let from = session.last_point;
                session.last_point = point;
                session.buffer = self.debounce_frames;
                Transition {
                    state: StrokeState::Drawing(session),
                    actions: vec![StrokeAction::Segment { from, to: point }],
                }
            }

            (StrokeState::Drawing(mut session), StrokeEvent::NotPointing { point, .. })
            | (StrokeState::Holding(mut session), StrokeEvent::NotPointing { point, .. })
                if session.buffer > 0 =>
            {
                let from = session.last_point;
                session.last_point = point;
                session.buffer -= 1;
                Transition {
                    state: StrokeState::Holding(session),
                    actions: vec![StrokeAction::Segment { from, to: point }],
                }
            }

            (StrokeState::Drawing(session), StrokeEvent::NotPointing { now_ms, .. })
            | (StrokeState::Holding(session), StrokeEvent::NotPointing { now_ms, .. }) => {
                let duration_ms = session.elapsed_ms(now_ms);
                let action = if duration_ms < self.min_stroke_ms {
                    debug!(duration_ms, "stroke: discarded as tap");
                    StrokeAction::Discard { duration_ms }
                } else {
                    debug!(duration_ms, "stroke: committed");
                    StrokeAction::Commit {
                        reason: CommitReason::Completed,
                        duration_ms,
                    }
                };
                Transition {
                    state: StrokeState::Idle,
                    actions: vec![action],
                }
            }

            (StrokeState::Drawing(session), StrokeEvent::HandLost { now_ms })
            | (StrokeState::Holding(session), StrokeEvent::HandLost { now_ms }) => {
                let duration_ms = session.elapsed_ms(now_ms);
                debug!(duration_ms, "stroke: hand lost, forcing commit");
                Transition {
                    state: StrokeState::Idle,
                    actions: vec![StrokeAction::Commit {
                        reason: CommitReason::HandLost,
                        duration_ms,
                    }],
                }
            }

            // Idle and not pointing, or idle and no hand
            (StrokeState::Idle, _) => Transition::quiet(StrokeState::Idle),
        }
    }
}

impl Default for StrokeMachine {
    fn default() -> Self {
        Self::new(Self::DEFAULT_DEBOUNCE_FRAMES, Self::DEFAULT_MIN_STROKE_MS)
    }
}
