//! Per-frame orchestration
//!
//! `FrameProcessor` owns every piece of state that survives between frames
//! (smoothed cursor, stroke session, fist latch, last arrival time) and turns
//! each inbound frame into a list of effects. It never draws or writes files
//! itself; the controller executes the returned effects.

use tracing::{debug, info};

use crate::app::state::{CommitReason, StrokeAction, StrokeEvent, StrokeMachine, StrokeState};
use crate::config::{Brush, TrackingConfig};
use crate::domain::capture::FistLatch;
use crate::domain::core::{Frame, HandLandmarks, INDEX_TIP, Point};
use crate::domain::gesture::{Gesture, classify};
use crate::domain::smoothing::EmaSmoother;

pub const STATUS_TRACKING: &str = "Tracking Active";
pub const STATUS_SEARCHING: &str = "Searching for hand...";

/// Visual class of a status message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Active,
    Inactive,
}

/// Side effect requested by one frame
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Stroke one segment onto the persistent surface (round cap and join)
    DrawSegment { from: Point, to: Point, brush: Brush },
    /// Replace the transient skeleton overlay; `None` clears it
    RenderOverlay { landmarks: Option<HandLandmarks> },
    /// Push the current surface into the snapshot gallery
    SaveSnapshot { reason: CommitReason },
    /// Flash and export the current surface
    TriggerCapture { at_ms: f64 },
    SetStatus { text: String, kind: StatusKind },
    SetGestureLabel(String),
    SetFrameRate(u32),
}

/// Ordered effects produced by a single frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameEffects {
    effects: Vec<Effect>,
}

impl FrameEffects {
    fn push(&mut self, effect: Effect) {
        self.effects.push(effect);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Effect> {
        self.effects.iter()
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    pub fn segment_count(&self) -> usize {
        self.iter()
            .filter(|e| matches!(e, Effect::DrawSegment { .. }))
            .count()
    }

    pub fn snapshot_count(&self) -> usize {
        self.iter()
            .filter(|e| matches!(e, Effect::SaveSnapshot { .. }))
            .count()
    }

    pub fn capture_count(&self) -> usize {
        self.iter()
            .filter(|e| matches!(e, Effect::TriggerCapture { .. }))
            .count()
    }
}

impl IntoIterator for FrameEffects {
    type Item = Effect;
    type IntoIter = std::vec::IntoIter<Effect>;

    fn into_iter(self) -> Self::IntoIter {
        self.effects.into_iter()
    }
}

/// Stateful pipeline: classifier, smoother, stroke machine, capture latch
#[derive(Debug, Clone)]
pub struct FrameProcessor {
    canvas_width: f32,
    canvas_height: f32,
    smoother: EmaSmoother,
    machine: StrokeMachine,
    stroke: StrokeState,
    fist: FistLatch,
    last_frame_ms: Option<f64>,
    last_gesture: Gesture,
}

impl FrameProcessor {
    pub fn new(canvas_width: u32, canvas_height: u32, tracking: &TrackingConfig) -> Self {
        Self {
            canvas_width: canvas_width as f32,
            canvas_height: canvas_height as f32,
            smoother: EmaSmoother::new(tracking.smoothing_alpha),
            machine: StrokeMachine::from_config(tracking),
            stroke: StrokeState::Idle,
            fist: FistLatch::new(),
            last_frame_ms: None,
            last_gesture: Gesture::None,
        }
    }

    /// Changes the canvas the cursor is projected onto
    pub fn resize(&mut self, canvas_width: u32, canvas_height: u32) {
        self.canvas_width = canvas_width as f32;
        self.canvas_height = canvas_height as f32;
    }

    pub fn stroke_state(&self) -> &StrokeState {
        &self.stroke
    }

    pub fn smoothed_point(&self) -> Point {
        self.smoother.current()
    }

    pub fn last_gesture(&self) -> Gesture {
        self.last_gesture
    }

    /// Processes one frame to completion
    ///
    /// # Arguments
    /// * `frame` - Latest observation from the pose estimator
    /// * `now_ms` - Arrival timestamp in milliseconds (monotonic)
    /// * `brush` - Brush to use for any segment drawn this frame
    ///
    /// # Returns
    /// Effects to execute, in order
    pub fn process_frame(&mut self, frame: &Frame, now_ms: f64, brush: &Brush) -> FrameEffects {
        let mut effects = FrameEffects::default();

        if let Some(fps) = self.frame_rate(now_ms) {
            effects.push(Effect::SetFrameRate(fps));
        }

        match frame {
            Frame::NoHand => self.on_hand_lost(now_ms, &mut effects),
            Frame::Hand(landmarks) => self.on_hand(landmarks, now_ms, brush, &mut effects),
        }

        effects
    }

    fn frame_rate(&mut self, now_ms: f64) -> Option<u32> {
        let previous = self.last_frame_ms.replace(now_ms)?;
        let delta = now_ms - previous;
        if delta > 0.0 {
            Some((1000.0 / delta).round() as u32)
        } else {
            None
        }
    }

    fn on_hand_lost(&mut self, now_ms: f64, effects: &mut FrameEffects) {
        let transition = self
            .machine
            .process_event(self.stroke, StrokeEvent::HandLost { now_ms });
        self.stroke = transition.state;
        for action in transition.actions {
            self.apply_action(action, None, effects);
        }

        // The fist latch only sees hand frames, so a fist that drops out of
        // tracking and returns still closed does not capture twice.
        self.last_gesture = Gesture::None;

        effects.push(Effect::RenderOverlay { landmarks: None });
        effects.push(Effect::SetStatus {
            text: STATUS_SEARCHING.to_string(),
            kind: StatusKind::Inactive,
        });
        effects.push(Effect::SetGestureLabel(Gesture::None.label().to_string()));
    }

    fn on_hand(
        &mut self,
        landmarks: &HandLandmarks,
        now_ms: f64,
        brush: &Brush,
        effects: &mut FrameEffects,
    ) {
        effects.push(Effect::SetStatus {
            text: STATUS_TRACKING.to_string(),
            kind: StatusKind::Active,
        });

        let gesture = classify(landmarks);
        if gesture != self.last_gesture {
            debug!(from = ?self.last_gesture, to = ?gesture, "gesture changed");
        }
        self.last_gesture = gesture;
        effects.push(Effect::SetGestureLabel(gesture.label().to_string()));
        // Must precede any TriggerCapture so the flash is drawn over the
        // skeleton instead of being wiped by it.
        effects.push(Effect::RenderOverlay {
            landmarks: Some(landmarks.mirrored()),
        });

        let raw = Point::from_mirrored_landmark(
            landmarks.get(INDEX_TIP),
            self.canvas_width,
            self.canvas_height,
        );
        // Outside a stroke the cursor tracks the raw tip, so a new stroke
        // starts exactly under the finger.
        let point = if self.stroke.is_idle() {
            self.smoother.reseed(raw)
        } else {
            self.smoother.update(raw)
        };

        let event = if gesture == Gesture::Pointing {
            StrokeEvent::Pointing { point, now_ms }
        } else {
            StrokeEvent::NotPointing { point, now_ms }
        };
        let transition = self.machine.process_event(self.stroke, event);
        self.stroke = transition.state;
        for action in transition.actions {
            self.apply_action(action, Some(brush), effects);
        }

        if self.fist.observe(gesture) {
            info!(at_ms = now_ms, "fist capture triggered");
            effects.push(Effect::TriggerCapture { at_ms: now_ms });
        }
    }

    fn apply_action(&self, action: StrokeAction, brush: Option<&Brush>, effects: &mut FrameEffects) {
        match action {
            StrokeAction::Segment { from, to } => {
                if let Some(brush) = brush {
                    effects.push(Effect::DrawSegment {
                        from,
                        to,
                        brush: *brush,
                    });
                }
            }
            StrokeAction::Commit { reason, duration_ms } => {
                info!(?reason, duration_ms, "stroke committed");
                effects.push(Effect::SaveSnapshot { reason });
            }
            StrokeAction::Discard { duration_ms } => {
                info!(duration_ms, "stroke discarded");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BrushSettings;
    use crate::domain::core::fixtures::*;

    fn processor() -> FrameProcessor {
        FrameProcessor::new(1000, 500, &TrackingConfig::default())
    }

    fn brush() -> Brush {
        BrushSettings::default().brush().unwrap()
    }

    fn feed(processor: &mut FrameProcessor, frames: &[(Frame, f64)]) -> Vec<FrameEffects> {
        let brush = brush();
        frames
            .iter()
            .map(|(frame, t)| processor.process_frame(frame, *t, &brush))
            .collect()
    }

    #[test]
    fn pointing_then_dropout_then_hand_loss() {
        let mut processor = processor();
        let frames = [
            (Frame::Hand(pointing_hand_at(0.50, 0.30)), 0.0),
            (Frame::Hand(pointing_hand_at(0.48, 0.31)), 33.0),
            (Frame::Hand(pointing_hand_at(0.46, 0.32)), 66.0),
            (Frame::Hand(unknown_hand()), 99.0),
            (Frame::Hand(unknown_hand()), 132.0),
            (Frame::NoHand, 165.0),
        ];
        let out = feed(&mut processor, &frames);

        let per_frame: Vec<usize> = out.iter().map(FrameEffects::segment_count).collect();
        // The opening frame only records a start point
        assert_eq!(per_frame, vec![0, 1, 1, 1, 1, 0]);

        // Hand loss commits even though the stroke lasted under 200ms
        assert_eq!(out[5].snapshot_count(), 1);
        assert!(out[5].iter().any(|e| matches!(
            e,
            Effect::SaveSnapshot { reason: CommitReason::HandLost }
        )));
        assert!(processor.stroke_state().is_idle());
    }

    #[test]
    fn new_stroke_starts_exactly_at_raw_point() {
        let mut processor = processor();
        feed(&mut processor, &[(Frame::Hand(unknown_hand()), 0.0)]);
        feed(&mut processor, &[(Frame::Hand(pointing_hand_at(0.25, 0.5)), 16.0)]);
        assert_eq!(processor.smoothed_point(), Point::new(750.0, 250.0));
    }

    #[test]
    fn no_hand_frame_leaves_smoother_alone() {
        let mut processor = processor();
        feed(
            &mut processor,
            &[
                (Frame::Hand(pointing_hand_at(0.5, 0.5)), 0.0),
                (Frame::Hand(pointing_hand_at(0.4, 0.5)), 16.0),
            ],
        );
        let before = processor.smoothed_point();
        assert!((before.x - 545.0).abs() < 1e-3);

        feed(&mut processor, &[(Frame::NoHand, 33.0)]);
        assert_eq!(processor.smoothed_point(), before);

        // Hand loss closed the stroke, so the next hand reseeds to the raw tip
        feed(&mut processor, &[(Frame::Hand(pointing_hand_at(0.2, 0.4)), 50.0)]);
        assert_eq!(processor.smoothed_point(), Point::new(800.0, 200.0));
    }

    #[test]
    fn segments_follow_smoothed_cursor() {
        let mut processor = processor();
        let out = feed(
            &mut processor,
            &[
                (Frame::Hand(pointing_hand_at(0.5, 0.5)), 0.0),
                (Frame::Hand(pointing_hand_at(0.4, 0.5)), 16.0),
            ],
        );

        let segment = out[1]
            .iter()
            .find_map(|e| match e {
                Effect::DrawSegment { from, to, .. } => Some((*from, *to)),
                _ => None,
            })
            .unwrap();
        assert_eq!(segment.0, Point::new(500.0, 250.0));
        // Raw target is x=600; EMA moves 45% of the way
        assert!((segment.1.x - 545.0).abs() < 1e-3);
        assert_eq!(segment.1.y, 250.0);
    }

    #[test]
    fn single_fist_frame_triggers_one_capture() {
        let mut processor = processor();
        let out = feed(
            &mut processor,
            &[
                (Frame::Hand(unknown_hand()), 0.0),
                (Frame::Hand(fist_hand()), 33.0),
                (Frame::Hand(unknown_hand()), 66.0),
            ],
        );
        let captures: usize = out.iter().map(FrameEffects::capture_count).sum();
        assert_eq!(captures, 1);
        assert_eq!(out[1].capture_count(), 1);

        let effects: Vec<&Effect> = out[1].iter().collect();
        let overlay = effects
            .iter()
            .position(|e| matches!(e, Effect::RenderOverlay { .. }))
            .unwrap();
        let capture = effects
            .iter()
            .position(|e| matches!(e, Effect::TriggerCapture { .. }))
            .unwrap();
        assert!(overlay < capture);
    }

    #[test]
    fn held_fist_triggers_once() {
        let mut processor = processor();
        let frames: Vec<(Frame, f64)> = (0..8)
            .map(|i| (Frame::Hand(fist_hand()), i as f64 * 33.0))
            .collect();
        let captures: usize = feed(&mut processor, &frames)
            .iter()
            .map(FrameEffects::capture_count)
            .sum();
        assert_eq!(captures, 1);
    }

    #[test]
    fn fist_through_hand_loss_captures_once() {
        let mut processor = processor();
        let out = feed(
            &mut processor,
            &[
                (Frame::Hand(fist_hand()), 0.0),
                (Frame::NoHand, 33.0),
                (Frame::Hand(fist_hand()), 66.0),
                (Frame::Hand(unknown_hand()), 99.0),
                (Frame::Hand(fist_hand()), 132.0),
            ],
        );
        let per_frame: Vec<usize> = out.iter().map(FrameEffects::capture_count).collect();
        assert_eq!(per_frame, vec![1, 0, 0, 0, 1]);
    }

    #[test]
    fn frame_rate_uses_arrival_delta() {
        let mut processor = processor();
        let out = feed(
            &mut processor,
            &[(Frame::NoHand, 100.0), (Frame::NoHand, 133.0), (Frame::NoHand, 133.0)],
        );
        assert!(!out[0].iter().any(|e| matches!(e, Effect::SetFrameRate(_))));
        assert!(out[1].iter().any(|e| *e == Effect::SetFrameRate(30)));
        assert!(!out[2].iter().any(|e| matches!(e, Effect::SetFrameRate(_))));
    }

    #[test]
    fn no_hand_reports_searching_status() {
        let mut processor = processor();
        let out = processor.process_frame(&Frame::NoHand, 0.0, &brush());
        assert!(out.iter().any(|e| *e
            == Effect::SetStatus {
                text: STATUS_SEARCHING.to_string(),
                kind: StatusKind::Inactive,
            }));
        assert!(out.iter().any(|e| *e == Effect::SetGestureLabel("None".to_string())));
        assert!(out.iter().any(|e| *e == Effect::RenderOverlay { landmarks: None }));
        assert_eq!(out.snapshot_count(), 0);
    }

    #[test]
    fn hand_frame_renders_mirrored_overlay() {
        let mut processor = processor();
        let hand = pointing_hand();
        let out = processor.process_frame(&Frame::Hand(hand), 0.0, &brush());
        assert!(out.iter().any(|e| *e
            == Effect::RenderOverlay {
                landmarks: Some(hand.mirrored()),
            }));
        assert!(out.iter().any(|e| *e == Effect::SetGestureLabel("Pointing".to_string())));
    }

    #[test]
    fn resize_changes_projection() {
        let mut processor = processor();
        processor.resize(200, 100);
        processor.process_frame(&Frame::Hand(pointing_hand_at(0.5, 0.5)), 0.0, &brush());
        assert_eq!(processor.smoothed_point(), Point::new(100.0, 50.0));
    }
}
