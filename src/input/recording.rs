//! Recorded landmark streams
//!
//! A recording is a JSON-lines file, one timestamped event per line:
//!
//! ```text
//! {"kind":"frame","t":0.0,"landmarks":[[0.51,0.62],[0.49,0.58], ...]}
//! {"kind":"frame","t":33.4,"landmarks":null}
//! {"kind":"color","t":40.0,"color":"#3ea6ff"}
//! {"kind":"width","t":41.0,"width":12}
//! {"kind":"clear","t":50.0}
//! {"kind":"download","t":60.0}
//! ```
//!
//! Landmark sets are validated here, before they can reach the classifier.

use std::io::BufRead;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::core::{Frame, HandLandmarks, Landmark, LandmarkError};

#[derive(Debug, Error)]
pub enum RecordingError {
    #[error("failed to read recording: {0}")]
    Io(#[from] std::io::Error),
    #[error("line {line}: not valid UTF-8")]
    Encoding { line: usize },
    #[error("line {line}: malformed event: {source}")]
    Json {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
    #[error("line {line}: rejected landmarks: {source}")]
    Landmarks {
        line: usize,
        #[source]
        source: LandmarkError,
    },
}

/// Wire format of one recorded line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RecordedEvent {
    Frame {
        t: f64,
        #[serde(default)]
        landmarks: Option<Vec<[f32; 2]>>,
    },
    Color {
        t: f64,
        color: String,
    },
    Width {
        t: f64,
        width: u32,
    },
    Clear {
        t: f64,
    },
    Download {
        t: f64,
    },
}

/// Validated event ready to be replayed
#[derive(Debug, Clone, PartialEq)]
pub enum ReplayEvent {
    Frame { at_ms: f64, frame: Frame },
    SelectColor { at_ms: f64, color: String },
    SetWidth { at_ms: f64, width: u32 },
    Clear { at_ms: f64 },
    Download { at_ms: f64 },
}

impl ReplayEvent {
    pub fn at_ms(&self) -> f64 {
        match self {
            ReplayEvent::Frame { at_ms, .. }
            | ReplayEvent::SelectColor { at_ms, .. }
            | ReplayEvent::SetWidth { at_ms, .. }
            | ReplayEvent::Clear { at_ms }
            | ReplayEvent::Download { at_ms } => *at_ms,
        }
    }
}

impl RecordedEvent {
    /// Validates a decoded line
    pub fn into_replay(self) -> Result<ReplayEvent, LandmarkError> {
        Ok(match self {
            RecordedEvent::Frame { t, landmarks: None } => ReplayEvent::Frame {
                at_ms: t,
                frame: Frame::NoHand,
            },
            RecordedEvent::Frame {
                t,
                landmarks: Some(points),
            } => {
                let points: Vec<Landmark> = points.iter().map(|[x, y]| Landmark::new(*x, *y)).collect();
                ReplayEvent::Frame {
                    at_ms: t,
                    frame: Frame::Hand(HandLandmarks::try_from_points(&points)?),
                }
            }
            RecordedEvent::Color { t, color } => ReplayEvent::SelectColor { at_ms: t, color },
            RecordedEvent::Width { t, width } => ReplayEvent::SetWidth { at_ms: t, width },
            RecordedEvent::Clear { t } => ReplayEvent::Clear { at_ms: t },
            RecordedEvent::Download { t } => ReplayEvent::Download { at_ms: t },
        })
    }

    /// Encodes a frame for writing into a recording
    pub fn from_frame(frame: &Frame, at_ms: f64) -> Self {
        RecordedEvent::Frame {
            t: at_ms,
            landmarks: frame
                .landmarks()
                .map(|hand| hand.points().iter().map(|p| [p.x, p.y]).collect()),
        }
    }
}

/// Streams events out of a JSON-lines reader, one line at a time
///
/// Each item is either a validated event or the reason its line was
/// rejected; a bad line never stops the stream. Any other I/O error is
/// yielded once and ends it.
pub struct RecordingReader<R> {
    lines: std::io::Lines<R>,
    line: usize,
    failed: bool,
}

impl<R: BufRead> RecordingReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            line: 0,
            failed: false,
        }
    }
}

impl<R: BufRead> Iterator for RecordingReader<R> {
    type Item = Result<ReplayEvent, RecordingError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        loop {
            let next = self.lines.next()?;
            self.line += 1;
            let raw = match next {
                Ok(raw) => raw,
                Err(e) if e.kind() == std::io::ErrorKind::InvalidData => {
                    return Some(Err(RecordingError::Encoding { line: self.line }));
                }
                Err(e) => {
                    self.failed = true;
                    return Some(Err(RecordingError::Io(e)));
                }
            };

            if raw.trim().is_empty() {
                continue;
            }

            let line = self.line;
            let event = serde_json::from_str::<RecordedEvent>(&raw)
                .map_err(|source| RecordingError::Json { line, source })
                .and_then(|event| {
                    event
                        .into_replay()
                        .map_err(|source| RecordingError::Landmarks { line, source })
                });
            return Some(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::core::fixtures::pointing_hand;

    fn frame_line(t: f64, frame: &Frame) -> String {
        serde_json::to_string(&RecordedEvent::from_frame(frame, t)).unwrap()
    }

    #[test]
    fn reads_hand_and_no_hand_frames() {
        let hand = pointing_hand();
        let input = format!(
            "{}\n\n{}\n",
            frame_line(0.0, &Frame::Hand(hand)),
            frame_line(33.0, &Frame::NoHand)
        );
        let events: Vec<ReplayEvent> = RecordingReader::new(input.as_bytes())
            .collect::<Result<_, _>>()
            .unwrap();

        assert_eq!(
            events,
            vec![
                ReplayEvent::Frame { at_ms: 0.0, frame: Frame::Hand(hand) },
                ReplayEvent::Frame { at_ms: 33.0, frame: Frame::NoHand },
            ]
        );
    }

    #[test]
    fn missing_landmarks_field_means_no_hand() {
        let input = r#"{"kind":"frame","t":5.0}"#;
        let event = RecordingReader::new(input.as_bytes()).next().unwrap().unwrap();
        assert_eq!(event, ReplayEvent::Frame { at_ms: 5.0, frame: Frame::NoHand });
    }

    #[test]
    fn short_landmark_set_is_rejected_but_stream_continues() {
        let input = concat!(
            r#"{"kind":"frame","t":0.0,"landmarks":[[0.1,0.2],[0.3,0.4]]}"#,
            "\n",
            r#"{"kind":"clear","t":1.0}"#,
            "\n",
        );
        let events: Vec<_> = RecordingReader::new(input.as_bytes()).collect();
        assert!(matches!(
            events[0],
            Err(RecordingError::Landmarks {
                line: 1,
                source: LandmarkError::WrongCount { actual: 2, .. }
            })
        ));
        assert!(matches!(events[1], Ok(ReplayEvent::Clear { .. })));
    }

    #[test]
    fn control_events_are_decoded() {
        let input = concat!(
            r##"{"kind":"color","t":1.0,"color":"#3ea6ff"}"##,
            "\n",
            r#"{"kind":"width","t":2.0,"width":12}"#,
            "\n",
            r#"{"kind":"download","t":3.0}"#,
        );
        let events: Vec<ReplayEvent> = RecordingReader::new(input.as_bytes())
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(
            events[0],
            ReplayEvent::SelectColor { at_ms: 1.0, color: "#3ea6ff".to_string() }
        );
        assert_eq!(events[1], ReplayEvent::SetWidth { at_ms: 2.0, width: 12 });
        assert_eq!(events[2].at_ms(), 3.0);
    }

    #[test]
    fn read_error_ends_the_stream() {
        let dir = tempfile::tempdir().unwrap();
        let file = std::fs::File::open(dir.path()).unwrap();
        let events: Vec<_> = RecordingReader::new(std::io::BufReader::new(file))
            .take(10)
            .collect();
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], Err(RecordingError::Io(_))));
    }

    #[test]
    fn invalid_utf8_line_is_skipped_and_counted() {
        let mut input = b"\xff\xfe\n".to_vec();
        input.extend_from_slice(b"not json\n");
        let events: Vec<_> = RecordingReader::new(input.as_slice()).collect();
        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], Err(RecordingError::Encoding { line: 1 })));
        assert!(matches!(events[1], Err(RecordingError::Json { line: 2, .. })));
    }

    #[test]
    fn invalid_json_reports_line_number() {
        let input = "{\"kind\":\"clear\",\"t\":0}\nnot json\n";
        let events: Vec<_> = RecordingReader::new(input.as_bytes()).collect();
        assert!(matches!(events[1], Err(RecordingError::Json { line: 2, .. })));
    }
}
