//! JSON-lines frame source
//!
//! Reads one frame per line, the format pose-estimation dumps are usually
//! written in:
//!
//! ```text
//! {"frame_index": 0, "timestamp": 0.0, "landmarks": [x, y, z, v, ...]}
//! {"frame_index": 1, "timestamp": 0.033, "landmarks": null}
//! ```
//!
//! `landmarks: null` is a detection failure, and so is any `landmarks` value
//! that is not an array of numbers. Lines without a readable record are
//! skipped with a warning; only an I/O failure ends the stream with an error.

use std::io::BufRead;

use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use super::adapter::PoseAdapter;
use super::landmarks::{Detection, Frame};
use super::stream::{FrameInput, FrameSource, StreamEvent};
use crate::error::SourceError;

#[derive(Debug, Deserialize)]
struct FrameRecord {
    frame_index: u64,
    #[serde(default)]
    timestamp: Option<f64>,
    /// Anything but a numeric array is a missing detection
    #[serde(default)]
    landmarks: Option<Value>,
}

/// Flat landmark values, if every element is a number
fn numeric_values(value: &Value) -> Option<Vec<f32>> {
    value
        .as_array()?
        .iter()
        .map(|v| v.as_f64().map(|x| x as f32))
        .collect()
}

/// Frame source over a buffered reader of JSON lines
pub struct JsonLinesSource<R> {
    reader: R,
    adapter: PoseAdapter,
    /// Used to derive timestamps for records that omit them
    frame_interval_secs: f64,
    line_number: usize,
    buf: String,
}

impl<R: BufRead> JsonLinesSource<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            adapter: PoseAdapter::new(),
            frame_interval_secs: 1.0 / 30.0,
            line_number: 0,
            buf: String::new(),
        }
    }

    pub fn with_frame_interval(mut self, secs: f64) -> Self {
        self.frame_interval_secs = secs;
        self
    }

    fn parse_line(&self, line: &str) -> Option<FrameInput> {
        let record: FrameRecord = match serde_json::from_str(line) {
            Ok(record) => record,
            Err(err) => {
                warn!(line = self.line_number, error = %err, "skipping malformed frame record");
                return None;
            }
        };

        let timestamp = record
            .timestamp
            .filter(|t| t.is_finite())
            .unwrap_or(record.frame_index as f64 * self.frame_interval_secs);
        let detection = match record.landmarks.as_ref().map(numeric_values) {
            Some(Some(values)) => self.adapter.adapt(&values),
            Some(None) => {
                warn!(
                    line = self.line_number,
                    frame = record.frame_index,
                    "landmarks are not a numeric array, treating frame as missing"
                );
                Detection::Missing
            }
            None => Detection::Missing,
        };

        Some(FrameInput::new(Frame::new(record.frame_index, timestamp), detection))
    }
}

impl<R: BufRead> FrameSource for JsonLinesSource<R> {
    fn next_event(&mut self) -> Result<StreamEvent, SourceError> {
        loop {
            self.buf.clear();
            if self.reader.read_line(&mut self.buf)? == 0 {
                return Ok(StreamEvent::EndOfStream);
            }
            self.line_number += 1;

            let line = self.buf.trim();
            if line.is_empty() {
                continue;
            }
            if let Some(frame) = self.parse_line(line) {
                return Ok(StreamEvent::Frame(frame));
            }
        }
    }
}
