//! Vertical hand velocity
//!
//! First difference of the wrist's vertical image coordinate between
//! consecutive valid samples, divided by the elapsed time. Image `y` grows
//! downward, so the sign is flipped: positive velocity means the hand rises.
//!
//! Strictly sequential - samples must arrive in increasing frame order.

use crate::bridge::Frame;

/// Velocity tracker over consecutive valid samples
pub struct VerticalVelocityTracker {
    /// Last valid sample (frame, wrist y)
    last: Option<(Frame, f32)>,
    /// Interval used when timestamps are unusable
    frame_interval_secs: f64,
}

impl VerticalVelocityTracker {
    pub fn new(frame_interval_secs: f64) -> Self {
        Self {
            last: None,
            frame_interval_secs,
        }
    }

    /// Record the wrist position for `frame`, returns upward velocity (units/s)
    ///
    /// The first sample has nothing to difference against and reports 0.
    pub fn update(&mut self, frame: Frame, wrist_y: f32) -> f32 {
        let velocity = match self.last {
            Some((prev, prev_y)) => {
                let dt = self.elapsed(&prev, &frame);
                ((prev_y - wrist_y) as f64 / dt) as f32
            }
            None => 0.0,
        };
        self.last = Some((frame, wrist_y));
        velocity
    }

    fn elapsed(&self, prev: &Frame, frame: &Frame) -> f64 {
        let dt = frame.timestamp - prev.timestamp;
        if dt > 0.0 {
            dt
        } else {
            frame.index.saturating_sub(prev.index).max(1) as f64 * self.frame_interval_secs
        }
    }
}

impl Default for VerticalVelocityTracker {
    fn default() -> Self {
        Self::new(1.0 / 30.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rising_hand_is_positive() {
        let mut tracker = VerticalVelocityTracker::new(1.0);
        assert_eq!(tracker.update(Frame::new(0, 0.0), 0.50), 0.0);
        let v = tracker.update(Frame::new(1, 0.5), 0.40);
        assert!((v - 0.2).abs() < 1e-5);
    }

    #[test]
    fn test_differences_across_a_gap_use_elapsed_time() {
        let mut tracker = VerticalVelocityTracker::new(1.0);
        tracker.update(Frame::new(0, 0.0), 0.5);
        let v = tracker.update(Frame::new(4, 2.0), 0.7);
        assert!((v + 0.1).abs() < 1e-5);
    }

    #[test]
    fn test_frozen_timestamps_fall_back_to_interval() {
        let mut tracker = VerticalVelocityTracker::new(0.5);
        tracker.update(Frame::new(0, 1.0), 0.5);
        let v = tracker.update(Frame::new(2, 1.0), 0.4);
        assert!((v - 0.1).abs() < 1e-5);
    }
}
