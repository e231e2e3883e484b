//! Gap bridging
//!
//! A single dropped detection between two good frames is filled by linear
//! interpolation so one bad frame cannot produce a velocity spike. Two or
//! more consecutive drops are a real gap and stay empty. Indices the source
//! skipped count as drops, so the neighbours must be exactly one index away.

use crate::bridge::{Detection, Frame, LandmarkSet};

/// Landmarks available for one frame after bridging
#[derive(Clone, Debug, PartialEq)]
pub enum BridgedFrame {
    Observed(LandmarkSet),
    Interpolated(LandmarkSet),
    Gap,
}

impl BridgedFrame {
    pub fn landmarks(&self) -> Option<&LandmarkSet> {
        match self {
            BridgedFrame::Observed(set) | BridgedFrame::Interpolated(set) => Some(set),
            BridgedFrame::Gap => None,
        }
    }

    pub fn is_interpolated(&self) -> bool {
        matches!(self, BridgedFrame::Interpolated(_))
    }
}

/// Position of `frame` between `prev` and `next`, by timestamp
///
/// Falls back to frame indices when timestamps do not increase.
fn blend_factor(prev: &Frame, frame: &Frame, next: &Frame) -> f32 {
    let span = next.timestamp - prev.timestamp;
    if span > 0.0 {
        return ((frame.timestamp - prev.timestamp) / span).clamp(0.0, 1.0) as f32;
    }
    let span = next.index.saturating_sub(prev.index);
    if span == 0 {
        return 0.5;
    }
    (frame.index.saturating_sub(prev.index) as f32 / span as f32).clamp(0.0, 1.0)
}

/// Bridge isolated missing detections
///
/// `frames` and `detections` are parallel slices in stream order.
pub fn bridge_gaps(frames: &[Frame], detections: Vec<Detection>) -> Vec<BridgedFrame> {
    debug_assert_eq!(frames.len(), detections.len());

    let isolated = |i: usize| -> Option<LandmarkSet> {
        if !detections[i].is_missing() || i == 0 || i + 1 >= detections.len() {
            return None;
        }
        let (prev, frame, next) = (&frames[i - 1], &frames[i], &frames[i + 1]);
        if prev.index + 1 != frame.index || frame.index + 1 != next.index {
            return None;
        }
        let t = blend_factor(prev, frame, next);
        let before = detections[i - 1].landmarks()?;
        let after = detections[i + 1].landmarks()?;
        Some(before.interpolate(after, t))
    };
    let fills: Vec<Option<LandmarkSet>> = (0..detections.len()).map(isolated).collect();

    detections
        .into_iter()
        .zip(fills)
        .map(|(detection, fill)| match (detection, fill) {
            (Detection::Present(set), _) => BridgedFrame::Observed(set),
            (Detection::Missing, Some(set)) => BridgedFrame::Interpolated(set),
            (Detection::Missing, None) => BridgedFrame::Gap,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::{Keypoint, Landmark};

    fn wrist_at(y: f32) -> Detection {
        Detection::Present(
            LandmarkSet::new().with(Keypoint::RightWrist, Landmark::new(0.5, y, 0.0, 0.9)),
        )
    }

    fn frames(n: u64) -> Vec<Frame> {
        (0..n).map(|i| Frame::new(i, i as f64)).collect()
    }

    fn wrist_y(frame: &BridgedFrame) -> Option<f32> {
        frame
            .landmarks()
            .and_then(|set| set.get(Keypoint::RightWrist))
            .map(|l| l.y)
    }

    #[test]
    fn test_single_gap_is_interpolated() {
        let bridged = bridge_gaps(
            &frames(3),
            vec![wrist_at(10.0), Detection::Missing, wrist_at(20.0)],
        );
        assert!(bridged[1].is_interpolated());
        assert!((wrist_y(&bridged[1]).unwrap() - 15.0).abs() < 1e-5);
    }

    #[test]
    fn test_uneven_timestamps() {
        let frames = vec![Frame::new(0, 0.0), Frame::new(1, 0.25), Frame::new(2, 1.0)];
        let bridged = bridge_gaps(&frames, vec![wrist_at(0.0), Detection::Missing, wrist_at(8.0)]);
        assert!((wrist_y(&bridged[1]).unwrap() - 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_double_gap_stays_open() {
        let bridged = bridge_gaps(
            &frames(4),
            vec![wrist_at(10.0), Detection::Missing, Detection::Missing, wrist_at(20.0)],
        );
        assert_eq!(bridged[1], BridgedFrame::Gap);
        assert_eq!(bridged[2], BridgedFrame::Gap);
        assert!(matches!(bridged[3], BridgedFrame::Observed(_)));
    }

    #[test]
    fn test_skipped_index_next_to_a_drop_stays_open() {
        // Frame 1 never arrived and frame 2 has no detection
        let frames = vec![Frame::new(0, 0.0), Frame::new(2, 2.0), Frame::new(3, 3.0)];
        let bridged = bridge_gaps(&frames, vec![wrist_at(10.0), Detection::Missing, wrist_at(20.0)]);
        assert_eq!(bridged[1], BridgedFrame::Gap);

        let frames = vec![Frame::new(0, 0.0), Frame::new(1, 1.0), Frame::new(3, 3.0)];
        let bridged = bridge_gaps(&frames, vec![wrist_at(10.0), Detection::Missing, wrist_at(20.0)]);
        assert_eq!(bridged[1], BridgedFrame::Gap);
    }

    #[test]
    fn test_edges_cannot_be_bridged() {
        let bridged = bridge_gaps(
            &frames(3),
            vec![Detection::Missing, wrist_at(10.0), Detection::Missing],
        );
        assert_eq!(bridged[0], BridgedFrame::Gap);
        assert_eq!(bridged[2], BridgedFrame::Gap);
    }
}
