//! Per-frame kinematics
//!
//! Everything here depends on a single landmark set only, so it can run in
//! any order (and in parallel). Velocity is handled separately.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::angles::landmark_angle;
use super::confidence_gate::ConfidenceGate;
use crate::bridge::{Landmark, LandmarkSet, SideKeypoints, LEFT_SIDE, RIGHT_SIDE};
use crate::config::ShootingHand;

/// Shoulder-hip distances below this are treated as a broken skeleton
const MIN_TORSO_LENGTH: f32 = 1e-3;

/// Body side resolved for the shooting arm
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Right,
    Left,
}

impl Side {
    pub fn keypoints(&self) -> SideKeypoints {
        match self {
            Side::Right => RIGHT_SIDE,
            Side::Left => LEFT_SIDE,
        }
    }

    pub fn opposite(&self) -> Side {
        match self {
            Side::Right => Side::Left,
            Side::Left => Side::Right,
        }
    }
}

/// Order-independent signals for one frame
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Kinematics {
    pub elbow_angle_deg: f32,
    pub knee_angle_deg: f32,
    pub wrist_angle_deg: f32,
    /// Raw wrist image y, input to the velocity stage
    pub wrist_y: f32,
    pub hand_height: f32,
    pub off_knee_angle_deg: Option<f32>,
    pub confidence: f32,
}

/// Extracts kinematics for a fixed shooting side
#[derive(Clone, Copy, Debug)]
pub struct FeatureExtractor {
    side: Side,
    gate: ConfidenceGate,
    use_depth: bool,
}

impl FeatureExtractor {
    pub fn new(side: Side, gate: ConfidenceGate, use_depth: bool) -> Self {
        Self {
            side,
            gate,
            use_depth,
        }
    }

    pub fn side(&self) -> Side {
        self.side
    }

    /// Compute the frame's kinematics
    ///
    /// Returns `None` when a required shooting-side keypoint is absent or the
    /// torso is degenerate.
    pub fn kinematics(&self, set: &LandmarkSet) -> Option<Kinematics> {
        let kp = self.side.keypoints();
        let shoulder = set.get(kp.shoulder)?;
        let elbow = set.get(kp.elbow)?;
        let wrist = set.get(kp.wrist)?;
        let index = set.get(kp.index)?;
        let hip = set.get(kp.hip)?;
        let knee = set.get(kp.knee)?;
        let ankle = set.get(kp.ankle)?;

        let torso = ((shoulder.x - hip.x).powi(2) + (shoulder.y - hip.y).powi(2)).sqrt();
        if torso < MIN_TORSO_LENGTH {
            debug!(torso, "degenerate torso, skipping frame");
            return None;
        }

        let mut confidence =
            ConfidenceGate::combined([shoulder, elbow, wrist, index, hip, knee, ankle]);

        // The other leg only counts when it is tracked well enough to use
        let off_knee = self.off_knee(set).filter(|(_, c)| self.gate.passes(*c));
        if let Some((_, c)) = off_knee {
            confidence = confidence.min(c);
        }

        Some(Kinematics {
            elbow_angle_deg: landmark_angle(shoulder, elbow, wrist, self.use_depth),
            knee_angle_deg: landmark_angle(hip, knee, ankle, self.use_depth),
            wrist_angle_deg: landmark_angle(elbow, wrist, index, self.use_depth),
            wrist_y: wrist.y,
            hand_height: (shoulder.y - wrist.y) / torso,
            off_knee_angle_deg: off_knee.map(|(angle, _)| angle),
            confidence,
        })
    }

    fn off_knee(&self, set: &LandmarkSet) -> Option<(f32, f32)> {
        let kp = self.side.opposite().keypoints();
        let hip = set.get(kp.hip)?;
        let knee = set.get(kp.knee)?;
        let ankle = set.get(kp.ankle)?;
        Some((
            landmark_angle(hip, knee, ankle, self.use_depth),
            ConfidenceGate::combined([hip, knee, ankle]),
        ))
    }
}

/// Vertical travel of one side's wrist over the visible frames
fn wrist_travel<'a>(sets: impl Iterator<Item = &'a LandmarkSet>, side: Side) -> f32 {
    let wrist = side.keypoints().wrist;
    let (lo, hi) = sets
        .filter_map(|set| set.get(wrist))
        .map(|l: &Landmark| l.y)
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), y| (lo.min(y), hi.max(y)));
    if hi >= lo {
        hi - lo
    } else {
        0.0
    }
}

/// Decide which arm shoots
///
/// `Auto` picks the wrist with the larger vertical travel; ties go right.
pub fn resolve_side<'a, I>(hand: ShootingHand, sets: I) -> Side
where
    I: Iterator<Item = &'a LandmarkSet> + Clone,
{
    match hand {
        ShootingHand::Right => Side::Right,
        ShootingHand::Left => Side::Left,
        ShootingHand::Auto => {
            let right = wrist_travel(sets.clone(), Side::Right);
            let left = wrist_travel(sets, Side::Left);
            let side = if left > right { Side::Left } else { Side::Right };
            debug!(right, left, ?side, "resolved shooting hand");
            side
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::Keypoint;

    fn lm(x: f32, y: f32) -> Landmark {
        Landmark::new(x, y, 0.0, 0.9)
    }

    /// Upright right-handed shooter, arm at 90°, legs straight
    fn body() -> LandmarkSet {
        LandmarkSet::new()
            .with(Keypoint::RightShoulder, lm(0.5, 0.4))
            .with(Keypoint::RightElbow, lm(0.6, 0.4))
            .with(Keypoint::RightWrist, lm(0.6, 0.3))
            .with(Keypoint::RightIndex, lm(0.6, 0.25))
            .with(Keypoint::RightHip, lm(0.5, 0.6))
            .with(Keypoint::RightKnee, lm(0.5, 0.75))
            .with(Keypoint::RightAnkle, lm(0.5, 0.9))
    }

    #[test]
    fn test_kinematics_of_set_position() {
        let extractor = FeatureExtractor::new(Side::Right, ConfidenceGate::new(0.5), false);
        let k = extractor.kinematics(&body()).unwrap();

        assert!((k.elbow_angle_deg - 90.0).abs() < 1e-3);
        assert!((k.knee_angle_deg - 180.0).abs() < 1e-3);
        assert!((k.wrist_angle_deg - 180.0).abs() < 1e-3);
        assert!((k.hand_height - 0.5).abs() < 1e-5);
        assert_eq!(k.off_knee_angle_deg, None);
        assert!((k.confidence - 0.9).abs() < 1e-6);
    }

    #[test]
    fn test_missing_required_keypoint() {
        let extractor = FeatureExtractor::new(Side::Left, ConfidenceGate::new(0.5), false);
        assert!(extractor.kinematics(&body()).is_none());
    }

    #[test]
    fn test_weak_off_leg_is_ignored() {
        let set = body()
            .with(Keypoint::LeftHip, Landmark::new(0.45, 0.6, 0.0, 0.2))
            .with(Keypoint::LeftKnee, Landmark::new(0.45, 0.75, 0.0, 0.2))
            .with(Keypoint::LeftAnkle, Landmark::new(0.45, 0.9, 0.0, 0.2));
        let extractor = FeatureExtractor::new(Side::Right, ConfidenceGate::new(0.5), false);
        let k = extractor.kinematics(&set).unwrap();

        assert_eq!(k.off_knee_angle_deg, None);
        assert!((k.confidence - 0.9).abs() < 1e-6);
    }

    #[test]
    fn test_auto_side_follows_the_moving_wrist() {
        let low = LandmarkSet::new()
            .with(Keypoint::LeftWrist, lm(0.4, 0.6))
            .with(Keypoint::RightWrist, lm(0.6, 0.5));
        let high = LandmarkSet::new()
            .with(Keypoint::LeftWrist, lm(0.4, 0.2))
            .with(Keypoint::RightWrist, lm(0.6, 0.45));
        let sets = [low, high];

        assert_eq!(resolve_side(ShootingHand::Auto, sets.iter()), Side::Left);
        assert_eq!(resolve_side(ShootingHand::Right, sets.iter()), Side::Right);
    }
}
