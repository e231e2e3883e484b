//! Feature sample - per-frame biomechanical signals

use serde::{Deserialize, Serialize};

/// Derived signals for one frame
///
/// Angles are in degrees, velocity in normalized image units per second
/// (positive = hand rising), hand height in torso lengths above the shoulder.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FeatureSample {
    pub frame_index: u64,
    pub timestamp: f64,

    /// Shooting-arm elbow (shoulder-elbow-wrist)
    pub elbow_angle_deg: f32,
    /// Shooting-side knee (hip-knee-ankle)
    pub knee_angle_deg: f32,
    /// Shooting wrist (elbow-wrist-index finger), 180° = hand in line with forearm
    pub wrist_angle_deg: f32,
    pub vertical_hand_velocity: f32,
    pub hand_height: f32,
    /// Knee angle of the other leg, when both legs are tracked
    pub off_knee_angle_deg: Option<f32>,

    /// Weakest confidence among the keypoints used
    pub confidence: f32,
    /// Below the confidence floor: kept for continuity, skipped by checks
    pub low_confidence: bool,
    /// Derived from a bridged single-frame gap
    pub interpolated: bool,
}

impl FeatureSample {
    /// Eligible for threshold-sensitive checks
    pub fn is_confident(&self) -> bool {
        !self.low_confidence
    }
}
