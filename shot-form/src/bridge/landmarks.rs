//! Landmark data model
//!
//! Named body keypoints (MediaPipe Pose numbering), per-frame landmark sets
//! and the explicit "missing" marker used when the pose estimator fails.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

// ============================================================================
// KEYPOINTS (MediaPipe Pose - 33 total, only the ones the analysis reads)
// ============================================================================

/// Number of landmarks in a full MediaPipe Pose result
pub const POSE_LANDMARK_COUNT: usize = 33;

/// Body keypoints consumed by the shot analysis
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Keypoint {
    Nose,
    LeftShoulder,
    RightShoulder,
    LeftElbow,
    RightElbow,
    LeftWrist,
    RightWrist,
    LeftIndex,
    RightIndex,
    LeftHip,
    RightHip,
    LeftKnee,
    RightKnee,
    LeftAnkle,
    RightAnkle,
}

impl Keypoint {
    pub const ALL: [Keypoint; 15] = [
        Keypoint::Nose,
        Keypoint::LeftShoulder,
        Keypoint::RightShoulder,
        Keypoint::LeftElbow,
        Keypoint::RightElbow,
        Keypoint::LeftWrist,
        Keypoint::RightWrist,
        Keypoint::LeftIndex,
        Keypoint::RightIndex,
        Keypoint::LeftHip,
        Keypoint::RightHip,
        Keypoint::LeftKnee,
        Keypoint::RightKnee,
        Keypoint::LeftAnkle,
        Keypoint::RightAnkle,
    ];

    /// Index into a MediaPipe Pose landmark array
    pub fn mediapipe_index(&self) -> usize {
        match self {
            Keypoint::Nose => 0,
            Keypoint::LeftShoulder => 11,
            Keypoint::RightShoulder => 12,
            Keypoint::LeftElbow => 13,
            Keypoint::RightElbow => 14,
            Keypoint::LeftWrist => 15,
            Keypoint::RightWrist => 16,
            Keypoint::LeftIndex => 19,
            Keypoint::RightIndex => 20,
            Keypoint::LeftHip => 23,
            Keypoint::RightHip => 24,
            Keypoint::LeftKnee => 25,
            Keypoint::RightKnee => 26,
            Keypoint::LeftAnkle => 27,
            Keypoint::RightAnkle => 28,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Keypoint::Nose => "nose",
            Keypoint::LeftShoulder => "left_shoulder",
            Keypoint::RightShoulder => "right_shoulder",
            Keypoint::LeftElbow => "left_elbow",
            Keypoint::RightElbow => "right_elbow",
            Keypoint::LeftWrist => "left_wrist",
            Keypoint::RightWrist => "right_wrist",
            Keypoint::LeftIndex => "left_index",
            Keypoint::RightIndex => "right_index",
            Keypoint::LeftHip => "left_hip",
            Keypoint::RightHip => "right_hip",
            Keypoint::LeftKnee => "left_knee",
            Keypoint::RightKnee => "right_knee",
            Keypoint::LeftAnkle => "left_ankle",
            Keypoint::RightAnkle => "right_ankle",
        }
    }
}

/// Keypoints of one body side, as used by the feature extractor
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SideKeypoints {
    pub shoulder: Keypoint,
    pub elbow: Keypoint,
    pub wrist: Keypoint,
    pub index: Keypoint,
    pub hip: Keypoint,
    pub knee: Keypoint,
    pub ankle: Keypoint,
}

pub const RIGHT_SIDE: SideKeypoints = SideKeypoints {
    shoulder: Keypoint::RightShoulder,
    elbow: Keypoint::RightElbow,
    wrist: Keypoint::RightWrist,
    index: Keypoint::RightIndex,
    hip: Keypoint::RightHip,
    knee: Keypoint::RightKnee,
    ankle: Keypoint::RightAnkle,
};

pub const LEFT_SIDE: SideKeypoints = SideKeypoints {
    shoulder: Keypoint::LeftShoulder,
    elbow: Keypoint::LeftElbow,
    wrist: Keypoint::LeftWrist,
    index: Keypoint::LeftIndex,
    hip: Keypoint::LeftHip,
    knee: Keypoint::LeftKnee,
    ankle: Keypoint::LeftAnkle,
};

// ============================================================================
// LANDMARK DATA STRUCTURES
// ============================================================================

/// A single landmark: normalized image position, relative depth, confidence
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f32,          // 0-1 normalized, left to right
    pub y: f32,          // 0-1 normalized, top to bottom
    pub z: f32,          // Relative depth
    pub confidence: f32, // 0-1
}

impl Landmark {
    pub fn new(x: f32, y: f32, z: f32, confidence: f32) -> Self {
        Self { x, y, z, confidence }
    }

    /// Linear blend towards `other`; confidence is the weaker of the two
    pub fn lerp(&self, other: &Landmark, t: f32) -> Landmark {
        Landmark {
            x: self.x + (other.x - self.x) * t,
            y: self.y + (other.y - self.y) * t,
            z: self.z + (other.z - self.z) * t,
            confidence: self.confidence.min(other.confidence),
        }
    }
}

/// Landmarks detected in one frame, keyed by keypoint
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LandmarkSet {
    points: BTreeMap<Keypoint, Landmark>,
}

impl LandmarkSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, keypoint: Keypoint, landmark: Landmark) {
        self.points.insert(keypoint, landmark);
    }

    pub fn with(mut self, keypoint: Keypoint, landmark: Landmark) -> Self {
        self.insert(keypoint, landmark);
        self
    }

    pub fn get(&self, keypoint: Keypoint) -> Option<&Landmark> {
        self.points.get(&keypoint)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Keypoint, &Landmark)> {
        self.points.iter().map(|(k, l)| (*k, l))
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Blend two sets keypoint by keypoint; keypoints absent from either side are dropped
    pub fn interpolate(&self, other: &LandmarkSet, t: f32) -> LandmarkSet {
        let points = self
            .points
            .iter()
            .filter_map(|(k, a)| other.points.get(k).map(|b| (*k, a.lerp(b, t))))
            .collect();
        LandmarkSet { points }
    }
}

impl FromIterator<(Keypoint, Landmark)> for LandmarkSet {
    fn from_iter<I: IntoIterator<Item = (Keypoint, Landmark)>>(iter: I) -> Self {
        Self {
            points: iter.into_iter().collect(),
        }
    }
}

/// Pose estimator output for one frame
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Detection {
    Present(LandmarkSet),
    /// Detection failed (occlusion, low light, subject out of frame, malformed input)
    Missing,
}

impl Detection {
    pub fn landmarks(&self) -> Option<&LandmarkSet> {
        match self {
            Detection::Present(set) => Some(set),
            Detection::Missing => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Detection::Missing)
    }
}

/// One video frame: index and timestamp in seconds
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub index: u64,
    pub timestamp: f64,
}

impl Frame {
    pub fn new(index: u64, timestamp: f64) -> Self {
        Self { index, timestamp }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keypoint_names_serialize_snake_case() {
        let json = serde_json::to_string(&Keypoint::LeftElbow).unwrap();
        assert_eq!(json, "\"left_elbow\"");
        assert_eq!(Keypoint::RightAnkle.name(), "right_ankle");
    }

    #[test]
    fn test_mediapipe_indices_are_unique() {
        let mut seen = std::collections::BTreeSet::new();
        for kp in Keypoint::ALL {
            assert!(kp.mediapipe_index() < POSE_LANDMARK_COUNT);
            assert!(seen.insert(kp.mediapipe_index()));
        }
    }

    #[test]
    fn test_interpolate_drops_one_sided_keypoints() {
        let a = LandmarkSet::new()
            .with(Keypoint::RightWrist, Landmark::new(0.0, 10.0, 0.0, 0.9))
            .with(Keypoint::Nose, Landmark::new(0.5, 0.1, 0.0, 0.9));
        let b = LandmarkSet::new().with(Keypoint::RightWrist, Landmark::new(0.0, 20.0, 0.0, 0.6));

        let mid = a.interpolate(&b, 0.5);
        assert_eq!(mid.len(), 1);
        let wrist = mid.get(Keypoint::RightWrist).unwrap();
        assert!((wrist.y - 15.0).abs() < 1e-6);
        assert_eq!(wrist.confidence, 0.6);
    }
}
