//! Pose estimator adapter
//!
//! Converts the flat landmark arrays a MediaPipe-style pose estimator emits
//! into a `LandmarkSet`. Malformed input never raises: it becomes
//! `Detection::Missing` and the pipeline continues with a gap.

use tracing::warn;

use super::landmarks::{Detection, Keypoint, Landmark, LandmarkSet, POSE_LANDMARK_COUNT};

/// Values per landmark when visibility is included (x, y, z, visibility)
pub const VALUES_WITH_VISIBILITY: usize = 4;
/// Values per landmark without visibility (x, y, z)
pub const VALUES_WITHOUT_VISIBILITY: usize = 3;

/// Stateless adapter from raw pose arrays to landmark sets
#[derive(Clone, Copy, Debug, Default)]
pub struct PoseAdapter;

impl PoseAdapter {
    pub fn new() -> Self {
        Self
    }

    /// Adapt a flat array of 33 landmarks
    ///
    /// Accepts 132 values (x, y, z, visibility) or 99 values (x, y, z; full
    /// confidence assumed). Anything else, or any non-finite value among the
    /// keypoints we read, yields `Missing`.
    pub fn adapt(&self, data: &[f32]) -> Detection {
        let stride = match data.len() {
            n if n == POSE_LANDMARK_COUNT * VALUES_WITH_VISIBILITY => VALUES_WITH_VISIBILITY,
            n if n == POSE_LANDMARK_COUNT * VALUES_WITHOUT_VISIBILITY => VALUES_WITHOUT_VISIBILITY,
            n => {
                warn!(
                    len = n,
                    expected = POSE_LANDMARK_COUNT * VALUES_WITH_VISIBILITY,
                    "invalid landmark data length, treating frame as missing"
                );
                return Detection::Missing;
            }
        };

        let mut set = LandmarkSet::new();
        for keypoint in Keypoint::ALL {
            let base = keypoint.mediapipe_index() * stride;
            let x = data[base];
            let y = data[base + 1];
            let z = data[base + 2];
            let confidence = if stride == VALUES_WITH_VISIBILITY {
                data[base + 3]
            } else {
                1.0
            };

            if !(x.is_finite() && y.is_finite() && z.is_finite() && confidence.is_finite()) {
                warn!(keypoint = keypoint.name(), "non-finite landmark, treating frame as missing");
                return Detection::Missing;
            }

            set.insert(keypoint, Landmark::new(x, y, z, confidence.clamp(0.0, 1.0)));
        }

        Detection::Present(set)
    }
}
