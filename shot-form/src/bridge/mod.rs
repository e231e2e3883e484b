//! Bridge module - pose estimator ↔ analysis core
//!
//! Re-exports only. Logic lives in submodules.

mod adapter;
mod json_lines;
mod landmarks;
mod stream;

pub use adapter::{PoseAdapter, VALUES_WITHOUT_VISIBILITY, VALUES_WITH_VISIBILITY};
pub use json_lines::JsonLinesSource;
pub use landmarks::{
    Detection, Frame, Keypoint, Landmark, LandmarkSet, SideKeypoints,
    // Constants
    LEFT_SIDE, POSE_LANDMARK_COUNT, RIGHT_SIDE,
};
pub use stream::{FrameInput, FrameSource, IterSource, ResultSource, StreamEvent};
