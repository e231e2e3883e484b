//! Physics module - landmarks to biomechanical time series
//!
//! Re-exports only. All logic in submodules.

mod angles;
mod confidence_gate;
mod interpolation;
mod kinematics;
mod state;
mod track;
mod velocity;

pub use angles::{joint_angle, landmark_angle, landmark_vector};
pub use confidence_gate::ConfidenceGate;
pub use interpolation::{bridge_gaps, BridgedFrame};
pub use kinematics::{resolve_side, FeatureExtractor, Kinematics, Side};
pub use state::FeatureSample;
pub use track::{DataQuality, FeatureTrack};
pub use velocity::VerticalVelocityTracker;
