//! Shot Form - basketball shooting motion analysis
//!
//! Turns a stream of per-frame pose landmarks into shot phases, joint-angle
//! time series and a ranked list of form flaws. Only contains:
//! - Module declarations
//! - Re-exports of the public surface
//!
//! Stages, in data-flow order:
//! - `bridge`: pose landmarks in, frames and detections out
//! - `physics`: joint angles, hand velocity, confidence gating
//! - `segment`: LoadDip / Release / FollowThrough partition
//! - `flaws`: rule checks per phase
//! - `report`: dedup, ranking, summary

pub mod bridge;
pub mod config;
pub mod error;
pub mod flaws;
pub mod physics;
pub mod pipeline;
pub mod report;
pub mod segment;

// ============================================================================
// PUBLIC SURFACE
// ============================================================================

pub use config::{AnalysisConfig, AnalysisConfigBuilder, ShootingHand};
pub use error::{AnalysisError, ConfigError, ReasonCode, Result, SourceError};
pub use pipeline::ShotAnalyzer;
pub use report::AnalysisResult;

/// Everything needed to feed frames in and read a result out
pub mod prelude {
    pub use crate::bridge::{
        Detection, Frame, FrameInput, FrameSource, IterSource, JsonLinesSource, Keypoint, Landmark,
        LandmarkSet, PoseAdapter, StreamEvent,
    };
    pub use crate::config::{AnalysisConfig, ShootingHand};
    pub use crate::error::{AnalysisError, ReasonCode};
    pub use crate::flaws::{FlawFinding, FlawType};
    pub use crate::pipeline::ShotAnalyzer;
    pub use crate::report::AnalysisResult;
    pub use crate::segment::Phase;
}
