//! Segment module - splits a run into LoadDip, Release and FollowThrough
//!
//! Re-exports only. All logic in submodules.

mod fallback;
mod phase;
mod segmenter;
mod state_machine;

pub use fallback::{proportional_bounds, split_after_release};
pub use phase::{FallbackReason, Phase, PhasePartition, PhaseSpan, SegmentationConfidence};
pub use segmenter::{PhaseSegmenter, MIN_SEGMENT_FRAMES};
pub use state_machine::{Observation, SegmentState, Thresholds};
