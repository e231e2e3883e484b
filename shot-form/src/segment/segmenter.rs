//! Phase segmenter
//!
//! Drives the state machine over a feature track and turns its final state
//! into a partition. Low-confidence samples are skipped without touching
//! the state; detection gaps interrupt a pending release run.

use tracing::{debug, warn};

use super::fallback::{proportional_bounds, split_after_release};
use super::phase::{FallbackReason, Phase, PhasePartition, PhaseSpan, SegmentationConfidence};
use super::state_machine::{Observation, SegmentState, Thresholds};
use crate::config::{AnalysisConfig, PhaseSplit};
use crate::physics::FeatureTrack;

/// Fewest frames that can be split into three non-empty phases
pub const MIN_SEGMENT_FRAMES: usize = 3;

pub struct PhaseSegmenter {
    thresholds: Thresholds,
    split: PhaseSplit,
}

impl PhaseSegmenter {
    pub fn new(config: &AnalysisConfig) -> Self {
        Self {
            thresholds: Thresholds::from_config(config),
            split: config.segmentation.fallback_split,
        }
    }

    /// Partition the track, or `None` if it has fewer than three frames
    pub fn segment(&self, track: &FeatureTrack) -> Option<PhasePartition> {
        let n = track.len();
        if n < MIN_SEGMENT_FRAMES {
            return None;
        }

        let mut state = SegmentState::initial();
        for (pos, sample) in track.samples.iter().enumerate() {
            if state.is_terminal() {
                break;
            }
            state = match sample {
                None => state.interrupt(),
                Some(s) if s.low_confidence => state,
                Some(s) => state.advance(
                    Observation {
                        pos,
                        velocity: s.vertical_hand_velocity,
                        elbow_angle_deg: s.elbow_angle_deg,
                    },
                    &self.thresholds,
                ),
            };
        }

        let (b1, b2, confidence) = match state {
            SegmentState::FollowThrough {
                release_start,
                start,
            } => {
                debug!(release_start, follow_start = start, "phase transitions detected");
                (release_start, start, SegmentationConfidence::Detected)
            }
            SegmentState::Release { start, .. } => {
                let reason = FallbackReason::NoFollowThroughSignal;
                match split_after_release(n, start, &self.split) {
                    Some(b2) => {
                        warn!(release_start = start, "no follow-through signal, splitting remainder");
                        (start, b2, SegmentationConfidence::Fallback { reason })
                    }
                    None => self.full_fallback(n, reason),
                }
            }
            SegmentState::LoadDip { .. } => self.full_fallback(n, FallbackReason::NoReleaseSignal),
        };

        let span = |phase, from: usize, to: usize| PhaseSpan {
            phase,
            start: track.frames[from].index,
            end: track.frames[to].index,
        };
        Some(PhasePartition::new(
            [
                span(Phase::LoadDip, 0, b1 - 1),
                span(Phase::Release, b1, b2 - 1),
                span(Phase::FollowThrough, b2, n - 1),
            ],
            confidence,
        ))
    }

    fn full_fallback(
        &self,
        n: usize,
        reason: FallbackReason,
    ) -> (usize, usize, SegmentationConfidence) {
        let (b1, b2) = proportional_bounds(n, &self.split);
        warn!(?reason, frames = n, "falling back to proportional phase split");
        (b1, b2, SegmentationConfidence::Fallback { reason })
    }
}
