//! Feature track - the per-frame time series for one run
//!
//! Built in three steps: bridge isolated gaps, compute per-frame kinematics
//! in parallel, then walk the frames in order to difference the wrist height.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::confidence_gate::ConfidenceGate;
use super::interpolation::{bridge_gaps, BridgedFrame};
use super::kinematics::{resolve_side, FeatureExtractor, Kinematics, Side};
use super::state::FeatureSample;
use super::velocity::VerticalVelocityTracker;
use crate::bridge::{Detection, Frame};
use crate::config::AnalysisConfig;

/// Counts describing how much of the input was usable
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataQuality {
    pub frame_count: usize,
    /// Frames the pose estimator returned landmarks for
    pub detected_frames: usize,
    pub missing_frames: usize,
    /// Missing frames filled by interpolation
    pub interpolated_frames: usize,
    /// Frames without a feature sample
    pub gap_frames: usize,
    /// Indices the source never delivered
    #[serde(default)]
    pub skipped_frames: usize,
    pub low_confidence_samples: usize,
}

/// Frames and their (optional) samples, index-aligned
#[derive(Clone, Debug, PartialEq)]
pub struct FeatureTrack {
    pub side: Side,
    pub frames: Vec<Frame>,
    pub samples: Vec<Option<FeatureSample>>,
    pub quality: DataQuality,
}

impl FeatureTrack {
    /// Build the track from the raw stream
    pub fn build(frames: Vec<Frame>, detections: Vec<Detection>, config: &AnalysisConfig) -> Self {
        let detected_frames = detections.iter().filter(|d| !d.is_missing()).count();
        let bridged = bridge_gaps(&frames, detections);

        let side = resolve_side(
            config.shooting_hand,
            bridged.iter().filter_map(BridgedFrame::landmarks),
        );
        let gate = ConfidenceGate::new(config.confidence_floor);
        let extractor = FeatureExtractor::new(side, gate, config.use_depth);

        // Angles depend on one frame only
        let kinematics: Vec<Option<Kinematics>> = bridged
            .par_iter()
            .map(|frame| frame.landmarks().and_then(|set| extractor.kinematics(set)))
            .collect();

        // Velocity needs strict frame order
        let mut velocity = VerticalVelocityTracker::new(config.frame_interval_secs);
        let samples: Vec<Option<FeatureSample>> = frames
            .iter()
            .zip(&bridged)
            .zip(kinematics)
            .map(|((frame, bridged), k)| {
                let k = k?;
                let v = velocity.update(*frame, k.wrist_y);
                Some(FeatureSample {
                    frame_index: frame.index,
                    timestamp: frame.timestamp,
                    elbow_angle_deg: k.elbow_angle_deg,
                    knee_angle_deg: k.knee_angle_deg,
                    wrist_angle_deg: k.wrist_angle_deg,
                    vertical_hand_velocity: v,
                    hand_height: k.hand_height,
                    off_knee_angle_deg: k.off_knee_angle_deg,
                    confidence: k.confidence,
                    low_confidence: !gate.passes(k.confidence),
                    interpolated: bridged.is_interpolated(),
                })
            })
            .collect();

        let quality = DataQuality {
            frame_count: frames.len(),
            detected_frames,
            missing_frames: frames.len() - detected_frames,
            interpolated_frames: bridged.iter().filter(|b| b.is_interpolated()).count(),
            gap_frames: samples.iter().filter(|s| s.is_none()).count(),
            skipped_frames: skipped_indices(&frames),
            low_confidence_samples: samples.iter().flatten().filter(|s| s.low_confidence).count(),
        };
        debug!(?side, ?quality, "feature track built");

        Self {
            side,
            frames,
            samples,
            quality,
        }
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Samples that exist, in frame order
    pub fn present(&self) -> impl Iterator<Item = &FeatureSample> {
        self.samples.iter().flatten()
    }

    /// Existing samples whose frame index lies in `[start, end]`
    pub fn samples_in(&self, start: u64, end: u64) -> impl Iterator<Item = &FeatureSample> {
        self.present()
            .filter(move |s| s.frame_index >= start && s.frame_index <= end)
    }
}

/// Indices missing between consecutive delivered frames
fn skipped_indices(frames: &[Frame]) -> usize {
    frames
        .windows(2)
        .map(|pair| pair[1].index.saturating_sub(pair[0].index + 1) as usize)
        .sum()
}
