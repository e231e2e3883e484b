//! Summary metrics
//!
//! Per-phase averages, severity-band counts and the overall form score.

use serde::{Deserialize, Serialize};

use crate::flaws::FlawFinding;
use crate::physics::{FeatureSample, FeatureTrack};
use crate::segment::{Phase, PhasePartition};

/// Upper bound (exclusive) of the low band
pub const LOW_BAND_MAX: f32 = 33.3;
/// Upper bound (exclusive) of the moderate band
pub const MODERATE_BAND_MAX: f32 = 66.7;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeverityBand {
    Low,
    Moderate,
    High,
}

impl SeverityBand {
    pub fn of(severity: f32) -> Self {
        if severity < LOW_BAND_MAX {
            SeverityBand::Low
        } else if severity < MODERATE_BAND_MAX {
            SeverityBand::Moderate
        } else {
            SeverityBand::High
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeverityCounts {
    pub low: usize,
    pub moderate: usize,
    pub high: usize,
}

impl SeverityCounts {
    pub fn tally(findings: &[FlawFinding]) -> Self {
        findings
            .iter()
            .fold(Self::default(), |mut counts, f| {
                match SeverityBand::of(f.severity) {
                    SeverityBand::Low => counts.low += 1,
                    SeverityBand::Moderate => counts.moderate += 1,
                    SeverityBand::High => counts.high += 1,
                }
                counts
            })
    }
}

/// Aggregates over one phase
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PhaseMetrics {
    pub phase: Phase,
    pub start_frame: u64,
    pub end_frame: u64,
    pub frame_count: usize,
    /// Frames with a feature sample
    pub sample_count: usize,
    pub confident_count: usize,
    pub mean_elbow_angle_deg: Option<f32>,
    pub mean_knee_angle_deg: Option<f32>,
    pub mean_wrist_angle_deg: Option<f32>,
    /// Largest upward hand velocity
    pub peak_velocity: Option<f32>,
}

impl PhaseMetrics {
    fn compute(phase: Phase, track: &FeatureTrack, partition: &PhasePartition) -> Self {
        let span = partition.span(phase);
        let frame_count = track
            .frames
            .iter()
            .filter(|f| span.contains(f.index))
            .count();
        let samples: Vec<&FeatureSample> = track.samples_in(span.start, span.end).collect();
        let confident: Vec<&FeatureSample> =
            samples.iter().copied().filter(|s| s.is_confident()).collect();

        let mean = |read: fn(&FeatureSample) -> f32| {
            (!confident.is_empty())
                .then(|| confident.iter().map(|s| read(s)).sum::<f32>() / confident.len() as f32)
        };

        Self {
            phase,
            start_frame: span.start,
            end_frame: span.end,
            frame_count,
            sample_count: samples.len(),
            confident_count: confident.len(),
            mean_elbow_angle_deg: mean(|s| s.elbow_angle_deg),
            mean_knee_angle_deg: mean(|s| s.knee_angle_deg),
            mean_wrist_angle_deg: mean(|s| s.wrist_angle_deg),
            peak_velocity: confident
                .iter()
                .map(|s| s.vertical_hand_velocity)
                .reduce(f32::max),
        }
    }
}

/// `100 - 0.5 * sum(severity_i * 0.5^i)` over ranked findings, in `[0, 100]`
///
/// Each extra flaw counts half as much as the one ranked above it.
pub fn form_score(ranked: &[FlawFinding]) -> f32 {
    let (penalty, _) = ranked
        .iter()
        .fold((0.0_f32, 1.0_f32), |(sum, weight), f| (sum + f.severity * weight, weight * 0.5));
    (100.0 - 0.5 * penalty).clamp(0.0, 100.0)
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub phases: Vec<PhaseMetrics>,
    pub severity_counts: SeverityCounts,
    pub form_score: f32,
}

impl Summary {
    pub fn build(track: &FeatureTrack, partition: &PhasePartition, ranked: &[FlawFinding]) -> Self {
        Self {
            phases: Phase::ALL
                .iter()
                .map(|&phase| PhaseMetrics::compute(phase, track, partition))
                .collect(),
            severity_counts: SeverityCounts::tally(ranked),
            form_score: form_score(ranked),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flaws::{ExpectedRange, FlawType};

    fn finding(severity: f32) -> FlawFinding {
        FlawFinding {
            flaw_type: FlawType::ElbowFlare,
            phase: Phase::Release,
            frame_index: 0,
            measured_value: 0.0,
            expected_range: ExpectedRange::at_most(0.0),
            deviation: 0.0,
            severity,
            coaching_tip: String::new(),
        }
    }

    #[test]
    fn test_severity_bands() {
        assert_eq!(SeverityBand::of(0.0), SeverityBand::Low);
        assert_eq!(SeverityBand::of(33.29), SeverityBand::Low);
        assert_eq!(SeverityBand::of(33.3), SeverityBand::Moderate);
        assert_eq!(SeverityBand::of(66.7), SeverityBand::High);
        assert_eq!(SeverityBand::of(100.0), SeverityBand::High);
    }

    #[test]
    fn test_form_score() {
        assert_eq!(form_score(&[]), 100.0);
        // 100 - 0.5 * (80 + 40 * 0.5 + 20 * 0.25) = 47.5
        assert_eq!(form_score(&[finding(80.0), finding(40.0), finding(20.0)]), 47.5);
        let worst: Vec<FlawFinding> = (0..8).map(|_| finding(100.0)).collect();
        assert!(form_score(&worst) >= 0.0);
    }

    #[test]
    fn test_counts() {
        let counts = SeverityCounts::tally(&[finding(10.0), finding(50.0), finding(90.0), finding(95.0)]);
        assert_eq!(
            counts,
            SeverityCounts {
                low: 1,
                moderate: 1,
                high: 2
            }
        );
    }
}
