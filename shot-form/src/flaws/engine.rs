//! Flaw detection engine
//!
//! The registry is a fixed list of `(Phase, Check)` pairs built once from
//! configuration. Detection runs every registered check against the
//! confident samples of its phase and collects findings and
//! insufficient-data records. Findings are not ranked or deduplicated here.

use tracing::debug;

use super::catalog::FlawType;
use super::checks::{Check, CheckOutcome, Envelope, Feature, Flag, FrameRule, Window};
use super::finding::{ExpectedRange, FlawFinding, InsufficientData};
use crate::config::AnalysisConfig;
use crate::physics::{FeatureSample, FeatureTrack};
use crate::segment::{Phase, PhasePartition};

/// Registered checks in catalog order
#[derive(Clone, Debug, PartialEq)]
pub struct CheckRegistry {
    entries: Vec<(Phase, Check)>,
}

impl CheckRegistry {
    pub fn from_config(config: &AnalysisConfig) -> Self {
        let ideal = &config.ideal;
        let tuning = &config.tuning;
        let scale = |flaw| config.calibration.for_flaw(flaw);

        let thumb_flick = Check::Oscillation {
            flaw: FlawType::ThumbFlick,
            max_amplitude: ideal.thumb_flick_amplitude_deg,
            window: tuning.flick_window_frames,
            min_reversals: tuning.flick_min_reversals,
            min_step_deg: tuning.flick_min_step_deg,
            scale: scale(FlawType::ThumbFlick),
        };
        let arc = |shape| Check::Envelope {
            flaw: FlawType::ArcInconsistency,
            shape,
            tolerance: ideal.arc_tolerance,
            reference_velocity: config.segmentation.release_velocity,
            scale: scale(FlawType::ArcInconsistency),
        };

        let entries = vec![
            // Elbow flare is judged at the point of release: the last
            // `release_window_frames` confident Release samples
            (
                Phase::Release,
                Check::Range {
                    flaw: FlawType::ElbowFlare,
                    feature: Feature::ElbowAngle,
                    range: ideal.elbow_release.into(),
                    rule: FrameRule::WorstFrame,
                    flag: Flag::Outside,
                    window: Window::Last(tuning.release_window_frames),
                    scale: scale(FlawType::ElbowFlare),
                },
            ),
            (
                Phase::LoadDip,
                Check::Range {
                    flaw: FlawType::InsufficientKneeBend,
                    feature: Feature::KneeAngle,
                    range: ideal.knee_load.into(),
                    rule: FrameRule::AtMinimum,
                    flag: Flag::Above,
                    window: Window::All,
                    scale: scale(FlawType::InsufficientKneeBend),
                },
            ),
            (Phase::Release, thumb_flick.clone()),
            (Phase::FollowThrough, thumb_flick),
            (
                Phase::Release,
                Check::Divergence {
                    flaw: FlawType::AsymmetricRelease,
                    tolerance: ideal.bilateral_tolerance_deg,
                    scale: scale(FlawType::AsymmetricRelease),
                },
            ),
            (
                Phase::Release,
                Check::EarlyBreak {
                    flaw: FlawType::PrematureWristBreak,
                    wrist_max_deg: ideal.wrist_cocked_max_deg,
                    elbow_below_deg: tuning.early_break_elbow_deg,
                    scale: scale(FlawType::PrematureWristBreak),
                },
            ),
            (
                Phase::FollowThrough,
                Check::Hold {
                    flaw: FlawType::ShortFollowThrough,
                    band: ideal.wrist_follow_through,
                    min_secs: ideal.follow_through_hold_secs,
                    scale: scale(FlawType::ShortFollowThrough),
                },
            ),
            (
                Phase::Release,
                Check::Range {
                    flaw: FlawType::LowReleasePoint,
                    feature: Feature::HandHeight,
                    range: ExpectedRange::at_least(ideal.release_height_min),
                    rule: FrameRule::AtMaximum,
                    flag: Flag::Below,
                    window: Window::All,
                    scale: scale(FlawType::LowReleasePoint),
                },
            ),
            (Phase::Release, arc(Envelope::Rise)),
            (Phase::FollowThrough, arc(Envelope::Fall)),
        ];

        Self { entries }
    }

    pub fn entries(&self) -> &[(Phase, Check)] {
        &self.entries
    }

    /// Checks registered for one phase, in catalog order
    pub fn for_phase(&self, phase: Phase) -> impl Iterator<Item = &Check> {
        self.entries
            .iter()
            .filter(move |(p, _)| *p == phase)
            .map(|(_, check)| check)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Raw engine output, before aggregation
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FlawScan {
    pub findings: Vec<FlawFinding>,
    pub insufficient: Vec<InsufficientData>,
}

pub struct FlawEngine {
    registry: CheckRegistry,
}

impl FlawEngine {
    pub fn new(config: &AnalysisConfig) -> Self {
        Self {
            registry: CheckRegistry::from_config(config),
        }
    }

    pub fn registry(&self) -> &CheckRegistry {
        &self.registry
    }

    /// Run every registered check over its phase's confident samples
    pub fn detect(&self, track: &FeatureTrack, partition: &PhasePartition) -> FlawScan {
        let mut scan = FlawScan::default();

        for phase in Phase::ALL {
            let span = partition.span(phase);
            let samples: Vec<FeatureSample> = track
                .samples_in(span.start, span.end)
                .filter(|s| s.is_confident())
                .cloned()
                .collect();

            for check in self.registry.for_phase(phase) {
                let flaw_type = check.flaw_type();
                match check.evaluate(&samples) {
                    CheckOutcome::Clean => {}
                    CheckOutcome::Flagged(evidence) => {
                        let finding = FlawFinding::new(
                            flaw_type,
                            phase,
                            evidence,
                            check.expected_range(),
                            check.scale(),
                        );
                        debug!(
                            flaw = flaw_type.code(),
                            phase = phase.name(),
                            frame = finding.frame_index,
                            severity = finding.severity,
                            "flaw detected"
                        );
                        scan.findings.push(finding);
                    }
                    CheckOutcome::Insufficient(reason) => {
                        debug!(flaw = flaw_type.code(), phase = phase.name(), ?reason, "check skipped");
                        scan.insufficient.push(InsufficientData {
                            phase,
                            flaw_type,
                            reason,
                        });
                    }
                }
            }
        }

        scan
    }
}
