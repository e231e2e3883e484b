//! Flaw checks
//!
//! A closed set of rule shapes. Each variant carries the thresholds it was
//! built with and evaluates over the confident samples of one phase, in
//! frame order. Checks never see low-confidence samples or other phases.

use super::catalog::FlawType;
use super::finding::{Evidence, ExpectedRange, InsufficientReason};
use super::oscillation::{amplitude, count_reversals};
use crate::config::Band;
use crate::physics::FeatureSample;

// ============================================================================
// Features and selection rules
// ============================================================================

/// A scalar signal read from a sample
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Feature {
    ElbowAngle,
    KneeAngle,
    WristAngle,
    VerticalVelocity,
    HandHeight,
    OffKneeAngle,
}

impl Feature {
    pub fn read(&self, s: &FeatureSample) -> Option<f32> {
        match self {
            Feature::ElbowAngle => Some(s.elbow_angle_deg),
            Feature::KneeAngle => Some(s.knee_angle_deg),
            Feature::WristAngle => Some(s.wrist_angle_deg),
            Feature::VerticalVelocity => Some(s.vertical_hand_velocity),
            Feature::HandHeight => Some(s.hand_height),
            Feature::OffKneeAngle => s.off_knee_angle_deg,
        }
    }
}

/// Which sample provides the evidence
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameRule {
    /// Largest deviation; ties go to the earlier frame
    WorstFrame,
    /// First sample outside the range
    FirstCrossing,
    /// Sample with the lowest value
    AtMinimum,
    /// Sample with the highest value
    AtMaximum,
}

/// Which side of the range counts as a flaw
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flag {
    Outside,
    Above,
    Below,
}

impl Flag {
    fn deviation(&self, range: &ExpectedRange, value: f32) -> f32 {
        match self {
            Flag::Outside => range.deviation(value),
            Flag::Above => range.above(value),
            Flag::Below => range.below(value),
        }
    }
}

/// Portion of the phase a range check looks at
///
/// A check registered with `Last(n)` judges the end of its phase only;
/// earlier samples of the phase never reach it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Window {
    All,
    /// The last `n` confident samples
    Last(usize),
}

impl Window {
    fn apply<'a>(&self, samples: &'a [FeatureSample]) -> &'a [FeatureSample] {
        match *self {
            Window::All => samples,
            Window::Last(n) => &samples[samples.len().saturating_sub(n)..],
        }
    }
}

/// Expected shape of the hand velocity over a phase
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Envelope {
    /// Monotone rise toward the release peak
    Rise,
    /// Monotone fall until the hand stops rising
    Fall,
}

// ============================================================================
// Check
// ============================================================================

#[derive(Clone, Debug, PartialEq)]
pub enum CheckOutcome {
    Clean,
    Flagged(Evidence),
    Insufficient(InsufficientReason),
}

#[derive(Clone, Debug, PartialEq)]
pub enum Check {
    Range {
        flaw: FlawType,
        feature: Feature,
        range: ExpectedRange,
        rule: FrameRule,
        flag: Flag,
        window: Window,
        scale: f32,
    },
    Oscillation {
        flaw: FlawType,
        max_amplitude: f32,
        window: usize,
        min_reversals: usize,
        min_step_deg: f32,
        scale: f32,
    },
    Divergence {
        flaw: FlawType,
        tolerance: f32,
        scale: f32,
    },
    EarlyBreak {
        flaw: FlawType,
        wrist_max_deg: f32,
        elbow_below_deg: f32,
        scale: f32,
    },
    Hold {
        flaw: FlawType,
        band: Band,
        min_secs: f32,
        scale: f32,
    },
    Envelope {
        flaw: FlawType,
        shape: Envelope,
        tolerance: f32,
        /// Lower bound on the normalizing peak velocity
        reference_velocity: f32,
        scale: f32,
    },
}

impl Check {
    pub fn flaw_type(&self) -> FlawType {
        match self {
            Check::Range { flaw, .. }
            | Check::Oscillation { flaw, .. }
            | Check::Divergence { flaw, .. }
            | Check::EarlyBreak { flaw, .. }
            | Check::Hold { flaw, .. }
            | Check::Envelope { flaw, .. } => *flaw,
        }
    }

    pub fn required_features(&self) -> &'static [Feature] {
        match self {
            Check::Range { feature, .. } => match feature {
                Feature::ElbowAngle => &[Feature::ElbowAngle],
                Feature::KneeAngle => &[Feature::KneeAngle],
                Feature::WristAngle => &[Feature::WristAngle],
                Feature::VerticalVelocity => &[Feature::VerticalVelocity],
                Feature::HandHeight => &[Feature::HandHeight],
                Feature::OffKneeAngle => &[Feature::OffKneeAngle],
            },
            Check::Oscillation { .. } => &[Feature::WristAngle],
            Check::Divergence { .. } => &[Feature::KneeAngle, Feature::OffKneeAngle],
            Check::EarlyBreak { .. } => &[Feature::WristAngle, Feature::ElbowAngle],
            Check::Hold { .. } => &[Feature::WristAngle],
            Check::Envelope { .. } => &[Feature::VerticalVelocity],
        }
    }

    /// Range reported alongside a finding
    pub fn expected_range(&self) -> ExpectedRange {
        match self {
            Check::Range { range, .. } => *range,
            Check::Oscillation { max_amplitude, .. } => ExpectedRange::at_most(*max_amplitude),
            Check::Divergence { tolerance, .. } => ExpectedRange::at_most(*tolerance),
            Check::EarlyBreak { wrist_max_deg, .. } => ExpectedRange::at_most(*wrist_max_deg),
            Check::Hold { min_secs, .. } => ExpectedRange::at_least(*min_secs),
            Check::Envelope { tolerance, .. } => ExpectedRange::at_most(*tolerance),
        }
    }

    /// Deviation scored as severity 100
    pub fn scale(&self) -> f32 {
        match self {
            Check::Range { scale, .. }
            | Check::Oscillation { scale, .. }
            | Check::Divergence { scale, .. }
            | Check::EarlyBreak { scale, .. }
            | Check::Hold { scale, .. }
            | Check::Envelope { scale, .. } => *scale,
        }
    }

    /// Evaluate over one phase's confident samples, in frame order
    pub fn evaluate(&self, samples: &[FeatureSample]) -> CheckOutcome {
        if samples.is_empty() {
            return CheckOutcome::Insufficient(InsufficientReason::NoConfidentSamples);
        }
        match self {
            Check::Range {
                feature,
                range,
                rule,
                flag,
                window,
                ..
            } => range_check(window.apply(samples), *feature, range, *rule, *flag),
            Check::Oscillation {
                max_amplitude,
                window,
                min_reversals,
                min_step_deg,
                ..
            } => oscillation_check(samples, *max_amplitude, *window, *min_reversals, *min_step_deg),
            Check::Divergence { tolerance, .. } => divergence_check(samples, *tolerance),
            Check::EarlyBreak {
                wrist_max_deg,
                elbow_below_deg,
                ..
            } => early_break_check(samples, *wrist_max_deg, *elbow_below_deg),
            Check::Hold { band, min_secs, .. } => hold_check(samples, band, *min_secs),
            Check::Envelope {
                shape,
                tolerance,
                reference_velocity,
                ..
            } => envelope_check(samples, *shape, *tolerance, *reference_velocity),
        }
    }
}

// ============================================================================
// Rule implementations
// ============================================================================

/// Keep the first candidate with the largest deviation
fn worst(candidates: impl Iterator<Item = Evidence>) -> CheckOutcome {
    let mut best: Option<Evidence> = None;
    for e in candidates {
        if e.deviation > 0.0 && best.map_or(true, |b| e.deviation > b.deviation) {
            best = Some(e);
        }
    }
    best.map_or(CheckOutcome::Clean, CheckOutcome::Flagged)
}

fn flagged_if_deviating(evidence: Evidence) -> CheckOutcome {
    if evidence.deviation > 0.0 {
        CheckOutcome::Flagged(evidence)
    } else {
        CheckOutcome::Clean
    }
}

fn range_check(
    samples: &[FeatureSample],
    feature: Feature,
    range: &ExpectedRange,
    rule: FrameRule,
    flag: Flag,
) -> CheckOutcome {
    let mut values = samples
        .iter()
        .filter_map(|s| feature.read(s).map(|v| (s.frame_index, v)))
        .map(|(frame_index, measured_value)| Evidence {
            frame_index,
            measured_value,
            deviation: flag.deviation(range, measured_value),
        });

    match rule {
        FrameRule::WorstFrame => worst(values),
        FrameRule::FirstCrossing => values
            .find(|e| e.deviation > 0.0)
            .map_or(CheckOutcome::Clean, CheckOutcome::Flagged),
        FrameRule::AtMinimum | FrameRule::AtMaximum => {
            let pick = values.reduce(|best, e| {
                let better = match rule {
                    FrameRule::AtMinimum => e.measured_value < best.measured_value,
                    _ => e.measured_value > best.measured_value,
                };
                if better {
                    e
                } else {
                    best
                }
            });
            match pick {
                Some(e) => flagged_if_deviating(e),
                None => CheckOutcome::Insufficient(InsufficientReason::NoConfidentSamples),
            }
        }
    }
}

fn oscillation_check(
    samples: &[FeatureSample],
    max_amplitude: f32,
    window: usize,
    min_reversals: usize,
    min_step_deg: f32,
) -> CheckOutcome {
    if samples.len() < window {
        return CheckOutcome::Insufficient(InsufficientReason::TooFewSamples {
            required: window,
            available: samples.len(),
        });
    }

    let wrist: Vec<f32> = samples.iter().map(|s| s.wrist_angle_deg).collect();
    let candidates = wrist.windows(window).enumerate().filter_map(|(start, w)| {
        if count_reversals(w, min_step_deg) < min_reversals {
            return None;
        }
        let amp = amplitude(w);
        Some(Evidence {
            frame_index: samples[start].frame_index,
            measured_value: amp,
            deviation: amp - max_amplitude,
        })
    });
    worst(candidates)
}

fn divergence_check(samples: &[FeatureSample], tolerance: f32) -> CheckOutcome {
    let mut bilateral = samples
        .iter()
        .filter_map(|s| s.off_knee_angle_deg.map(|off| (s.frame_index, (s.knee_angle_deg - off).abs())))
        .peekable();
    if bilateral.peek().is_none() {
        return CheckOutcome::Insufficient(InsufficientReason::MissingBilateralLandmarks);
    }
    worst(bilateral.map(|(frame_index, gap)| Evidence {
        frame_index,
        measured_value: gap,
        deviation: gap - tolerance,
    }))
}

fn early_break_check(samples: &[FeatureSample], wrist_max_deg: f32, elbow_below_deg: f32) -> CheckOutcome {
    samples
        .iter()
        .find(|s| s.wrist_angle_deg > wrist_max_deg && s.elbow_angle_deg < elbow_below_deg)
        .map_or(CheckOutcome::Clean, |s| {
            CheckOutcome::Flagged(Evidence {
                frame_index: s.frame_index,
                measured_value: s.wrist_angle_deg,
                deviation: s.wrist_angle_deg - wrist_max_deg,
            })
        })
}

fn hold_check(samples: &[FeatureSample], band: &Band, min_secs: f32) -> CheckOutcome {
    let t0 = samples[0].timestamp;
    let Some(exit) = samples.iter().find(|s| !band.contains(s.wrist_angle_deg)) else {
        // Held for as long as the phase was observed
        return CheckOutcome::Clean;
    };
    let held = (exit.timestamp - t0).max(0.0) as f32;
    flagged_if_deviating(Evidence {
        frame_index: exit.frame_index,
        measured_value: held,
        deviation: min_secs - held,
    })
}

fn envelope_check(
    samples: &[FeatureSample],
    shape: Envelope,
    tolerance: f32,
    reference_velocity: f32,
) -> CheckOutcome {
    let peak = samples
        .iter()
        .map(|s| s.vertical_hand_velocity.abs())
        .fold(reference_velocity, f32::max);

    let residual = |frame_index: u64, r: f32| Evidence {
        frame_index,
        measured_value: r / peak,
        deviation: r / peak - tolerance,
    };

    match shape {
        Envelope::Rise => {
            let mut running_max = f32::NEG_INFINITY;
            worst(samples.iter().map(|s| {
                let v = s.vertical_hand_velocity;
                running_max = running_max.max(v);
                residual(s.frame_index, running_max - v)
            }))
        }
        Envelope::Fall => {
            let mut running_min = f32::INFINITY;
            let mut apex_reached = false;
            worst(samples.iter().map_while(|s| {
                if apex_reached {
                    return None;
                }
                let v = s.vertical_hand_velocity;
                apex_reached = v <= 0.0;
                running_min = running_min.min(v);
                Some(residual(s.frame_index, v - running_min))
            }))
        }
    }
}
