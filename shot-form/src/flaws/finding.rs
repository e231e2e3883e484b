//! Findings and insufficient-data records

use serde::{Deserialize, Serialize};

use super::catalog::FlawType;
use crate::config::Band;
use crate::segment::Phase;

/// Acceptable range with optional bounds
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExpectedRange {
    pub min: Option<f32>,
    pub max: Option<f32>,
}

impl ExpectedRange {
    pub fn between(min: f32, max: f32) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
        }
    }

    pub fn at_least(min: f32) -> Self {
        Self {
            min: Some(min),
            max: None,
        }
    }

    pub fn at_most(max: f32) -> Self {
        Self {
            min: None,
            max: Some(max),
        }
    }

    /// How far `value` exceeds the upper bound (0 inside or without one)
    pub fn above(&self, value: f32) -> f32 {
        self.max.map_or(0.0, |max| (value - max).max(0.0))
    }

    /// How far `value` falls short of the lower bound
    pub fn below(&self, value: f32) -> f32 {
        self.min.map_or(0.0, |min| (min - value).max(0.0))
    }

    /// Distance outside the range on either side
    pub fn deviation(&self, value: f32) -> f32 {
        self.above(value).max(self.below(value))
    }

    pub fn contains(&self, value: f32) -> bool {
        self.deviation(value) == 0.0
    }
}

impl From<Band> for ExpectedRange {
    fn from(band: Band) -> Self {
        ExpectedRange::between(band.min, band.max)
    }
}

/// Map a deviation onto `[0, 100]`; `scale` is the deviation scored 100
pub fn severity(deviation: f32, scale: f32) -> f32 {
    if scale <= 0.0 || !deviation.is_finite() {
        return 0.0;
    }
    (100.0 * deviation / scale).clamp(0.0, 100.0)
}

/// What a check observed at its evidence frame
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Evidence {
    pub frame_index: u64,
    pub measured_value: f32,
    pub deviation: f32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FlawFinding {
    pub flaw_type: FlawType,
    pub phase: Phase,
    /// Evidence frame, inside the phase's span
    pub frame_index: u64,
    pub measured_value: f32,
    pub expected_range: ExpectedRange,
    /// Raw distance outside `expected_range`, in the measured unit
    pub deviation: f32,
    /// 0 (negligible) to 100 (severe)
    pub severity: f32,
    pub coaching_tip: String,
}

impl FlawFinding {
    pub fn new(
        flaw_type: FlawType,
        phase: Phase,
        evidence: Evidence,
        expected_range: ExpectedRange,
        scale: f32,
    ) -> Self {
        Self {
            flaw_type,
            phase,
            frame_index: evidence.frame_index,
            measured_value: evidence.measured_value,
            expected_range,
            deviation: evidence.deviation,
            severity: severity(evidence.deviation, scale),
            coaching_tip: flaw_type.coaching_tip().to_string(),
        }
    }
}

/// Why a check could not run
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InsufficientReason {
    /// Every sample in the phase was missing or below the confidence floor
    NoConfidentSamples,
    /// The non-shooting leg was never tracked well enough
    MissingBilateralLandmarks,
    TooFewSamples { required: usize, available: usize },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsufficientData {
    pub phase: Phase,
    pub flaw_type: FlawType,
    pub reason: InsufficientReason,
}
