//! Analysis result - the terminal aggregate handed to callers

use serde::{Deserialize, Serialize};

use super::key_frames::KeyFrame;
use super::summary::Summary;
use crate::flaws::{FlawFinding, FlawType, InsufficientData};
use crate::physics::{DataQuality, FeatureSample, Side};
use crate::segment::PhasePartition;

/// Everything learned about one shot
///
/// Owned outright by the caller; the analyzer keeps nothing once it returns.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub shooting_hand: Side,
    /// Samples in frame order; frames without one are omitted
    pub samples: Vec<FeatureSample>,
    pub phases: PhasePartition,
    /// One finding per flaw type, most severe first
    pub findings: Vec<FlawFinding>,
    pub insufficient_data: Vec<InsufficientData>,
    pub summary: Summary,
    pub quality: DataQuality,
    pub key_frames: Vec<KeyFrame>,
}

impl AnalysisResult {
    pub fn finding(&self, flaw_type: FlawType) -> Option<&FlawFinding> {
        self.findings.iter().find(|f| f.flaw_type == flaw_type)
    }

    pub fn has_findings(&self) -> bool {
        !self.findings.is_empty()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
