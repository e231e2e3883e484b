//! Shot phases and the partition of a run into them

use serde::{Deserialize, Serialize};

/// Ordered stages of the shooting motion
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    LoadDip,
    Release,
    FollowThrough,
}

impl Phase {
    pub const ALL: [Phase; 3] = [Phase::LoadDip, Phase::Release, Phase::FollowThrough];

    pub fn name(&self) -> &'static str {
        match self {
            Phase::LoadDip => "load_dip",
            Phase::Release => "release",
            Phase::FollowThrough => "follow_through",
        }
    }

    fn ordinal(&self) -> usize {
        match self {
            Phase::LoadDip => 0,
            Phase::Release => 1,
            Phase::FollowThrough => 2,
        }
    }
}

/// Inclusive frame-index range owned by one phase
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseSpan {
    pub phase: Phase,
    pub start: u64,
    pub end: u64,
}

impl PhaseSpan {
    pub fn contains(&self, frame_index: u64) -> bool {
        frame_index >= self.start && frame_index <= self.end
    }
}

/// Why the segmenter fell back to a proportional split
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackReason {
    /// No debounced upward drive after a dip or hold
    NoReleaseSignal,
    /// Release found, but no velocity peak with an extended elbow after it
    NoFollowThroughSignal,
}

/// How the phase boundaries were obtained
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SegmentationConfidence {
    Detected,
    Fallback { reason: FallbackReason },
}

/// Three ordered, disjoint spans covering every frame of the run
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PhasePartition {
    spans: [PhaseSpan; 3],
    pub confidence: SegmentationConfidence,
}

impl PhasePartition {
    pub(crate) fn new(spans: [PhaseSpan; 3], confidence: SegmentationConfidence) -> Self {
        debug_assert!(spans.iter().all(|s| s.start <= s.end));
        debug_assert!(spans[0].end < spans[1].start && spans[1].end < spans[2].start);
        Self { spans, confidence }
    }

    pub fn spans(&self) -> &[PhaseSpan; 3] {
        &self.spans
    }

    pub fn span(&self, phase: Phase) -> &PhaseSpan {
        &self.spans[phase.ordinal()]
    }

    /// Phase owning a frame index, if the index lies inside the run
    pub fn phase_of(&self, frame_index: u64) -> Option<Phase> {
        self.spans
            .iter()
            .find(|s| s.contains(frame_index))
            .map(|s| s.phase)
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self.confidence, SegmentationConfidence::Fallback { .. })
    }
}
