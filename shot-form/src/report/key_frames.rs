//! Key frames for illustrating a result

use serde::{Deserialize, Serialize};

use crate::flaws::{FlawFinding, FlawType};
use crate::physics::{FeatureSample, FeatureTrack};
use crate::segment::{Phase, PhasePartition};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum KeyFrameKind {
    /// Deepest knee bend of the dip
    SetPoint,
    /// Highest hand position during release
    ReleasePoint,
    FollowThroughStart,
    FlawEvidence { flaw_type: FlawType },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyFrame {
    #[serde(flatten)]
    pub kind: KeyFrameKind,
    pub phase: Phase,
    pub frame_index: u64,
}

fn confident_in<'a>(
    track: &'a FeatureTrack,
    partition: &PhasePartition,
    phase: Phase,
) -> impl Iterator<Item = &'a FeatureSample> {
    let span = *partition.span(phase);
    track
        .samples_in(span.start, span.end)
        .filter(|s| s.is_confident())
}

/// Phase landmarks followed by one evidence frame per ranked finding
pub fn key_frames(
    track: &FeatureTrack,
    partition: &PhasePartition,
    ranked: &[FlawFinding],
) -> Vec<KeyFrame> {
    let mut frames = Vec::with_capacity(3 + ranked.len());

    let set_point = confident_in(track, partition, Phase::LoadDip)
        .reduce(|best, s| if s.knee_angle_deg < best.knee_angle_deg { s } else { best });
    if let Some(s) = set_point {
        frames.push(KeyFrame {
            kind: KeyFrameKind::SetPoint,
            phase: Phase::LoadDip,
            frame_index: s.frame_index,
        });
    }

    let release_point = confident_in(track, partition, Phase::Release)
        .reduce(|best, s| if s.hand_height > best.hand_height { s } else { best });
    if let Some(s) = release_point {
        frames.push(KeyFrame {
            kind: KeyFrameKind::ReleasePoint,
            phase: Phase::Release,
            frame_index: s.frame_index,
        });
    }

    frames.push(KeyFrame {
        kind: KeyFrameKind::FollowThroughStart,
        phase: Phase::FollowThrough,
        frame_index: partition.span(Phase::FollowThrough).start,
    });

    frames.extend(ranked.iter().map(|f| KeyFrame {
        kind: KeyFrameKind::FlawEvidence {
            flaw_type: f.flaw_type,
        },
        phase: f.phase,
        frame_index: f.frame_index,
    }));

    frames
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_frame_json_shape() {
        let frame = KeyFrame {
            kind: KeyFrameKind::FlawEvidence {
                flaw_type: FlawType::ElbowFlare,
            },
            phase: Phase::Release,
            frame_index: 120,
        };
        let json = serde_json::to_value(frame).unwrap();
        assert_eq!(json["kind"], "flaw_evidence");
        assert_eq!(json["flaw_type"], "elbow_flare");
        assert_eq!(json["frame_index"], 120);
    }
}
