//! Result aggregation - deduplicate, rank, summarize

use std::collections::BTreeMap;

use tracing::info;

use super::key_frames::key_frames;
use super::result::AnalysisResult;
use super::summary::Summary;
use crate::flaws::{FlawFinding, FlawScan, FlawType};
use crate::physics::FeatureTrack;
use crate::segment::PhasePartition;

/// Keep one finding per flaw type: the most severe, ties to the earliest frame
///
/// Output is in catalog order.
pub fn deduplicate(findings: Vec<FlawFinding>) -> Vec<FlawFinding> {
    let mut kept: BTreeMap<FlawType, FlawFinding> = BTreeMap::new();
    for finding in findings {
        let replace = kept.get(&finding.flaw_type).map_or(true, |current| {
            finding.severity > current.severity
                || (finding.severity == current.severity && finding.frame_index < current.frame_index)
        });
        if replace {
            kept.insert(finding.flaw_type, finding);
        }
    }
    kept.into_values().collect()
}

/// Order by severity, then absolute deviation (both descending), then frame
///
/// The sort is stable, so exact ties keep their incoming order.
pub fn rank(findings: &mut [FlawFinding]) {
    findings.sort_by(|a, b| {
        b.severity
            .total_cmp(&a.severity)
            .then_with(|| b.deviation.abs().total_cmp(&a.deviation.abs()))
            .then_with(|| a.frame_index.cmp(&b.frame_index))
    });
}

/// Deduplicate then rank
pub fn consolidate(findings: Vec<FlawFinding>) -> Vec<FlawFinding> {
    let mut findings = deduplicate(findings);
    rank(&mut findings);
    findings
}

/// Assemble the terminal result; consumes the track
pub fn aggregate(track: FeatureTrack, phases: PhasePartition, scan: FlawScan) -> AnalysisResult {
    let findings = consolidate(scan.findings);
    let summary = Summary::build(&track, &phases, &findings);
    let key_frames = key_frames(&track, &phases, &findings);

    info!(
        findings = findings.len(),
        insufficient = scan.insufficient.len(),
        form_score = summary.form_score,
        fallback = phases.is_fallback(),
        "analysis complete"
    );

    AnalysisResult {
        shooting_hand: track.side,
        samples: track.samples.into_iter().flatten().collect(),
        phases,
        findings,
        insufficient_data: scan.insufficient,
        summary,
        quality: track.quality,
        key_frames,
    }
}
