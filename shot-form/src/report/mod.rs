//! Report module - findings to a ranked, summarized result
//!
//! Re-exports only. All logic in submodules.

mod aggregator;
mod key_frames;
mod result;
mod summary;

pub use aggregator::{aggregate, consolidate, deduplicate, rank};
pub use key_frames::{key_frames, KeyFrame, KeyFrameKind};
pub use result::AnalysisResult;
pub use summary::{
    form_score, PhaseMetrics, SeverityBand, SeverityCounts, Summary, LOW_BAND_MAX, MODERATE_BAND_MAX,
};
