//! Shot analyzer - wires the stages together
//!
//! Pulls the whole stream, builds the feature track, segments it, runs the
//! flaw checks and aggregates. Holds only the validated configuration, so a
//! single analyzer can serve many runs (and threads) at once.

use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::bridge::{Detection, Frame, FrameSource, StreamEvent};
use crate::config::AnalysisConfig;
use crate::error::{AnalysisError, Result};
use crate::flaws::FlawEngine;
use crate::physics::FeatureTrack;
use crate::report::{aggregate, AnalysisResult};
use crate::segment::{PhaseSegmenter, MIN_SEGMENT_FRAMES};

#[derive(Clone, Debug)]
pub struct ShotAnalyzer {
    config: AnalysisConfig,
}

impl ShotAnalyzer {
    /// Validate the configuration and build an analyzer
    pub fn new(config: AnalysisConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Analyze one shot
    ///
    /// Reads until `EndOfStream`. A source error aborts the run with no
    /// partial result.
    #[tracing::instrument(skip_all)]
    pub fn analyze<S: FrameSource>(&self, mut source: S) -> Result<AnalysisResult> {
        let (frames, detections) = collect_stream(&mut source)?;

        if frames.is_empty() {
            warn!("stream ended before any frame");
            return Err(AnalysisError::EmptyStream);
        }
        if frames.len() < MIN_SEGMENT_FRAMES {
            warn!(frames = frames.len(), "too few frames to segment");
            return Err(AnalysisError::TooFewFrames {
                frames: frames.len(),
                required: MIN_SEGMENT_FRAMES,
            });
        }
        info!(frames = frames.len(), "stream collected");

        let track = FeatureTrack::build(frames, detections, &self.config);
        let phases = PhaseSegmenter::new(&self.config)
            .segment(&track)
            .ok_or(AnalysisError::TooFewFrames {
                frames: track.len(),
                required: MIN_SEGMENT_FRAMES,
            })?;
        let scan = FlawEngine::new(&self.config).detect(&track, &phases);

        Ok(aggregate(track, phases, scan))
    }

    /// Analyze independent shots in parallel on the rayon pool
    ///
    /// Results keep the order of `sources`.
    pub fn analyze_batch<S>(&self, sources: Vec<S>) -> Vec<Result<AnalysisResult>>
    where
        S: FrameSource + Send,
    {
        info!(shots = sources.len(), "batch analysis");
        sources
            .into_par_iter()
            .map(|source| self.analyze(source))
            .collect()
    }
}

/// Pull every frame, dropping any whose index does not increase
fn collect_stream<S: FrameSource>(source: &mut S) -> Result<(Vec<Frame>, Vec<Detection>)> {
    let mut frames: Vec<Frame> = Vec::new();
    let mut detections = Vec::new();

    loop {
        match source.next_event()? {
            StreamEvent::EndOfStream => break,
            StreamEvent::Frame(input) => {
                if let Some(last) = frames.last() {
                    if input.frame.index <= last.index {
                        warn!(
                            index = input.frame.index,
                            last = last.index,
                            "out-of-order frame dropped"
                        );
                        continue;
                    }
                }
                frames.push(input.frame);
                detections.push(input.detection);
            }
        }
    }

    debug!(
        frames = frames.len(),
        missing = detections.iter().filter(|d| d.is_missing()).count(),
        "end of stream"
    );
    Ok((frames, detections))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::{FrameInput, IterSource, ResultSource};
    use crate::error::{ReasonCode, SourceError};

    fn missing(index: u64) -> FrameInput {
        FrameInput::missing(Frame::new(index, index as f64 / 30.0))
    }

    #[test]
    fn test_empty_stream() {
        let analyzer = ShotAnalyzer::new(AnalysisConfig::default()).unwrap();
        let err = analyzer.analyze(IterSource::new(Vec::<FrameInput>::new())).unwrap_err();
        assert_eq!(err.reason_code(), ReasonCode::EmptyStream);
    }

    #[test]
    fn test_two_frames_is_too_few() {
        let analyzer = ShotAnalyzer::new(AnalysisConfig::default()).unwrap();
        let err = analyzer
            .analyze(IterSource::new(vec![missing(0), missing(1)]))
            .unwrap_err();
        assert!(matches!(err, AnalysisError::TooFewFrames { frames: 2, required: 3 }));
    }

    #[test]
    fn test_out_of_order_frames_are_dropped() {
        let analyzer = ShotAnalyzer::new(AnalysisConfig::default()).unwrap();
        // 0, 1, 1, 0, 2 keeps three frames
        let result = analyzer
            .analyze(IterSource::new(vec![
                missing(0),
                missing(1),
                missing(1),
                missing(0),
                missing(2),
            ]))
            .unwrap();
        assert_eq!(result.quality.frame_count, 3);
        assert!(result.phases.is_fallback());
    }

    #[test]
    fn test_source_failure_is_fatal() {
        let analyzer = ShotAnalyzer::new(AnalysisConfig::default()).unwrap();
        let err = analyzer
            .analyze(ResultSource::new(vec![
                Ok(missing(0)),
                Ok(missing(1)),
                Err(SourceError::Fatal("decoder crashed".into())),
                Ok(missing(2)),
            ]))
            .unwrap_err();
        assert_eq!(err.reason_code(), ReasonCode::SourceFailure);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = AnalysisConfig {
            debounce_frames: 0,
            ..AnalysisConfig::default()
        };
        let err = ShotAnalyzer::new(config).unwrap_err();
        assert_eq!(err.reason_code(), ReasonCode::InvalidConfig);
    }
}
