//! Error types
//!
//! Only a handful of conditions ever stop an analysis run. Everything else
//! (detection gaps, ambiguous motion, thin data) degrades the result instead
//! and is reported inside `AnalysisResult`.

use serde::{Deserialize, Serialize};

/// Crate-wide result alias
pub type Result<T> = std::result::Result<T, AnalysisError>;

/// Failure reported by a frame source
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// Underlying reader failed (file, pipe, decoder)
    #[error("frame read failed: {0}")]
    Read(#[from] std::io::Error),

    /// Collaborator reported a failure it could not recover from
    #[error("frame source failed: {0}")]
    Fatal(String),
}

/// Configuration rejected at construction time
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for `{field}`: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

impl ConfigError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        ConfigError::InvalidValue {
            field,
            reason: reason.into(),
        }
    }
}

/// Terminal pipeline failure - the run produced no result
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error("frame source failed: {0}")]
    Source(#[from] SourceError),

    #[error("frame source produced no frames")]
    EmptyStream,

    #[error("stream ended after {frames} frame(s); at least {required} are needed to establish shot phases")]
    TooFewFrames { frames: usize, required: usize },

    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
}

/// Stable machine-readable reason for a terminal failure
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReasonCode {
    SourceFailure,
    EmptyStream,
    TooFewFrames,
    InvalidConfig,
}

impl ReasonCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReasonCode::SourceFailure => "source_failure",
            ReasonCode::EmptyStream => "empty_stream",
            ReasonCode::TooFewFrames => "too_few_frames",
            ReasonCode::InvalidConfig => "invalid_config",
        }
    }
}

impl std::fmt::Display for ReasonCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AnalysisError {
    pub fn reason_code(&self) -> ReasonCode {
        match self {
            AnalysisError::Source(_) => ReasonCode::SourceFailure,
            AnalysisError::EmptyStream => ReasonCode::EmptyStream,
            AnalysisError::TooFewFrames { .. } => ReasonCode::TooFewFrames,
            AnalysisError::Config(_) => ReasonCode::InvalidConfig,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reason_codes() {
        let err = AnalysisError::TooFewFrames {
            frames: 2,
            required: 3,
        };
        assert_eq!(err.reason_code(), ReasonCode::TooFewFrames);
        assert_eq!(err.reason_code().as_str(), "too_few_frames");

        let err: AnalysisError = SourceError::Fatal("decoder crashed".into()).into();
        assert_eq!(err.reason_code(), ReasonCode::SourceFailure);
        assert!(err.to_string().contains("decoder crashed"));
    }

    #[test]
    fn test_config_error_wraps() {
        let err: AnalysisError = ConfigError::invalid("confidence_floor", "must be in [0, 1]").into();
        assert_eq!(err.reason_code(), ReasonCode::InvalidConfig);
        assert!(err.to_string().contains("confidence_floor"));
    }
}
