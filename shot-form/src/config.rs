//! Analysis configuration
//!
//! One immutable `AnalysisConfig` is built (or loaded from JSON) before a run
//! and threaded by reference through every stage. Nothing in the pipeline
//! mutates it. All numeric defaults are product-tuned starting points.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::flaws::FlawType;

/// Which arm takes the shot
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShootingHand {
    Right,
    Left,
    /// Pick the side whose wrist travels furthest vertically
    #[default]
    Auto,
}

/// Closed interval `[min, max]`
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Band {
    pub min: f32,
    pub max: f32,
}

impl Band {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: f32) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Fractions used when the segmenter has to fall back to a fixed split
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhaseSplit {
    pub load_dip: f32,
    pub release: f32,
    pub follow_through: f32,
}

impl Default for PhaseSplit {
    fn default() -> Self {
        Self {
            load_dip: 0.40,
            release: 0.35,
            follow_through: 0.25,
        }
    }
}

/// Phase segmenter thresholds
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmentationConfig {
    /// Upward hand velocity (normalized units/s) that counts as "strongly upward"
    pub release_velocity: f32,
    /// Velocity at or below this counts as downward-or-static
    pub static_velocity: f32,
    /// Elbow angle treated as near-full extension
    pub extension_angle_deg: f32,
    /// Fallback split when no transition signal is usable
    pub fallback_split: PhaseSplit,
}

impl Default for SegmentationConfig {
    fn default() -> Self {
        Self {
            release_velocity: 0.25,
            static_velocity: 0.10,
            extension_angle_deg: 150.0,
            fallback_split: PhaseSplit::default(),
        }
    }
}

/// Ideal biomechanical ranges the flaw checks compare against
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IdealRanges {
    /// Elbow angle around the release point
    pub elbow_release: Band,
    /// Knee angle at the deepest point of the dip
    pub knee_load: Band,
    /// Wrist angle band that counts as a held follow-through
    pub wrist_follow_through: Band,
    /// Wrist angle above which the wrist has uncocked
    pub wrist_cocked_max_deg: f32,
    /// Minimum wrist height above the shoulder at release, in torso lengths
    pub release_height_min: f32,
    /// Allowed left/right knee divergence at release
    pub bilateral_tolerance_deg: f32,
    /// Allowed wrist oscillation amplitude inside the flick window
    pub thumb_flick_amplitude_deg: f32,
    /// Allowed velocity residual from the rise/fall envelope (fraction of peak)
    pub arc_tolerance: f32,
    /// Minimum time the follow-through should be held
    pub follow_through_hold_secs: f32,
}

impl Default for IdealRanges {
    fn default() -> Self {
        Self {
            elbow_release: Band::new(160.0, 180.0),
            knee_load: Band::new(110.0, 130.0),
            wrist_follow_through: Band::new(60.0, 150.0),
            wrist_cocked_max_deg: 160.0,
            release_height_min: 1.0,
            bilateral_tolerance_deg: 15.0,
            thumb_flick_amplitude_deg: 15.0,
            arc_tolerance: 0.2,
            follow_through_hold_secs: 0.25,
        }
    }
}

/// Deviation that maps to severity 100, per flaw type
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeverityCalibration {
    pub elbow_flare: f32,
    pub insufficient_knee_bend: f32,
    pub thumb_flick: f32,
    pub asymmetric_release: f32,
    pub premature_wrist_break: f32,
    pub short_follow_through: f32,
    pub low_release_point: f32,
    pub arc_inconsistency: f32,
}

impl Default for SeverityCalibration {
    fn default() -> Self {
        Self {
            elbow_flare: 40.0,
            insufficient_knee_bend: 40.0,
            thumb_flick: 30.0,
            asymmetric_release: 30.0,
            premature_wrist_break: 20.0,
            short_follow_through: 0.25,
            low_release_point: 0.6,
            arc_inconsistency: 0.6,
        }
    }
}

impl SeverityCalibration {
    pub fn for_flaw(&self, flaw: FlawType) -> f32 {
        match flaw {
            FlawType::ElbowFlare => self.elbow_flare,
            FlawType::InsufficientKneeBend => self.insufficient_knee_bend,
            FlawType::ThumbFlick => self.thumb_flick,
            FlawType::AsymmetricRelease => self.asymmetric_release,
            FlawType::PrematureWristBreak => self.premature_wrist_break,
            FlawType::ShortFollowThrough => self.short_follow_through,
            FlawType::LowReleasePoint => self.low_release_point,
            FlawType::ArcInconsistency => self.arc_inconsistency,
        }
    }
}

/// Window sizes and secondary thresholds used by individual checks
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckTuning {
    /// Trailing Release samples inspected by the elbow check
    pub release_window_frames: usize,
    /// Sliding window length for thumb-flick detection
    pub flick_window_frames: usize,
    /// Direction reversals needed inside one window
    pub flick_min_reversals: usize,
    /// Wrist steps smaller than this are ignored when counting reversals
    pub flick_min_step_deg: f32,
    /// Elbow angle below which an uncocked wrist is premature
    pub early_break_elbow_deg: f32,
}

impl Default for CheckTuning {
    fn default() -> Self {
        Self {
            release_window_frames: 3,
            flick_window_frames: 5,
            flick_min_reversals: 2,
            flick_min_step_deg: 3.0,
            early_break_elbow_deg: 140.0,
        }
    }
}

/// Complete configuration for one analyzer
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Samples below this confidence skip threshold-sensitive checks
    pub confidence_floor: f32,
    /// Consecutive samples a release signal must persist
    pub debounce_frames: usize,
    /// Frame interval used when timestamps are unusable
    pub frame_interval_secs: f64,
    pub shooting_hand: ShootingHand,
    /// Include landmark depth in angle computation
    pub use_depth: bool,
    pub segmentation: SegmentationConfig,
    pub ideal: IdealRanges,
    pub calibration: SeverityCalibration,
    pub tuning: CheckTuning,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            confidence_floor: 0.5,
            debounce_frames: 3,
            frame_interval_secs: 1.0 / 30.0,
            shooting_hand: ShootingHand::Auto,
            use_depth: false,
            segmentation: SegmentationConfig::default(),
            ideal: IdealRanges::default(),
            calibration: SeverityCalibration::default(),
            tuning: CheckTuning::default(),
        }
    }
}

impl AnalysisConfig {
    pub fn builder() -> AnalysisConfigBuilder {
        AnalysisConfigBuilder::new()
    }

    /// Parse and validate a JSON document; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: AnalysisConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.confidence_floor) {
            return Err(ConfigError::invalid("confidence_floor", "must be in [0, 1]"));
        }
        if self.debounce_frames == 0 {
            return Err(ConfigError::invalid("debounce_frames", "must be at least 1"));
        }
        if !(self.frame_interval_secs.is_finite() && self.frame_interval_secs > 0.0) {
            return Err(ConfigError::invalid("frame_interval_secs", "must be positive"));
        }

        let seg = &self.segmentation;
        if seg.release_velocity <= seg.static_velocity {
            return Err(ConfigError::invalid(
                "segmentation.release_velocity",
                "must exceed static_velocity",
            ));
        }
        if !(0.0..=180.0).contains(&seg.extension_angle_deg) {
            return Err(ConfigError::invalid(
                "segmentation.extension_angle_deg",
                "must be in [0, 180]",
            ));
        }
        let split = &seg.fallback_split;
        let fractions = [split.load_dip, split.release, split.follow_through];
        if fractions.iter().any(|f| !(f.is_finite() && *f > 0.0)) {
            return Err(ConfigError::invalid(
                "segmentation.fallback_split",
                "every fraction must be positive",
            ));
        }
        let total = split.load_dip + split.release + split.follow_through;
        if (total - 1.0).abs() > 1e-3 {
            return Err(ConfigError::invalid(
                "segmentation.fallback_split",
                format!("fractions must sum to 1 (got {total:.3})"),
            ));
        }

        for (field, band) in [
            ("ideal.elbow_release", self.ideal.elbow_release),
            ("ideal.knee_load", self.ideal.knee_load),
            ("ideal.wrist_follow_through", self.ideal.wrist_follow_through),
        ] {
            if !(band.min.is_finite() && band.max.is_finite()) {
                return Err(ConfigError::invalid(field, "bounds must be finite"));
            }
            if band.min > band.max {
                return Err(ConfigError::invalid(field, "min must not exceed max"));
            }
        }

        for flaw in FlawType::ALL {
            let scale = self.calibration.for_flaw(flaw);
            if !(scale.is_finite() && scale > 0.0) {
                return Err(ConfigError::invalid(
                    "calibration",
                    format!("scale for {} must be positive", flaw.code()),
                ));
            }
        }

        let tuning = &self.tuning;
        if tuning.release_window_frames == 0 {
            return Err(ConfigError::invalid("tuning.release_window_frames", "must be at least 1"));
        }
        if tuning.flick_window_frames < 3 {
            return Err(ConfigError::invalid(
                "tuning.flick_window_frames",
                "needs at least 3 samples to see a reversal",
            ));
        }

        Ok(())
    }
}

/// Builder for AnalysisConfig
#[derive(Debug, Default)]
pub struct AnalysisConfigBuilder {
    config: AnalysisConfig,
}

impl AnalysisConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: AnalysisConfig::default(),
        }
    }

    pub fn confidence_floor(mut self, floor: f32) -> Self {
        self.config.confidence_floor = floor;
        self
    }

    pub fn debounce_frames(mut self, frames: usize) -> Self {
        self.config.debounce_frames = frames;
        self
    }

    pub fn frame_interval_secs(mut self, secs: f64) -> Self {
        self.config.frame_interval_secs = secs;
        self
    }

    pub fn shooting_hand(mut self, hand: ShootingHand) -> Self {
        self.config.shooting_hand = hand;
        self
    }

    pub fn use_depth(mut self, enabled: bool) -> Self {
        self.config.use_depth = enabled;
        self
    }

    pub fn segmentation(mut self, segmentation: SegmentationConfig) -> Self {
        self.config.segmentation = segmentation;
        self
    }

    pub fn fallback_split(mut self, split: PhaseSplit) -> Self {
        self.config.segmentation.fallback_split = split;
        self
    }

    pub fn ideal(mut self, ideal: IdealRanges) -> Self {
        self.config.ideal = ideal;
        self
    }

    pub fn calibration(mut self, calibration: SeverityCalibration) -> Self {
        self.config.calibration = calibration;
        self
    }

    pub fn tuning(mut self, tuning: CheckTuning) -> Self {
        self.config.tuning = tuning;
        self
    }

    pub fn build(self) -> Result<AnalysisConfig, ConfigError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(AnalysisConfig::default().validate().is_ok());
    }

    #[test]
    fn test_builder_rejects_bad_floor() {
        let err = AnalysisConfig::builder().confidence_floor(1.5).build().unwrap_err();
        assert!(err.to_string().contains("confidence_floor"));
    }

    #[test]
    fn test_split_must_sum_to_one() {
        let err = AnalysisConfig::builder()
            .fallback_split(PhaseSplit {
                load_dip: 0.5,
                release: 0.5,
                follow_through: 0.5,
            })
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("fallback_split"));
    }

    #[test]
    fn test_nan_is_rejected() {
        let err = AnalysisConfig::builder()
            .fallback_split(PhaseSplit {
                load_dip: f32::NAN,
                release: 0.5,
                follow_through: 0.5,
            })
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("fallback_split"));

        let mut config = AnalysisConfig::default();
        config.ideal.knee_load = Band::new(f32::NAN, 130.0);
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("ideal.knee_load"));
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = AnalysisConfig::from_json(
            r#"{ "confidence_floor": 0.3, "ideal": { "knee_load": { "min": 100.0, "max": 125.0 } } }"#,
        )
        .unwrap();
        assert_eq!(config.confidence_floor, 0.3);
        assert_eq!(config.ideal.knee_load, Band::new(100.0, 125.0));
        assert_eq!(config.ideal.elbow_release, Band::new(160.0, 180.0));
        assert_eq!(config.debounce_frames, 3);
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            AnalysisConfig::from_json("{ not json"),
            Err(ConfigError::Parse(_))
        ));
    }
}
