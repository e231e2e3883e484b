//! Confidence gate
//!
//! A derived sample is only as trustworthy as the weakest keypoint that went
//! into it. Samples under the floor stay in the time series for continuity
//! but are kept out of threshold-sensitive checks.

use crate::bridge::Landmark;

/// Confidence floor applied to derived samples
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ConfidenceGate {
    /// Minimum confidence to accept a sample for threshold checks
    floor: f32,
}

impl ConfidenceGate {
    pub fn new(floor: f32) -> Self {
        Self { floor }
    }

    pub fn floor(&self) -> f32 {
        self.floor
    }

    /// Does a sample with this confidence take part in threshold checks?
    pub fn passes(&self, confidence: f32) -> bool {
        confidence >= self.floor
    }

    /// Minimum confidence over the landmarks a value was derived from
    pub fn combined<'a, I>(landmarks: I) -> f32
    where
        I: IntoIterator<Item = &'a Landmark>,
    {
        landmarks
            .into_iter()
            .map(|l| l.confidence)
            .fold(1.0_f32, f32::min)
    }
}

impl Default for ConfidenceGate {
    fn default() -> Self {
        Self::new(0.5)
    }
}
