//! Flaw catalog
//!
//! Declaration order is the tie-break order used when ranking findings.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlawType {
    ElbowFlare,
    InsufficientKneeBend,
    ThumbFlick,
    AsymmetricRelease,
    PrematureWristBreak,
    ShortFollowThrough,
    LowReleasePoint,
    ArcInconsistency,
}

impl FlawType {
    pub const ALL: [FlawType; 8] = [
        FlawType::ElbowFlare,
        FlawType::InsufficientKneeBend,
        FlawType::ThumbFlick,
        FlawType::AsymmetricRelease,
        FlawType::PrematureWristBreak,
        FlawType::ShortFollowThrough,
        FlawType::LowReleasePoint,
        FlawType::ArcInconsistency,
    ];

    /// Stable identifier, also the serialized form
    pub fn code(&self) -> &'static str {
        match self {
            FlawType::ElbowFlare => "elbow_flare",
            FlawType::InsufficientKneeBend => "insufficient_knee_bend",
            FlawType::ThumbFlick => "thumb_flick",
            FlawType::AsymmetricRelease => "asymmetric_release",
            FlawType::PrematureWristBreak => "premature_wrist_break",
            FlawType::ShortFollowThrough => "short_follow_through",
            FlawType::LowReleasePoint => "low_release_point",
            FlawType::ArcInconsistency => "arc_inconsistency",
        }
    }

    pub fn coaching_tip(&self) -> &'static str {
        match self {
            FlawType::ElbowFlare => {
                "Keep the shooting elbow under the ball and finish with the arm fully extended toward the rim."
            }
            FlawType::InsufficientKneeBend => {
                "Sink into your legs before the shot; the power should start from a deeper knee bend."
            }
            FlawType::ThumbFlick => {
                "Let the ball roll off the index and middle fingers; keep the guide-hand thumb quiet."
            }
            FlawType::AsymmetricRelease => {
                "Land and rise evenly on both legs so the release stays square to the basket."
            }
            FlawType::PrematureWristBreak => {
                "Hold the wrist cocked until the elbow has extended, then snap through at the top."
            }
            FlawType::ShortFollowThrough => {
                "Hold the gooseneck until the ball reaches the rim."
            }
            FlawType::LowReleasePoint => {
                "Release the ball higher, above the forehead, to get a better arc over defenders."
            }
            FlawType::ArcInconsistency => {
                "Make the upward drive one smooth motion; avoid hitches between the dip and the release."
            }
        }
    }

    /// Position in the catalog
    pub fn ordinal(&self) -> usize {
        *self as usize
    }
}

impl std::fmt::Display for FlawType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_match_serde() {
        for flaw in FlawType::ALL {
            let json = serde_json::to_string(&flaw).unwrap();
            assert_eq!(json, format!("\"{}\"", flaw.code()));
        }
    }

    #[test]
    fn test_ordinal_is_declaration_order() {
        for (i, flaw) in FlawType::ALL.iter().enumerate() {
            assert_eq!(flaw.ordinal(), i);
        }
        assert!(FlawType::ElbowFlare < FlawType::ArcInconsistency);
    }
}
