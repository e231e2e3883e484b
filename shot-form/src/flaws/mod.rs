//! Flaws module - rule checks over segmented feature tracks
//!
//! Re-exports only. All logic in submodules.

mod catalog;
mod checks;
mod engine;
mod finding;
mod oscillation;

pub use catalog::FlawType;
pub use checks::{Check, CheckOutcome, Envelope, Feature, Flag, FrameRule, Window};
pub use engine::{CheckRegistry, FlawEngine, FlawScan};
pub use finding::{severity, Evidence, ExpectedRange, FlawFinding, InsufficientData, InsufficientReason};
pub use oscillation::{amplitude, count_reversals};
