//! Forward-only phase state machine
//!
//! The machine is a plain value: feed it one confident observation at a time
//! and it returns the next state. Once a boundary is committed it is never
//! revisited. How frames are iterated is up to the caller.

use super::phase::Phase;
use crate::config::AnalysisConfig;

/// The signals the segmenter reads from one sample
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Observation {
    /// Position of the sample in the run (0-based, not the frame index)
    pub pos: usize,
    pub velocity: f32,
    pub elbow_angle_deg: f32,
}

/// Transition thresholds, lifted from the configuration once per run
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Thresholds {
    pub release_velocity: f32,
    pub static_velocity: f32,
    pub extension_angle_deg: f32,
    pub debounce_frames: usize,
}

impl Thresholds {
    pub fn from_config(config: &AnalysisConfig) -> Self {
        Self {
            release_velocity: config.segmentation.release_velocity,
            static_velocity: config.segmentation.static_velocity,
            extension_angle_deg: config.segmentation.extension_angle_deg,
            debounce_frames: config.debounce_frames.max(1),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum SegmentState {
    LoadDip {
        /// A downward-or-static sample has been seen
        armed: bool,
        /// Consecutive strongly-upward samples not yet committed
        run: Vec<Observation>,
    },
    Release {
        start: usize,
        last: Observation,
    },
    FollowThrough {
        release_start: usize,
        start: usize,
    },
}

impl SegmentState {
    pub fn initial() -> Self {
        SegmentState::LoadDip {
            armed: false,
            run: Vec::new(),
        }
    }

    pub fn phase(&self) -> Phase {
        match self {
            SegmentState::LoadDip { .. } => Phase::LoadDip,
            SegmentState::Release { .. } => Phase::Release,
            SegmentState::FollowThrough { .. } => Phase::FollowThrough,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, SegmentState::FollowThrough { .. })
    }

    /// Transition on one confident observation
    pub fn advance(self, obs: Observation, t: &Thresholds) -> SegmentState {
        match self {
            SegmentState::LoadDip { armed, mut run } => {
                if !armed {
                    let armed = obs.velocity <= t.static_velocity;
                    return SegmentState::LoadDip { armed, run };
                }
                if obs.velocity < t.release_velocity {
                    run.clear();
                    return SegmentState::LoadDip { armed, run };
                }

                run.push(obs);
                if run.len() < t.debounce_frames {
                    return SegmentState::LoadDip { armed, run };
                }

                // Debounced: Release begins at the first sample of the run,
                // and the rest of the run is replayed into the new state
                let first = run[0];
                run[1..].iter().fold(
                    SegmentState::Release {
                        start: first.pos,
                        last: first,
                    },
                    |state, o| state.advance(*o, t),
                )
            }
            SegmentState::Release { start, last } => {
                let past_peak = obs.velocity < last.velocity;
                if past_peak && obs.elbow_angle_deg >= t.extension_angle_deg {
                    SegmentState::FollowThrough {
                        release_start: start,
                        start: obs.pos,
                    }
                } else {
                    SegmentState::Release { start, last: obs }
                }
            }
            terminal @ SegmentState::FollowThrough { .. } => terminal,
        }
    }

    /// A detection gap: an uncommitted release run cannot span it
    pub fn interrupt(self) -> SegmentState {
        match self {
            SegmentState::LoadDip { armed, mut run } => {
                run.clear();
                SegmentState::LoadDip { armed, run }
            }
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const T: Thresholds = Thresholds {
        release_velocity: 0.25,
        static_velocity: 0.1,
        extension_angle_deg: 150.0,
        debounce_frames: 3,
    };

    fn obs(pos: usize, velocity: f32, elbow: f32) -> Observation {
        Observation {
            pos,
            velocity,
            elbow_angle_deg: elbow,
        }
    }

    fn feed(values: &[(f32, f32)]) -> SegmentState {
        values
            .iter()
            .enumerate()
            .fold(SegmentState::initial(), |s, (i, (v, e))| s.advance(obs(i, *v, *e), &T))
    }

    #[test]
    fn test_upward_without_dip_never_arms() {
        let state = feed(&[(0.5, 90.0), (0.6, 100.0), (0.7, 110.0), (0.8, 120.0)]);
        assert_eq!(state.phase(), Phase::LoadDip);
    }

    #[test]
    fn test_single_frame_spike_is_debounced() {
        let state = feed(&[(0.0, 90.0), (0.9, 90.0), (0.0, 90.0), (0.9, 90.0), (0.3, 90.0)]);
        assert_eq!(state.phase(), Phase::LoadDip);
    }

    #[test]
    fn test_release_starts_at_first_frame_of_run() {
        let state = feed(&[(-0.2, 90.0), (0.0, 90.0), (0.3, 95.0), (0.5, 110.0), (0.7, 130.0)]);
        match state {
            SegmentState::Release { start, .. } => assert_eq!(start, 2),
            other => panic!("expected release, got {other:?}"),
        }
    }

    #[test]
    fn test_follow_through_needs_peak_and_extension() {
        // Velocity drops at pos 5 but the elbow is still bent; drops again at 7 extended
        let state = feed(&[
            (0.0, 90.0),
            (0.3, 95.0),
            (0.5, 110.0),
            (0.7, 130.0),
            (0.9, 140.0),
            (0.8, 145.0),
            (0.85, 155.0),
            (0.6, 170.0),
        ]);
        assert_eq!(
            state,
            SegmentState::FollowThrough {
                release_start: 1,
                start: 7
            }
        );
    }

    #[test]
    fn test_peak_inside_debounce_run_is_replayed() {
        let state = feed(&[(0.0, 90.0), (0.5, 120.0), (0.9, 160.0), (0.6, 175.0)]);
        assert_eq!(
            state,
            SegmentState::FollowThrough {
                release_start: 1,
                start: 3
            }
        );
    }

    #[test]
    fn test_gap_resets_pending_run() {
        let state = feed(&[(0.0, 90.0), (0.5, 100.0), (0.6, 110.0)]).interrupt();
        let state = state.advance(obs(4, 0.7, 120.0), &T);
        assert_eq!(
            state,
            SegmentState::LoadDip {
                armed: true,
                run: vec![obs(4, 0.7, 120.0)]
            }
        );
    }

    #[test]
    fn test_terminal_state_is_absorbing() {
        let done = SegmentState::FollowThrough {
            release_start: 3,
            start: 9,
        };
        assert_eq!(done.clone().advance(obs(10, -1.0, 10.0), &T), done);
        assert!(done.is_terminal());
    }
}
