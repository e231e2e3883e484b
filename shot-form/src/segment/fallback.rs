//! Proportional phase split over frame ordinals

use crate::config::PhaseSplit;

/// Boundaries `(b1, b2)` splitting `n` frames into three non-empty runs
///
/// LoadDip is `[0, b1)`, Release `[b1, b2)`, FollowThrough `[b2, n)`.
/// Requires `n >= 3`.
pub fn proportional_bounds(n: usize, split: &PhaseSplit) -> (usize, usize) {
    debug_assert!(n >= 3);
    let at = |fraction: f32| (n as f32 * fraction).round() as usize;

    let b1 = at(split.load_dip).clamp(1, n - 2);
    let b2 = at(split.load_dip + split.release).clamp(b1 + 1, n - 1);
    (b1, b2)
}

/// Split the frames after a detected release start
///
/// Returns the first follow-through ordinal, or `None` when fewer than two
/// frames remain after `release_start`.
pub fn split_after_release(n: usize, release_start: usize, split: &PhaseSplit) -> Option<usize> {
    let remaining = n.checked_sub(release_start)?;
    if remaining < 2 {
        return None;
    }
    let share = split.release / (split.release + split.follow_through);
    let release_len = (remaining as f32 * share).round() as usize;
    Some(release_start + release_len.clamp(1, remaining - 1))
}
