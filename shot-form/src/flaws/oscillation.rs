//! Direction-reversal counting for short angle windows

/// Number of direction changes in `values`, ignoring steps smaller than `min_step`
pub fn count_reversals(values: &[f32], min_step: f32) -> usize {
    let mut reversals = 0;
    let mut last_direction = 0.0_f32;

    for pair in values.windows(2) {
        let step = pair[1] - pair[0];
        if step.abs() < min_step {
            continue;
        }
        let direction = step.signum();
        if last_direction != 0.0 && direction != last_direction {
            reversals += 1;
        }
        last_direction = direction;
    }
    reversals
}

/// Peak-to-peak range of `values`
pub fn amplitude(values: &[f32]) -> f32 {
    let (lo, hi) = values
        .iter()
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
    if hi >= lo {
        hi - lo
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_monotone_has_no_reversals() {
        assert_eq!(count_reversals(&[100.0, 110.0, 120.0, 130.0], 3.0), 0);
    }

    #[test]
    fn test_zigzag() {
        assert_eq!(count_reversals(&[120.0, 140.0, 118.0, 141.0, 119.0], 3.0), 3);
    }

    #[test]
    fn test_jitter_below_step_is_ignored() {
        assert_eq!(count_reversals(&[120.0, 121.0, 120.0, 121.5, 120.0], 3.0), 0);
        // Small wobble between two large moves the same way is not a reversal
        assert_eq!(count_reversals(&[100.0, 110.0, 109.0, 120.0], 3.0), 0);
    }

    #[test]
    fn test_amplitude() {
        assert_eq!(amplitude(&[120.0, 140.0, 118.0]), 22.0);
        assert_eq!(amplitude(&[]), 0.0);
    }
}
