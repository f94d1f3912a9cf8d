//! Rotation completion test

/// Decide whether a rotation towards `target_deg` has completed given the current yaw.
///
/// Both angles must be in the same, non-wrapped frame, accumulating from zero at the start of the
/// rotation. Positive targets are reached once the yaw has increased past them, negative (and zero)
/// targets once it has decreased past them.
pub fn is_done_rotating(target_deg: f32, current_deg: f32) -> bool {
    if target_deg > 0.0 {
        current_deg >= target_deg
    } else {
        target_deg >= current_deg
    }
}

#[cfg(test)]
mod test {
    use super::*;

    /// Returns the index of the first reading at which the rotation is done.
    fn first_done(target_deg: f32, readings: &[f32]) -> Option<usize> {
        readings.iter().position(|r| is_done_rotating(target_deg, *r))
    }

    #[test]
    fn test_rotate_right() {
        let readings = [0.0, 5.0, 12.5, 29.0, 29.99, 30.0, 31.0, 45.0];
        assert_eq!(first_done(30.0, &readings), Some(5));

        // Never done before reaching the target
        assert_eq!(first_done(30.0, &readings[..5]), None);
    }

    #[test]
    fn test_rotate_left() {
        let readings = [0.0, -5.0, -12.5, -29.0, -29.99, -30.0, -31.0];
        assert_eq!(first_done(-30.0, &readings), Some(5));
        assert_eq!(first_done(-30.0, &readings[..5]), None);
    }

    #[test]
    fn test_overshoot() {
        // A coarse sample stream which jumps past the target still completes
        assert!(is_done_rotating(30.0, 42.0));
        assert!(is_done_rotating(-30.0, -42.0));
        assert!(!is_done_rotating(-30.0, 10.0));
    }
}
