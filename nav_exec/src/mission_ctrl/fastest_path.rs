//! # Fastest path decisions
//!
//! Pure functions deciding how the robot reacts to an analysed scan in the fastest path mode.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use comms_if::geom::{AnalysisResult, Point2f};

use util::maths::lin_map;

use super::FastestPathParams;
use crate::tank_ctrl::Drivetrain;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Drive command chosen while moving to a target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DriveDecision {
    /// Normalised speed, never above 1.
    pub speed: f32,

    /// Units: radians
    pub direction_rad: f32,

    /// The point the robot is actually heading for, either the target or the point straight
    /// ahead.
    pub aim: Point2f,
}

// ------------------------------------------------------------------------------------------------
// FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// The robot is cornered if the best target is too close to be worth driving to.
pub fn is_cornered(result: &AnalysisResult, params: &FastestPathParams) -> bool {
    result.target_point.distance(&Point2f::ORIGIN) < params.min_goal_range_m
}

/// Pick the side to escape a corner towards, `true` for right.
///
/// A close corner decides the side, otherwise the more open of the two scan edges is chosen.
pub fn escape_to_right(result: &AnalysisResult, params: &FastestPathParams) -> bool {
    match result.features.closest_corner() {
        Some(c) if c.range_m < params.corner_decision_range_m => c.angle_rad > 0.0,
        _ => result.source.rightmost_point().range_m > result.source.leftmost_point().range_m,
    }
}

/// Decide whether heading straight ahead is as good as turning towards the goal.
pub fn is_good_enough(goal: &Point2f, straight_ahead: &Point2f, params: &FastestPathParams) -> bool {
    if goal.angle_rad.abs() > params.good_enough_cone_deg.to_radians() {
        false
    } else if straight_ahead.range_m >= params.long_range_m {
        true
    } else {
        goal.range_difference(straight_ahead) < params.range_difference_ratio * goal.range_m
    }
}

/// Direction to drive in to correct the heading towards `angle_rad`.
///
/// Wheels turn much faster than tracks, so small corrections are damped strongly and the whole
/// correction is halved.
pub fn heading_correction(angle_rad: f32, drivetrain: Drivetrain, params: &FastestPathParams) -> f32 {
    match drivetrain {
        Drivetrain::Tracks => angle_rad,
        Drivetrain::Wheels => {
            let strength = (angle_rad.abs() / params.wheel_damping_divisor).min(1.0);
            lin_map((0.0, 1.0), (0.1, 1.0), strength) * angle_rad / 2.0
        }
    }
}

/// Choose the speed and direction to drive in towards the analysed target.
pub fn drive_decision(
    result: &AnalysisResult,
    drivetrain: Drivetrain,
    params: &FastestPathParams,
) -> DriveDecision {
    let target = result.target_point;
    let nearest = result.source.nearest_point();

    // Slow down near obstacles and as the target gets closer
    let speed = nearest.range_m.min(target.range_m / 2.0).min(1.0);

    if is_good_enough(&target, &result.center_point, params) {
        DriveDecision {
            speed,
            direction_rad: 0.0,
            aim: result.center_point,
        }
    } else {
        DriveDecision {
            speed,
            direction_rad: heading_correction(target.angle_rad, drivetrain, params),
            aim: target,
        }
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use comms_if::geom::{FeatureSet, ScanResult2D};

    fn result(target: Point2f, center: Point2f, corners: Vec<Point2f>) -> AnalysisResult {
        AnalysisResult {
            source: ScanResult2D::new(
                vec![
                    Point2f::from_polar(1.0, -0.7),
                    Point2f::from_polar(3.0, -0.1),
                    Point2f::from_polar(0.9, 0.3),
                    Point2f::from_polar(2.0, 0.7),
                ],
                1.0,
            )
            .unwrap(),
            features: FeatureSet { corners },
            target_point: target,
            center_point: center,
        }
    }

    #[test]
    fn test_is_cornered() {
        let p = FastestPathParams::default();
        let center = Point2f::from_polar(1.0, 0.0);

        assert!(is_cornered(&result(Point2f::from_polar(0.49, 0.3), center, vec![]), &p));
        assert!(!is_cornered(&result(Point2f::from_polar(0.51, 0.3), center, vec![]), &p));
    }

    #[test]
    fn test_escape_side() {
        let p = FastestPathParams::default();
        let target = Point2f::from_polar(0.3, 0.0);
        let center = Point2f::from_polar(0.3, 0.0);

        // Rightmost point (2.0 m) is more open than the leftmost (1.0 m)
        assert!(escape_to_right(&result(target, center, vec![]), &p));

        // A close corner on the left takes precedence
        assert!(!escape_to_right(
            &result(target, center, vec![Point2f::from_polar(0.8, -0.4)]),
            &p
        ));

        // A distant corner doesn't
        assert!(escape_to_right(
            &result(target, center, vec![Point2f::from_polar(1.5, -0.4)]),
            &p
        ));
    }

    #[test]
    fn test_is_good_enough() {
        let p = FastestPathParams::default();

        // Too far off the heading, whatever is ahead
        assert!(!is_good_enough(
            &Point2f::from_polar(3.0, 30f32.to_radians()),
            &Point2f::from_polar(10.0, 0.0),
            &p
        ));

        // Long clear run ahead
        assert!(is_good_enough(
            &Point2f::from_polar(8.0, 20f32.to_radians()),
            &Point2f::from_polar(4.0, 0.0),
            &p
        ));

        // Ahead is nearly as far as the goal
        assert!(is_good_enough(
            &Point2f::from_polar(3.0, 10f32.to_radians()),
            &Point2f::from_polar(2.5, 0.0),
            &p
        ));
        assert!(!is_good_enough(
            &Point2f::from_polar(3.0, 10f32.to_radians()),
            &Point2f::from_polar(2.0, 0.0),
            &p
        ));
    }

    #[test]
    fn test_heading_correction() {
        let p = FastestPathParams::default();

        assert_eq!(heading_correction(0.5, Drivetrain::Tracks, &p), 0.5);

        let c = heading_correction(0.5, Drivetrain::Wheels, &p);
        assert!((c - 0.0475).abs() < 1e-6);
        assert_eq!(heading_correction(-0.5, Drivetrain::Wheels, &p), -c);

        // Saturates at half the angle
        assert!((heading_correction(6.0, Drivetrain::Wheels, &p) - 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_drive_decision() {
        let p = FastestPathParams::default();

        // Target well off the heading, steer towards it. Speed limited by the nearest point.
        let target = Point2f::from_polar(3.0, 0.6);
        let d = drive_decision(
            &result(target, Point2f::from_polar(1.0, 0.0), vec![]),
            Drivetrain::Tracks,
            &p,
        );
        assert_eq!(d.speed, 0.9);
        assert_eq!(d.direction_rad, 0.6);
        assert_eq!(d.aim, target);

        // Good enough ahead, drive straight. Speed limited by the target range.
        let center = Point2f::from_polar(5.0, 0.0);
        let d = drive_decision(
            &result(Point2f::from_polar(1.2, 0.1), center, vec![]),
            Drivetrain::Wheels,
            &p,
        );
        assert_eq!(d.speed, 0.6);
        assert_eq!(d.direction_rad, 0.0);
        assert_eq!(d.aim, center);
    }
}
