//! # Feature extraction
//!
//! A deterministic analysis of a single sweep:
//!
//! - Corners are the points where the scanned surface bends sharply, measured by the angle between
//!   the point's neighbours on either side.
//! - The target is the bearing with the most room around it: the point whose surrounding window
//!   has the largest minimum range.
//! - The center point is the measurement closest to straight ahead.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use comms_if::geom::{AnalysisResult, FeatureSet, Point2f, ScanResult2D};
use nalgebra::Vector2;
use ordered_float::OrderedFloat;

use super::ScanProcParams;

// ------------------------------------------------------------------------------------------------
// FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Analyse a sweep measured at the given angular resolution.
pub fn analyse(scan: ScanResult2D, angular_res_deg: f32, params: &ScanProcParams) -> AnalysisResult {
    let points = scan.points();

    let corners = find_corners(
        points,
        steps_for(params.corner_span_deg, angular_res_deg),
        params.corner_max_angle_deg.to_radians(),
    );
    let target_point = find_target(points, steps_for(params.target_window_deg / 2.0, angular_res_deg));
    let center_point = find_center(points);

    AnalysisResult {
        features: FeatureSet { corners },
        target_point,
        center_point,
        source: scan,
    }
}

/// Number of measurements covering `span_deg`, at least one.
fn steps_for(span_deg: f32, angular_res_deg: f32) -> usize {
    if angular_res_deg <= 0.0 {
        return 1;
    }

    ((span_deg / angular_res_deg).round() as usize).max(1)
}

fn find_corners(points: &[Point2f], k: usize, max_angle_rad: f32) -> Vec<Point2f> {
    let mut corners = Vec::new();

    if points.len() <= 2 * k {
        return corners;
    }

    let cartesian: Vec<Vector2<f32>> = points.iter().map(|p| p.to_cartesian()).collect();

    // Sharpest point of the current run of candidates
    let mut run: Option<(usize, f32)> = None;

    for i in k..(points.len() - k) {
        let angle = vertex_angle(&cartesian[i - k], &cartesian[i], &cartesian[i + k]);

        match (angle, run) {
            (Some(a), Some((_, sharpest))) if a < max_angle_rad => {
                if a < sharpest {
                    run = Some((i, a));
                }
            }
            (Some(a), None) if a < max_angle_rad => run = Some((i, a)),
            _ => {
                if let Some((j, _)) = run.take() {
                    corners.push(points[j]);
                }
            }
        }
    }

    if let Some((j, _)) = run {
        corners.push(points[j]);
    }

    corners
}

/// Angle at `vertex` between the two neighbours, `None` if a neighbour coincides with it.
fn vertex_angle(left: &Vector2<f32>, vertex: &Vector2<f32>, right: &Vector2<f32>) -> Option<f32> {
    let a = left - vertex;
    let b = right - vertex;

    let norms = a.norm() * b.norm();
    if norms <= std::f32::EPSILON {
        return None;
    }

    Some((a.dot(&b) / norms).max(-1.0).min(1.0).acos())
}

fn find_target(points: &[Point2f], half_window: usize) -> Point2f {
    let clearance = |i: usize| -> f32 {
        let lo = i.saturating_sub(half_window);
        let hi = (i + half_window).min(points.len() - 1);

        points[lo..=hi]
            .iter()
            .map(|p| OrderedFloat(p.range_m))
            .min()
            .map(|r| r.0)
            .unwrap_or(0.0)
    };

    // First index with the most clearance
    let mut best = (0, clearance(0));
    for i in 1..points.len() {
        let c = clearance(i);
        if c > best.1 {
            best = (i, c);
        }
    }

    Point2f::from_polar(best.1, points[best.0].angle_rad)
}

fn find_center(points: &[Point2f]) -> Point2f {
    points
        .iter()
        .min_by_key(|p| OrderedFloat(p.angle_rad.abs()))
        .copied()
        .unwrap_or(Point2f::ORIGIN)
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    const RES_RAD: f32 = 0.02;

    fn sweep<F: Fn(f32) -> f32>(from_rad: f32, to_rad: f32, range: F) -> ScanResult2D {
        let n = ((to_rad - from_rad) / RES_RAD).round() as usize;
        let points = (0..=n)
            .map(|i| {
                let a = from_rad + i as f32 * RES_RAD;
                Point2f::from_polar(range(a), a)
            })
            .collect();

        ScanResult2D::new(points, RES_RAD.to_degrees()).unwrap()
    }

    #[test]
    fn test_center() {
        let scan = ScanResult2D::new(
            vec![
                Point2f::from_polar(1.0, -0.2),
                Point2f::from_polar(2.0, -0.05),
                Point2f::from_polar(3.0, 0.1),
            ],
            1.0,
        )
        .unwrap();

        let result = analyse(scan, 1.0, &ScanProcParams::default());
        assert_eq!(result.center_point, Point2f::from_polar(2.0, -0.05));
    }

    #[test]
    fn test_target_prefers_wide_gap() {
        // Wall at 1 m with a single far return on the left and a wide opening on the right
        let scan = sweep(-0.5, 0.5, |a| {
            if (a + 0.3).abs() < 0.005 {
                10.0
            } else if a > 0.19 && a < 0.41 {
                3.0
            } else {
                1.0
            }
        });

        let result = analyse(scan, RES_RAD.to_degrees(), &ScanProcParams::default());
        assert_eq!(result.target_point.range_m, 3.0);
        assert!(result.target_point.angle_rad > 0.19 && result.target_point.angle_rad < 0.41);
    }

    #[test]
    fn test_corner() {
        // Wall 2 m ahead meeting a wall 1 m to the right
        let corner_rad = 0.5f32.atan();
        let scan = sweep(-0.7, 1.2, |a| {
            let ahead = 2.0 / a.cos();
            if a > 0.0 {
                ahead.min(1.0 / a.sin())
            } else {
                ahead
            }
        });

        let result = analyse(scan, RES_RAD.to_degrees(), &ScanProcParams::default());
        assert_eq!(result.features.corners.len(), 1);
        assert!((result.features.corners[0].angle_rad - corner_rad).abs() <= 2.0 * RES_RAD);
    }

    #[test]
    fn test_straight_wall_has_no_corner() {
        let scan = sweep(-0.6, 0.6, |a| 2.0 / a.cos());

        let result = analyse(scan, RES_RAD.to_degrees(), &ScanProcParams::default());
        assert!(result.features.corners.is_empty());
        assert!(result.features.closest_corner().is_none());
    }

    #[test]
    fn test_short_scan() {
        let scan = ScanResult2D::new(vec![Point2f::from_polar(1.5, 0.2)], 0.0).unwrap();

        let result = analyse(scan, 0.0, &ScanProcParams::default());
        assert!(result.features.corners.is_empty());
        assert_eq!(result.target_point, Point2f::from_polar(1.5, 0.2));
        assert_eq!(result.center_point, Point2f::from_polar(1.5, 0.2));
    }
}
