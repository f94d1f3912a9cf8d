//! # Geometry types
//!
//! Polar points and scan sweeps as produced by the range scanner, plus the bundle returned by the
//! analysis step. All angles are in radians, positive to the right of the robot's heading, and all
//! ranges in meters from the scanner head.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use nalgebra::Vector2;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use std::convert::TryFrom;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// A point in polar coordinates relative to the scanner head.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point2f {
    /// Distance from the scanner head.
    ///
    /// Units: meters
    pub range_m: f32,

    /// Bearing of the point, zero is straight ahead and positive angles are to the right.
    ///
    /// Units: radians
    pub angle_rad: f32,
}

/// The ordered set of points measured in one sweep of the scanner.
///
/// Points are ordered by increasing angle, i.e. from the leftmost to the rightmost measurement.
/// Deserialised scans go through the same checks as [`ScanResult2D::new`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawScan2D")]
pub struct ScanResult2D {
    points: Vec<Point2f>,

    /// Angular resolution used for the sweep.
    ///
    /// Units: degrees
    angular_res_deg: f32,
}

/// Unchecked wire form of a scan.
#[derive(Deserialize)]
struct RawScan2D {
    points: Vec<Point2f>,
    angular_res_deg: f32,
}

/// Features extracted from a scan.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureSet {
    /// Corners found in the scan, in the order they were detected.
    pub corners: Vec<Point2f>,
}

/// The result of analysing one scan.
///
/// Produced exactly once per scan by the analysis step and never modified afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// The scan the analysis was computed from
    pub source: ScanResult2D,

    /// Extracted features
    pub features: FeatureSet,

    /// Best candidate to drive towards
    pub target_point: Point2f,

    /// Straight-ahead reference point
    pub center_point: Point2f,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum GeomError {
    #[error("A scan must contain at least one point")]
    EmptyScan,

    #[error("Scan points must be ordered by increasing angle (point {0} is out of order)")]
    UnorderedPoints(usize),
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl Point2f {
    /// The scanner head itself.
    pub const ORIGIN: Point2f = Point2f {
        range_m: 0.0,
        angle_rad: 0.0,
    };

    pub fn from_polar(range_m: f32, angle_rad: f32) -> Self {
        Self { range_m, angle_rad }
    }

    /// Cartesian position of the point, x forwards and y to the right.
    pub fn to_cartesian(&self) -> Vector2<f32> {
        Vector2::new(
            self.range_m * self.angle_rad.cos(),
            self.range_m * self.angle_rad.sin(),
        )
    }

    /// Euclidean distance between two points.
    pub fn distance(&self, other: &Point2f) -> f32 {
        (self.to_cartesian() - other.to_cartesian()).norm()
    }

    /// Absolute difference in range between two points, ignoring their bearings.
    pub fn range_difference(&self, other: &Point2f) -> f32 {
        (self.range_m - other.range_m).abs()
    }
}

impl ScanResult2D {
    /// Build a scan from points ordered by increasing angle.
    pub fn new(points: Vec<Point2f>, angular_res_deg: f32) -> Result<Self, GeomError> {
        if points.is_empty() {
            return Err(GeomError::EmptyScan);
        }

        if let Some(i) = points
            .windows(2)
            .position(|w| w[1].angle_rad < w[0].angle_rad)
        {
            return Err(GeomError::UnorderedPoints(i + 1));
        }

        Ok(Self {
            points,
            angular_res_deg,
        })
    }

    pub fn points(&self) -> &[Point2f] {
        &self.points
    }

    pub fn angular_res_deg(&self) -> f32 {
        self.angular_res_deg
    }

    pub fn nearest_point(&self) -> Point2f {
        // Scans are never empty, so the first point is a valid starting candidate
        self.points[1..].iter().fold(self.points[0], |best, p| {
            if OrderedFloat(p.range_m) < OrderedFloat(best.range_m) {
                *p
            } else {
                best
            }
        })
    }

    pub fn farthest_point(&self) -> Point2f {
        self.points[1..].iter().fold(self.points[0], |best, p| {
            if OrderedFloat(p.range_m) >= OrderedFloat(best.range_m) {
                *p
            } else {
                best
            }
        })
    }

    pub fn leftmost_point(&self) -> Point2f {
        self.points[0]
    }

    pub fn rightmost_point(&self) -> Point2f {
        self.points[self.points.len() - 1]
    }
}

impl TryFrom<RawScan2D> for ScanResult2D {
    type Error = GeomError;

    fn try_from(raw: RawScan2D) -> Result<Self, Self::Error> {
        Self::new(raw.points, raw.angular_res_deg)
    }
}

impl FeatureSet {
    /// The corner closest to the scanner head, if any corner was found.
    pub fn closest_corner(&self) -> Option<Point2f> {
        self.corners
            .iter()
            .min_by_key(|p| OrderedFloat(p.range_m))
            .copied()
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    fn scan() -> ScanResult2D {
        ScanResult2D::new(
            vec![
                Point2f::from_polar(2.0, -0.5),
                Point2f::from_polar(0.8, -0.1),
                Point2f::from_polar(3.5, 0.2),
                Point2f::from_polar(1.2, 0.6),
            ],
            1.0,
        )
        .unwrap()
    }

    #[test]
    fn test_scan_queries() {
        let s = scan();

        assert_eq!(s.nearest_point().range_m, 0.8);
        assert_eq!(s.farthest_point().range_m, 3.5);
        assert_eq!(s.leftmost_point().angle_rad, -0.5);
        assert_eq!(s.rightmost_point().angle_rad, 0.6);
    }

    #[test]
    fn test_scan_validation() {
        assert_eq!(ScanResult2D::new(vec![], 1.0), Err(GeomError::EmptyScan));
        assert_eq!(
            ScanResult2D::new(
                vec![Point2f::from_polar(1.0, 0.2), Point2f::from_polar(1.0, 0.1)],
                1.0
            ),
            Err(GeomError::UnorderedPoints(1))
        );
    }

    #[test]
    fn test_scan_deserialise_validated() {
        let empty = serde_json::from_str::<ScanResult2D>(r#"{"points":[],"angular_res_deg":1.0}"#);
        assert!(empty.is_err());

        let unordered = serde_json::from_str::<ScanResult2D>(
            r#"{"points":[{"range_m":1.0,"angle_rad":0.2},{"range_m":1.0,"angle_rad":0.1}],"angular_res_deg":1.0}"#,
        );
        assert!(unordered.is_err());

        let s = scan();
        let json = serde_json::to_string(&s).unwrap();
        assert_eq!(serde_json::from_str::<ScanResult2D>(&json).unwrap(), s);
    }

    #[test]
    fn test_extreme_points_single() {
        let s = ScanResult2D::new(vec![Point2f::from_polar(1.5, 0.3)], 1.0).unwrap();

        assert_eq!(s.nearest_point(), Point2f::from_polar(1.5, 0.3));
        assert_eq!(s.farthest_point(), Point2f::from_polar(1.5, 0.3));
    }

    #[test]
    fn test_distance() {
        let a = Point2f::from_polar(1.0, 0.0);
        let b = Point2f::from_polar(1.0, std::f32::consts::FRAC_PI_2);

        assert!((a.distance(&Point2f::ORIGIN) - 1.0).abs() < 1e-6);
        assert!((a.distance(&b) - 2f32.sqrt()).abs() < 1e-6);
        assert!((a.range_difference(&Point2f::from_polar(3.0, 1.0)) - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_closest_corner() {
        let mut f = FeatureSet::default();
        assert!(f.closest_corner().is_none());

        f.corners.push(Point2f::from_polar(2.0, 0.1));
        f.corners.push(Point2f::from_polar(0.7, -0.3));
        assert_eq!(f.closest_corner(), Some(Point2f::from_polar(0.7, -0.3)));
    }
}
