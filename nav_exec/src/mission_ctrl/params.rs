//! # MissionCtrl Parameters

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use comms_if::{eqpt::scanner::ScanSpec, mission::NavigationMode};
use serde::{Deserialize, Serialize};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MissionCtrlParams {
    // ---- WIRING ----
    pub tank_id: Option<String>,

    pub lcd_id: Option<String>,

    pub scanner_id: Option<String>,

    pub scan_processor_id: Option<String>,

    // ---- MISSION ----
    #[serde(default)]
    pub mode: NavigationMode,

    #[serde(default)]
    pub fastest_path: FastestPathParams,
}

/// Tuning of the fastest path mode.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FastestPathParams {
    /// Targets closer than this are not worth driving to, more information is needed.
    ///
    /// Units: meters
    pub min_goal_range_m: f32,

    /// Corners closer than this decide which way to escape when cornered.
    ///
    /// Units: meters
    pub corner_decision_range_m: f32,

    /// Range which must be measured in a direction before the corner is considered escaped.
    ///
    /// Units: meters
    pub escape_clearance_m: f32,

    /// Targets further off the heading than this are never replaced by the point straight ahead.
    ///
    /// Units: degrees
    pub good_enough_cone_deg: f32,

    /// If the way ahead is clear for this far the robot keeps going straight.
    ///
    /// Units: meters
    pub long_range_m: f32,

    /// The point straight ahead is good enough if its range is within this fraction of the
    /// target's range.
    pub range_difference_ratio: f32,

    /// Scan used when seeking information.
    pub full_scan: ScanSpec,

    /// Scan used to correct the heading while driving.
    pub quick_scan: ScanSpec,

    /// Bearing of the range probe used while escaping a corner, mirrored for the left side.
    ///
    /// Units: degrees
    pub range_probe_deg: f32,

    /// Speed used to turn out of a corner.
    pub escape_speed: f32,

    /// Speed used to rotate towards a new target.
    pub rotation_speed: f32,

    /// Angle at which the wheeled heading correction reaches its full strength.
    ///
    /// Units: radians
    pub wheel_damping_divisor: f32,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl Default for FastestPathParams {
    fn default() -> Self {
        Self {
            min_goal_range_m: 0.5,
            corner_decision_range_m: 1.0,
            escape_clearance_m: 1.4,
            good_enough_cone_deg: 25.0,
            long_range_m: 4.0,
            range_difference_ratio: 0.25,
            full_scan: ScanSpec {
                start_deg: -45.0,
                span_deg: 90.0,
                res_deg: 0.4,
            },
            quick_scan: ScanSpec {
                start_deg: -30.0,
                span_deg: 60.0,
                res_deg: 1.0,
            },
            range_probe_deg: 10.0,
            escape_speed: 0.5,
            rotation_speed: 1.0,
            wheel_damping_divisor: 5.0,
        }
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------
