//! Parameters structure for TankCtrl

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Parameters for the tank controller.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TankCtrlParams {
    // ---- WIRING ----
    /// Id of the motor bridge unit in the context.
    pub motion_id: Option<String>,

    /// Id of the gyroscope unit in the context.
    pub gyro_id: Option<String>,

    // ---- VEHICLE ----
    /// Factor applied to every speed demand before it is sent to the motor bridge.
    #[serde(default = "default_max_speed")]
    pub max_speed: f32,

    /// Minimum change in yaw before the gyroscope sends a new sample during a rotation.
    ///
    /// Units: degrees
    #[serde(default = "default_gyro_threshold_z_deg")]
    pub gyro_threshold_z_deg: f32,
}

/// Directions sent to the motor bridge to turn on the spot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TurnAngles {
    /// Units: degrees
    pub left_deg: f32,

    /// Units: degrees
    pub right_deg: f32,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// Kind of running gear fitted to the robot, shared by every unit that turns it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Drivetrain {
    Wheels,
    Tracks,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl Default for Drivetrain {
    fn default() -> Self {
        Drivetrain::Wheels
    }
}

impl TurnAngles {
    pub const WHEELS: TurnAngles = TurnAngles {
        left_deg: 270.0,
        right_deg: 90.0,
    };

    // Tracks slip when turning on the spot so they are driven slightly forwards as they turn
    pub const TRACKS: TurnAngles = TurnAngles {
        left_deg: 280.0,
        right_deg: 80.0,
    };

    pub fn for_drivetrain(drivetrain: Drivetrain) -> Self {
        match drivetrain {
            Drivetrain::Wheels => Self::WHEELS,
            Drivetrain::Tracks => Self::TRACKS,
        }
    }

    /// Direction to send to the motor bridge to turn right (`true`) or left.
    ///
    /// Units: radians
    pub fn towards(&self, right: bool) -> f32 {
        if right {
            self.right_deg.to_radians()
        } else {
            self.left_deg.to_radians()
        }
    }
}

// ------------------------------------------------------------------------------------------------
// FUNCTIONS
// ------------------------------------------------------------------------------------------------

fn default_max_speed() -> f32 {
    1.0
}

fn default_gyro_threshold_z_deg() -> f32 {
    1.0
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------
