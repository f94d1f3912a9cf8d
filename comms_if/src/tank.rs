//! # Tank commands
//!
//! The tank controller either drives in a given direction or performs a gyro based rotation. If a
//! rotation is requested the speed is still used, but the gyroscope decides when it is complete.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use crate::unit::ReplySink;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

#[derive(Debug)]
pub struct TankEvent {
    /// Normalised speed between -1 and +1.
    pub speed: f32,

    /// Units: radians
    pub direction_rad: f32,

    /// Angle to rotate by, positive to the right. Zero means no rotation.
    ///
    /// Units: radians
    pub rotate_rad: f32,

    /// If a rotation is requested, notified once the robot has rotated by `rotate_rad`.
    pub rotation_done: Option<ReplySink<RotationDoneNotification>>,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationDoneNotification {
    RotationComplete,

    /// The rotation was never started, so the robot has not moved.
    Aborted,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl TankEvent {
    /// Stop all motion, cancelling any rotation in progress.
    pub fn stop() -> Self {
        Self::drive(0.0, 0.0)
    }

    pub fn drive(speed: f32, direction_rad: f32) -> Self {
        Self {
            speed,
            direction_rad,
            rotate_rad: 0.0,
            rotation_done: None,
        }
    }

    pub fn rotate(
        speed: f32,
        rotate_rad: f32,
        rotation_done: Option<ReplySink<RotationDoneNotification>>,
    ) -> Self {
        Self {
            speed,
            direction_rad: 0.0,
            rotate_rad,
            rotation_done,
        }
    }

    pub fn is_rotation(&self) -> bool {
        self.rotate_rad != 0.0
    }

    /// A zero speed command without a rotation brings the tank to a halt.
    pub fn is_stop(&self) -> bool {
        !self.is_rotation() && self.speed == 0.0
    }
}
