//! # Motor Bridge Commands

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// A demand sent to the motor bridge.
///
/// The bridge splits the demand into a forward component `speed * cos(direction)` and a turning
/// component `speed * sin(direction)`, so a direction of 90 degrees turns on the spot to the right
/// and 270 degrees turns on the spot to the left.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MotionEvent {
    /// Normalised speed between -1 and +1.
    pub speed: f32,

    /// Units: radians
    pub direction_rad: f32,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl MotionEvent {
    pub fn new(speed: f32, direction_rad: f32) -> Self {
        Self {
            speed,
            direction_rad,
        }
    }

    pub fn stop() -> Self {
        Self::new(0.0, 0.0)
    }
}
