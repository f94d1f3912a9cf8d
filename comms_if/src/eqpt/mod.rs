//! # Equipment Interface
//!
//! This module defines the request and data structures exchanged with the robot's equipment: the
//! range scanner, the gyroscope, the motor bridge and the display.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

pub mod gyro;
pub mod lcd;
pub mod motion;
pub mod scanner;
