//! # Simulated equipment
//!
//! Stands in for the robot's hardware so that the navigation units can run on a desktop. All of
//! the equipment shares a single [`SimWorld`]: the motor bridge sets the demand the world is
//! stepped with, the scanner ray casts into it, and the gyroscope integrates the heading changes
//! reported by the [`SimClock`].

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

mod clock;
mod gyro;
mod lcd;
mod motion;
mod scanner;
mod world;

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::sync::MutexGuard;

use log::error;

pub use clock::SimClock;
pub use gyro::{SimGyro, SimGyroMsg};
pub use lcd::ConsoleLcd;
pub use motion::SimMotion;
pub use scanner::SimScanner;
pub use world::*;

// ------------------------------------------------------------------------------------------------
// FUNCTIONS
// ------------------------------------------------------------------------------------------------

fn lock_world(world: &SharedWorld) -> Option<MutexGuard<SimWorld>> {
    match world.lock() {
        Ok(w) => Some(w),
        Err(_) => {
            error!("Simulated world mutex poisoned");
            None
        }
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------
