//! # Tank controller
//!
//! The tank controller owns the drivetrain and the gyroscope. It either drives at a given speed
//! and direction, or performs a rotation closed on the gyroscope's yaw feedback, notifying the
//! requester once the robot has turned by the requested angle.
//!
//! Only one rotation may be in progress at any time. Rotation requests received while rotating are
//! dropped, as are drive commands. A stop always wins: it cancels the rotation without notifying
//! the requester.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

mod params;
mod rotation;
mod state;

// ------------------------------------------------------------------------------------------------
// EXPORTS
// ------------------------------------------------------------------------------------------------

pub use params::*;
pub use rotation::is_done_rotating;
pub use state::*;

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// Possible errors that can occur during TankCtrl initialisation.
#[derive(Debug, thiserror::Error)]
pub enum TankCtrlError {
    #[error("Failed to load TankCtrlParams: {0}")]
    ParamLoadError(util::params::LoadError),

    #[error("Parameter {0} must be set for the tank controller")]
    MissingConfig(&'static str),

    #[error("Parameter {key} is set to \"{id}\" but no such unit is registered")]
    UnresolvedRef { key: &'static str, id: String },
}
