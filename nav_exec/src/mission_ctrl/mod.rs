//! # Mission controller
//!
//! The mission controller decides what the robot does next from the analysis of each new scan.
//! Only the fastest path mode is implemented, in which the robot is always in one of three
//! [`PathState`]s:
//!
//! - `SeekingInfo` - The start state. A full scan is analysed and the robot either rotates to face
//!   the most promising target or, if no target is far enough away, decides it is cornered.
//! - `Cornered` - The robot spins towards the more open side, probing the range on that side until
//!   it finds a clear direction.
//! - `MovingToTarget` - The robot drives towards the target, correcting its heading from quick
//!   scans, until the target gets too close.
//!
//! At most one scan is outstanding at any time. Scan requests made while a scan is in progress are
//! dropped, the next state transition requests a new scan if one is needed.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

mod fastest_path;
mod params;
mod path_state;
mod state;
pub mod tm;

// ------------------------------------------------------------------------------------------------
// EXPORTS
// ------------------------------------------------------------------------------------------------

pub use fastest_path::{drive_decision, DriveDecision};
pub use params::*;
pub use path_state::PathState;
pub use state::*;

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// Possible errors that can occur during MissionCtrl initialisation.
#[derive(Debug, thiserror::Error)]
pub enum MissionCtrlError {
    #[error("Failed to load MissionCtrlParams: {0}")]
    ParamLoadError(util::params::LoadError),

    #[error("Parameter {0} must be set for the mission controller")]
    MissingConfig(&'static str),

    #[error("No unit registered as \"{id}\" (set by parameter {key})")]
    UnresolvedRef { key: &'static str, id: String },
}
