//! # Navigation library.
//!
//! This library allows other crates in the workspace, and the navigation executable, to access the
//! units defined inside the navigation crate.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Atomic flag used to guard single-flight operations
pub mod flag;

/// Mission controller - decides where the robot goes from the scans it requests
pub mod mission_ctrl;

/// Executable parameters
pub mod params;

/// Unit runtime - threads, inboxes, the unit registry and the worker pool
pub mod runtime;

/// Scan processor - extracts features and targets from range scans
pub mod scan_proc;

/// Simulated equipment - lets the units run without the robot
pub mod sim;

/// Tank controller - drives the tracks and performs gyro closed rotations
pub mod tank_ctrl;
