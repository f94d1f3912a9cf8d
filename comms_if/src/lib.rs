//! # Communications interface crate.
//!
//! Provides all message contracts exchanged between the navigation units.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Command and data definitions for equipment (scanner, gyro, motors, display)
pub mod eqpt;

/// Polar geometry and scan analysis types
pub mod geom;

/// Mission lifecycle commands and navigation modes
pub mod mission;

/// Commands accepted by the tank controller
pub mod tank;

/// Unit references and reply sinks
pub mod unit;
