//! # Mission commands

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// Lifecycle commands accepted by the mission controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MissionEvent {
    /// Stop the robot and start the mission from scratch.
    Start,

    /// Acknowledges that a rotation requested by the mission has completed.
    StoppedRotating,
}

/// The navigation strategy used by the mission controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NavigationMode {
    /// Always look for the path allowing the robot to go as far as possible without hindrance.
    FastestPath,

    /// Visit a list of GPS coordinates in order. Not implemented.
    Gps,

    /// Simultaneous localisation and mapping. Not implemented.
    #[serde(alias = "FAST_SLAM")]
    Slam,
}

#[derive(Debug, thiserror::Error, PartialEq)]
#[error("Unknown navigation mode \"{0}\", expected one of FASTEST_PATH, GPS, SLAM")]
pub struct ParseModeError(String);

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl NavigationMode {
    pub fn is_implemented(&self) -> bool {
        matches!(self, NavigationMode::FastestPath)
    }
}

impl Default for NavigationMode {
    fn default() -> Self {
        NavigationMode::FastestPath
    }
}

impl FromStr for NavigationMode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "FASTEST_PATH" => Ok(NavigationMode::FastestPath),
            "GPS" => Ok(NavigationMode::Gps),
            "SLAM" | "FAST_SLAM" => Ok(NavigationMode::Slam),
            _ => Err(ParseModeError(s.to_string())),
        }
    }
}

impl fmt::Display for NavigationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NavigationMode::FastestPath => write!(f, "FASTEST_PATH"),
            NavigationMode::Gps => write!(f, "GPS"),
            NavigationMode::Slam => write!(f, "SLAM"),
        }
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------
