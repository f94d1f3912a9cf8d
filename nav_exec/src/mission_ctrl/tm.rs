//! # Defines Telemetry Pack for the Mission

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use chrono::{DateTime, Utc};
use comms_if::{geom::Point2f, mission::NavigationMode};
use serde::Serialize;

use super::PathState;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Saved every time the mission changes path state.
#[derive(Debug, Clone, Serialize)]
pub struct MissionTm {
    pub timestamp: DateTime<Utc>,
    pub mode: NavigationMode,
    pub path_state: PathState,

    /// Target of the analysis which caused the transition, if any.
    pub target: Option<Point2f>,
}
