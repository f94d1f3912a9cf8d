//! # Path states of the fastest path mode

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use comms_if::eqpt::lcd::Colour;
use serde::{Deserialize, Serialize};

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PathState {
    /// More information is needed before choosing a target. The start state.
    SeekingInfo,

    /// There is no good path to travel, escaping.
    Cornered,

    /// A target has been chosen and the robot is driving towards it.
    MovingToTarget,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl PathState {
    /// Colour and text shown on the display when entering the state.
    pub fn display(&self) -> (Colour, &'static str) {
        match self {
            PathState::SeekingInfo => (Colour::Blue, "Gathering Info"),
            PathState::Cornered => (Colour::Red, "Cornered"),
            PathState::MovingToTarget => (Colour::Teal, "Moving to Target"),
        }
    }
}

impl Default for PathState {
    fn default() -> Self {
        PathState::SeekingInfo
    }
}
