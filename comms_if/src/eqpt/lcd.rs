//! # Display Commands

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Show a status text on the display with the given backlight colour. Fire and forget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LcdMessage {
    pub text: String,
    pub colour: Colour,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// Backlight colours supported by the display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Colour {
    Off,
    Red,
    Green,
    Blue,
    Yellow,
    Teal,
    Violet,
    White,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl LcdMessage {
    pub fn new<S: Into<String>>(text: S, colour: Colour) -> Self {
        Self {
            text: text.into(),
            colour,
        }
    }
}
