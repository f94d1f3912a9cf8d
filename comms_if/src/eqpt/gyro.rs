//! # Gyroscope Requests and Data

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::fmt;

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::unit::{Ref, ReplySink};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// An orientation sample from the gyroscope.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GyroEvent {
    /// Angles accumulated about each axis since the sample stream was started. Not wrapped, so a
    /// full turn to the right reads 360 on the z axis.
    ///
    /// Units: degrees
    pub angles_deg: Vector3<f32>,
}

/// Minimum change about each axis before a new sample is streamed. `None` means changes about that
/// axis are not of interest.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AxisThresholds {
    pub x_deg: Option<f32>,
    pub y_deg: Option<f32>,
    pub z_deg: Option<f32>,
}

/// Signal that calibration has completed and the reference frame has been reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalibrationDone;

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

pub enum GyroRequest {
    /// Reset the gyroscope's reference frame. The robot must be still until the reply arrives.
    Calibrate {
        reply: Option<ReplySink<CalibrationDone>>,
    },

    /// Stream samples to `recipient` until stopped, replacing any previous recipient. Angles are
    /// accumulated from zero at the moment this request is handled.
    Continuous {
        recipient: Ref<GyroEvent>,
        thresholds: AxisThresholds,
    },

    /// Stop streaming samples.
    Stop,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl GyroEvent {
    pub fn z_deg(&self) -> f32 {
        self.angles_deg.z
    }
}

impl AxisThresholds {
    /// Only report changes about the z (yaw) axis.
    pub fn yaw_only(z_deg: f32) -> Self {
        Self {
            x_deg: None,
            y_deg: None,
            z_deg: Some(z_deg),
        }
    }
}

impl fmt::Debug for GyroRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GyroRequest::Calibrate { reply } => f
                .debug_struct("Calibrate")
                .field("reply", reply)
                .finish(),
            GyroRequest::Continuous { thresholds, .. } => f
                .debug_struct("Continuous")
                .field("thresholds", thresholds)
                .finish(),
            GyroRequest::Stop => write!(f, "Stop"),
        }
    }
}
