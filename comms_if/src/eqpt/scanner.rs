//! # Range Scanner Requests

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use crate::{geom::ScanResult2D, unit::ReplySink};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// A request for the scanner to sweep a sector and reply with the measured points.
///
/// A span of zero requests a single range measurement at `start_deg`.
#[derive(Debug)]
pub struct ScanRequest {
    /// Where the scan result shall be sent.
    pub reply: ReplySink<ScanResult2D>,

    /// Bearing of the first measurement, positive to the right.
    ///
    /// Units: degrees
    pub start_deg: f32,

    /// Angular width of the sweep.
    ///
    /// Units: degrees
    pub span_deg: f32,

    /// Angle between consecutive measurements.
    ///
    /// Units: degrees
    pub res_deg: f32,
}

/// Sector and resolution of a scan, as found in parameter files.
#[derive(Debug, Clone, Copy, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct ScanSpec {
    pub start_deg: f32,
    pub span_deg: f32,
    pub res_deg: f32,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl ScanRequest {
    pub fn new(reply: ReplySink<ScanResult2D>, spec: ScanSpec) -> Self {
        Self {
            reply,
            start_deg: spec.start_deg,
            span_deg: spec.span_deg,
            res_deg: spec.res_deg,
        }
    }

    /// A single range measurement at the given bearing.
    pub fn range(reply: ReplySink<ScanResult2D>, bearing_deg: f32) -> Self {
        Self {
            reply,
            start_deg: bearing_deg,
            span_deg: 0.0,
            res_deg: 0.0,
        }
    }

    pub fn is_range_measurement(&self) -> bool {
        self.span_deg == 0.0
    }
}
