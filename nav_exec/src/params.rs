//! # Navigation Executable Parameters
//!
//! Ids under which each unit is registered in the context, and the parameters of the units which
//! have no parameter file of their own.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{scan_proc::ScanProcParams, sim::SimParams, tank_ctrl::Drivetrain};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NavExecParams {
    pub unit_ids: UnitIds,

    /// Running gear of the robot, given to every unit that needs to know how it turns.
    #[serde(default)]
    pub drivetrain: Drivetrain,

    /// Shut down after this long, otherwise run until enter is pressed.
    ///
    /// Units: seconds
    #[serde(default)]
    pub run_duration_s: Option<f64>,

    #[serde(default)]
    pub scan_proc: ScanProcParams,

    #[serde(default)]
    pub sim: SimParams,
}

/// Context ids of every unit, these must match the ids used in the units' own parameter files.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UnitIds {
    pub tank: String,
    pub lcd: String,
    pub scanner: String,
    pub scan_processor: String,
    pub motion: String,
    pub gyro: String,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum RunDurationError {
    #[error("Run duration must be a finite number of seconds, found {0}")]
    NotFinite(f64),

    #[error("Run duration can't be negative, found {0} s")]
    Negative(f64),

    #[error("Run duration of {0} s is too long")]
    TooLong(f64),
}

// ------------------------------------------------------------------------------------------------
// FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Convert an optional run duration in seconds into the time to run for.
pub fn run_duration(duration_s: Option<f64>) -> Result<Option<Duration>, RunDurationError> {
    match duration_s {
        None => Ok(None),
        Some(d) if !d.is_finite() => Err(RunDurationError::NotFinite(d)),
        Some(d) if d < 0.0 => Err(RunDurationError::Negative(d)),
        Some(d) if d >= u64::MAX as f64 => Err(RunDurationError::TooLong(d)),
        Some(d) => Ok(Some(Duration::from_secs_f64(d))),
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_load_params() {
        let params: NavExecParams = util::params::from_str(
            r#"
            run_duration_s = 30.0
            drivetrain = "tracks"

            [unit_ids]
            tank = "tank"
            lcd = "lcd"
            scanner = "scanner"
            scan_processor = "scan_processor"
            motion = "motion"
            gyro = "gyro"

            [scan_proc]
            num_workers = 4

            [sim]
            arena_size_m = [10.0, 5.0]

            [[sim.obstacles]]
            min_m = [2.0, 2.0]
            max_m = [3.0, 3.0]
            "#,
        )
        .unwrap();

        assert_eq!(params.unit_ids.scan_processor, "scan_processor");
        assert_eq!(params.run_duration_s, Some(30.0));
        assert_eq!(params.drivetrain, Drivetrain::Tracks);
        assert_eq!(params.scan_proc.num_workers, 4);
        assert_eq!(params.scan_proc.corner_span_deg, ScanProcParams::default().corner_span_deg);
        assert_eq!(params.sim.arena_size_m, [10.0, 5.0]);
        assert_eq!(params.sim.obstacles.len(), 1);
        assert_eq!(params.sim.tick_period_ms, SimParams::default().tick_period_ms);
    }

    #[test]
    fn test_default_drivetrain() {
        let params: NavExecParams = util::params::from_str(
            r#"
            [unit_ids]
            tank = "tank"
            lcd = "lcd"
            scanner = "scanner"
            scan_processor = "scan_processor"
            motion = "motion"
            gyro = "gyro"
            "#,
        )
        .unwrap();

        assert_eq!(params.drivetrain, Drivetrain::Wheels);
        assert!(params.run_duration_s.is_none());
    }

    #[test]
    fn test_run_duration() {
        assert_eq!(run_duration(None), Ok(None));
        assert_eq!(
            run_duration(Some(2.5)),
            Ok(Some(Duration::from_millis(2500)))
        );
        assert_eq!(run_duration(Some(0.0)), Ok(Some(Duration::from_secs(0))));

        assert_eq!(
            run_duration(Some(f64::INFINITY)),
            Err(RunDurationError::NotFinite(f64::INFINITY))
        );
        assert!(matches!(
            run_duration(Some(f64::NAN)),
            Err(RunDurationError::NotFinite(_))
        ));
        assert_eq!(
            run_duration(Some(-1.0)),
            Err(RunDurationError::Negative(-1.0))
        );
        assert_eq!(
            run_duration(Some(1e300)),
            Err(RunDurationError::TooLong(1e300))
        );
    }
}
