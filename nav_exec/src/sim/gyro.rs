//! Simulated gyroscope

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use comms_if::{
    eqpt::gyro::{AxisThresholds, CalibrationDone, GyroEvent, GyroRequest},
    unit::{Ref, ReplySink},
};
use log::{debug, info, warn};
use nalgebra::Vector3;

use crate::runtime::Unit;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Gyroscope integrating the heading changes of the simulated world.
///
/// The world is planar so only the z axis is ever reported.
pub struct SimGyro {
    calibration_time_s: f32,
    calibration: Option<Calibration>,
    stream: Option<Stream>,
}

struct Calibration {
    remaining_s: f32,
    reply: Option<ReplySink<CalibrationDone>>,
}

struct Stream {
    recipient: Ref<GyroEvent>,
    thresholds: AxisThresholds,

    /// Units: degrees
    yaw_deg: f32,

    /// Units: degrees
    reported_yaw_deg: f32,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

#[derive(Debug)]
pub enum SimGyroMsg {
    Request(GyroRequest),

    /// The world has been stepped by `dt_s`, turning the robot by `yaw_deg`.
    Tick { yaw_deg: f32, dt_s: f32 },
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl SimGyro {
    pub fn new(calibration_time_s: f32) -> Self {
        Self {
            calibration_time_s,
            calibration: None,
            stream: None,
        }
    }

    fn on_request(&mut self, request: GyroRequest) {
        match request {
            GyroRequest::Calibrate { reply } => {
                info!("Gyro calibrating for {:.1} s", self.calibration_time_s);
                if self.calibration.is_some() {
                    warn!("Gyro calibration restarted before completing");
                }
                self.calibration = Some(Calibration {
                    remaining_s: self.calibration_time_s,
                    reply,
                });
            }
            GyroRequest::Continuous {
                recipient,
                thresholds,
            } => {
                debug!("Gyro streaming with thresholds {:?}", thresholds);
                self.stream = Some(Stream {
                    recipient,
                    thresholds,
                    yaw_deg: 0.0,
                    reported_yaw_deg: 0.0,
                });
            }
            GyroRequest::Stop => {
                debug!("Gyro stream stopped");
                self.stream = None;
            }
        }
    }

    fn on_tick(&mut self, yaw_deg: f32, dt_s: f32) {
        if let Some(ref mut c) = self.calibration {
            c.remaining_s -= dt_s;
        }
        if self.calibration.as_ref().map_or(false, |c| c.remaining_s <= 0.0) {
            info!("Gyro calibrated");
            let reply = self.calibration.take().and_then(|c| c.reply);
            if let Some(r) = reply {
                if let Err(e) = r.deliver(CalibrationDone) {
                    warn!("Could not deliver gyro calibration: {}", e);
                }
            }
        }

        let mut lost = false;
        if let Some(ref mut s) = self.stream {
            s.yaw_deg += yaw_deg;

            if let Some(threshold) = s.thresholds.z_deg {
                if (s.yaw_deg - s.reported_yaw_deg).abs() >= threshold {
                    s.reported_yaw_deg = s.yaw_deg;
                    let event = GyroEvent {
                        angles_deg: Vector3::new(0.0, 0.0, s.yaw_deg),
                    };
                    lost = s.recipient.send(event).is_err();
                }
            }
        }

        if lost {
            warn!("Gyro stream recipient has gone, stream stopped");
            self.stream = None;
        }
    }
}

impl Unit for SimGyro {
    type Msg = SimGyroMsg;

    fn on_message(&mut self, msg: SimGyroMsg) {
        match msg {
            SimGyroMsg::Request(r) => self.on_request(r),
            SimGyroMsg::Tick { yaw_deg, dt_s } => self.on_tick(yaw_deg, dt_s),
        }
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------
