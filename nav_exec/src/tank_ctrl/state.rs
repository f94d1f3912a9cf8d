//! Implementation of the TankCtrl unit

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::{
    fmt::Debug,
    panic::{self, AssertUnwindSafe},
    sync::Arc,
};

use comms_if::{
    eqpt::{
        gyro::{AxisThresholds, CalibrationDone, GyroEvent, GyroRequest},
        motion::MotionEvent,
    },
    tank::{RotationDoneNotification, TankEvent},
    unit::{MappedRef, Ref, ReplySink},
};
use log::{debug, error, info, trace};
use util::maths::clamp;

use super::{is_done_rotating, Drivetrain, TankCtrlError, TankCtrlParams, TurnAngles};
use crate::{
    flag::AtomicFlag,
    runtime::{Context, Unit},
};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Tank controller unit.
pub struct TankCtrl {
    params: TankCtrlParams,

    turn_angles: TurnAngles,

    motion_id: String,
    gyro_id: String,

    ctx: Arc<Context>,

    /// Reference given to the gyroscope so that its samples arrive in this unit's inbox.
    gyro_recipient: Ref<GyroEvent>,

    /// Set while a rotation is in progress.
    rotating: AtomicFlag,

    rotation: Option<Rotation>,
}

/// The rotation currently being performed.
struct Rotation {
    /// Target yaw in the gyroscope's feedback frame.
    ///
    /// Units: degrees
    target_deg: f32,

    listener: Option<ReplySink<RotationDoneNotification>>,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// Messages accepted by the tank controller.
#[derive(Debug)]
pub enum TankMsg {
    /// A drive, rotate or stop command
    Event(TankEvent),

    /// A yaw sample from the gyroscope
    Gyro(GyroEvent),

    /// Calibrate the gyroscope, replying once done
    Calibrate(Option<ReplySink<CalibrationDone>>),
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl TankCtrl {
    /// Initialise the tank controller from the given parameter file.
    ///
    /// `self_ref` must be the reference to this unit's own inbox.
    pub fn init(
        params_path: &str,
        drivetrain: Drivetrain,
        ctx: Arc<Context>,
        self_ref: Ref<TankMsg>,
    ) -> Result<Self, TankCtrlError> {
        let params: TankCtrlParams =
            util::params::load(params_path).map_err(TankCtrlError::ParamLoadError)?;

        Self::new(params, drivetrain, ctx, self_ref)
    }

    pub fn new(
        params: TankCtrlParams,
        drivetrain: Drivetrain,
        ctx: Arc<Context>,
        self_ref: Ref<TankMsg>,
    ) -> Result<Self, TankCtrlError> {
        let motion_id = params
            .motion_id
            .clone()
            .ok_or(TankCtrlError::MissingConfig("motion_id"))?;
        let gyro_id = params
            .gyro_id
            .clone()
            .ok_or(TankCtrlError::MissingConfig("gyro_id"))?;

        for (key, id) in [("motion_id", &motion_id), ("gyro_id", &gyro_id)].iter() {
            if !ctx.contains(id) {
                return Err(TankCtrlError::UnresolvedRef {
                    key: *key,
                    id: id.to_string(),
                });
            }
        }

        Ok(Self {
            turn_angles: TurnAngles::for_drivetrain(drivetrain),
            params,
            motion_id,
            gyro_id,
            ctx,
            gyro_recipient: Arc::new(MappedRef::new(self_ref, TankMsg::Gyro)),
            rotating: AtomicFlag::new(),
            rotation: None,
        })
    }

    pub fn is_rotating(&self) -> bool {
        self.rotating.is_set()
    }

    /// Execute a tank command.
    pub fn handle_event(&mut self, event: TankEvent) {
        if event.is_rotation() {
            self.rotate_by(event);
        } else if event.is_stop() {
            self.stop();
        } else {
            self.drive(event.speed, event.direction_rad);
        }
    }

    /// Stop the tank, cancelling any rotation in progress without notifying its listener.
    pub fn stop(&mut self) {
        if let Some(r) = self.rotation.take() {
            debug!("Rotation towards {:.1} deg cancelled", r.target_deg);
            self.send_to(&self.gyro_id, GyroRequest::Stop);
        }
        self.rotating.release();

        self.send_to(&self.motion_id, MotionEvent::stop());
    }

    /// Drive at the given speed and direction, unless a rotation is in progress.
    pub fn drive(&mut self, speed: f32, direction_rad: f32) {
        if self.rotating.is_set() {
            debug!(
                "Drive command (speed {:.2}, dir {:.2} rad) dropped while rotating",
                speed, direction_rad
            );
            return;
        }

        self.set_speed(speed, direction_rad);
    }

    /// Start a gyro based rotation by `event.rotate_rad`.
    ///
    /// The request is dropped if a rotation is already in progress. A rotation that is not started
    /// notifies its listener with [`RotationDoneNotification::Aborted`].
    pub fn rotate_by(&mut self, event: TankEvent) {
        if !self.rotating.try_acquire() {
            debug!(
                "Already rotating, rotation by {:.1} deg dropped",
                event.rotate_rad.to_degrees()
            );
            if let Some(listener) = event.rotation_done {
                notify_rotation_done(listener, RotationDoneNotification::Aborted);
            }
            return;
        }

        // Continuous feedback accumulates from zero, so the target in the feedback frame is the
        // requested rotation itself
        let target_deg = event.rotate_rad.to_degrees();

        let feedback = GyroRequest::Continuous {
            recipient: self.gyro_recipient.clone(),
            thresholds: AxisThresholds::yaw_only(self.params.gyro_threshold_z_deg),
        };
        if !self.send_to(&self.gyro_id, feedback) {
            // Without feedback the rotation could never complete
            error!("Rotation by {:.1} deg aborted, no gyro feedback", target_deg);
            self.rotating.release();
            if let Some(listener) = event.rotation_done {
                notify_rotation_done(listener, RotationDoneNotification::Aborted);
            }
            return;
        }

        info!("Rotating by {:.1} deg", target_deg);
        self.rotation = Some(Rotation {
            target_deg,
            listener: event.rotation_done,
        });

        let direction_rad = self.turn_angles.towards(target_deg > 0.0);
        self.set_speed(event.speed.abs(), direction_rad);
    }

    /// Ask the gyroscope to reset its reference frame.
    pub fn calibrate(&mut self, reply: Option<ReplySink<CalibrationDone>>) {
        info!("Calibrating gyro");
        self.send_to(&self.gyro_id, GyroRequest::Calibrate { reply });
    }

    /// Process a yaw sample, completing the current rotation if its target has been reached.
    pub fn on_gyro(&mut self, event: GyroEvent) {
        let target_deg = match self.rotation {
            Some(ref r) => r.target_deg,
            None => {
                trace!("Gyro sample with no rotation in progress: {:?}", event);
                return;
            }
        };

        if !is_done_rotating(target_deg, event.z_deg()) {
            trace!("Rotating, at {:.1} of {:.1} deg", event.z_deg(), target_deg);
            return;
        }

        self.send_to(&self.gyro_id, GyroRequest::Stop);
        let rotation = self.rotation.take();
        self.rotating.release();

        info!(
            "Rotation complete at {:.1} deg (target {:.1} deg)",
            event.z_deg(),
            target_deg
        );

        if let Some(listener) = rotation.and_then(|r| r.listener) {
            notify_rotation_done(listener, RotationDoneNotification::RotationComplete);
        }
    }

    fn set_speed(&self, speed: f32, direction_rad: f32) {
        let speed = clamp(speed, -1.0, 1.0) * self.params.max_speed;
        self.send_to(&self.motion_id, MotionEvent::new(speed, direction_rad));
    }

    /// Send a message to the unit registered under `id`, returning `true` if it was sent.
    fn send_to<M: Debug + 'static>(&self, id: &str, msg: M) -> bool {
        let unit = match self.ctx.get_ref::<M>(id) {
            Some(u) => u,
            None => {
                error!("No unit \"{}\" to send {:?} to, command dropped", id, msg);
                return false;
            }
        };

        match unit.send(msg) {
            Ok(()) => true,
            Err(e) => {
                error!("Could not send to unit \"{}\": {}", id, e);
                false
            }
        }
    }
}

impl Unit for TankCtrl {
    type Msg = TankMsg;

    fn on_message(&mut self, msg: TankMsg) {
        match msg {
            TankMsg::Event(e) => self.handle_event(e),
            TankMsg::Gyro(g) => self.on_gyro(g),
            TankMsg::Calibrate(r) => self.calibrate(r),
        }
    }

    fn on_shutdown(&mut self) {
        self.stop();
    }
}

// ------------------------------------------------------------------------------------------------
// FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Deliver the outcome of a rotation, containing any failure of the listener.
fn notify_rotation_done(
    listener: ReplySink<RotationDoneNotification>,
    notification: RotationDoneNotification,
) {
    let result = panic::catch_unwind(AssertUnwindSafe(move || listener.deliver(notification)));

    match result {
        Ok(Ok(())) => (),
        Ok(Err(e)) => error!("Rotation done listener failed: {}", e),
        Err(_) => error!("Rotation done listener panicked"),
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------
