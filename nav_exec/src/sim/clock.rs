//! Simulation clock

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    thread::{self, JoinHandle},
    time::Duration,
};

use comms_if::unit::Ref;
use log::{info, warn};

use super::{lock_world, SharedWorld, SimGyroMsg};
use crate::runtime::RuntimeError;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Background thread stepping the simulated world and feeding the heading changes to the
/// gyroscope.
pub struct SimClock {
    run: Arc<AtomicBool>,
    jh: Option<JoinHandle<()>>,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl SimClock {
    pub fn start(
        world: SharedWorld,
        gyro: Ref<SimGyroMsg>,
        period: Duration,
    ) -> Result<Self, RuntimeError> {
        let run = Arc::new(AtomicBool::new(true));
        let run_clone = run.clone();

        let jh = thread::Builder::new()
            .name("sim_clock".into())
            .spawn(move || bg_thread(world, gyro, period, run_clone))
            .map_err(|e| RuntimeError::SpawnFailed("sim_clock".into(), e))?;

        Ok(Self { run, jh: Some(jh) })
    }

    /// Stop stepping the world and wait for the clock thread to exit.
    pub fn stop(mut self) {
        self.run.store(false, Ordering::Relaxed);

        if let Some(jh) = self.jh.take() {
            if jh.join().is_err() {
                warn!("Sim clock thread panicked");
            }
        }
    }
}

// ------------------------------------------------------------------------------------------------
// FUNCTIONS
// ------------------------------------------------------------------------------------------------

fn bg_thread(world: SharedWorld, gyro: Ref<SimGyroMsg>, period: Duration, run: Arc<AtomicBool>) {
    let dt_s = period.as_secs_f32();

    while run.load(Ordering::Relaxed) {
        thread::sleep(period);

        let yaw_deg = match lock_world(&world) {
            Some(mut w) => w.step(dt_s),
            None => break,
        };

        if gyro.send(SimGyroMsg::Tick { yaw_deg, dt_s }).is_err() {
            info!("Gyro has stopped, sim clock stopping");
            break;
        }
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------
