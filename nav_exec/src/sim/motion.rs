//! Simulated motor bridge

use comms_if::eqpt::motion::MotionEvent;
use log::trace;

use super::{lock_world, SharedWorld};
use crate::runtime::Unit;

/// Motor bridge setting the demand of the simulated world.
pub struct SimMotion {
    world: SharedWorld,
}

impl SimMotion {
    pub fn new(world: SharedWorld) -> Self {
        Self { world }
    }
}

impl Unit for SimMotion {
    type Msg = MotionEvent;

    fn on_message(&mut self, demand: MotionEvent) {
        trace!("Motion demand {:?}", demand);

        if let Some(mut world) = lock_world(&self.world) {
            world.set_demand(demand);
        }
    }

    fn on_shutdown(&mut self) {
        if let Some(mut world) = lock_world(&self.world) {
            world.set_demand(MotionEvent::stop());
        }
    }
}
