//! Simulated range scanner

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::{thread, time::Duration};

use comms_if::{
    eqpt::scanner::ScanRequest,
    geom::{Point2f, ScanResult2D},
};
use log::{error, trace, warn};

use super::{lock_world, SharedWorld};
use crate::runtime::Unit;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Range scanner ray casting into the simulated world.
pub struct SimScanner {
    world: SharedWorld,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl SimScanner {
    pub fn new(world: SharedWorld) -> Self {
        Self { world }
    }
}

impl Unit for SimScanner {
    type Msg = ScanRequest;

    fn on_message(&mut self, request: ScanRequest) {
        let bearings_deg: Vec<f32> = if request.is_range_measurement() || request.res_deg <= 0.0 {
            vec![request.start_deg]
        } else {
            let n = (request.span_deg / request.res_deg + 1e-3).floor() as usize;
            (0..=n)
                .map(|i| request.start_deg + i as f32 * request.res_deg)
                .collect()
        };

        let (points, point_time_ms): (Vec<Point2f>, u64) = match lock_world(&self.world) {
            Some(world) => (
                bearings_deg
                    .iter()
                    .map(|b| Point2f::from_polar(world.range_at(b.to_radians()), b.to_radians()))
                    .collect(),
                world.params().scan_point_time_ms,
            ),
            None => return,
        };

        // The real scanner sweeps its head, which takes time
        thread::sleep(Duration::from_millis(point_time_ms * points.len() as u64));

        trace!("Scanned {} points from {:.1} deg", points.len(), request.start_deg);

        match ScanResult2D::new(points, request.res_deg) {
            Ok(scan) => {
                if let Err(e) = request.reply.deliver(scan) {
                    warn!("Could not deliver scan: {}", e);
                }
            }
            Err(e) => error!("Invalid scan request {:?}: {}", request, e),
        }
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------
