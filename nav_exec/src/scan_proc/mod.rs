//! # Scan processor
//!
//! Turns a sweep of the range scanner into an [`AnalysisResult`]. The extraction runs on the worker
//! pool so that a long analysis never holds up the processor's inbox.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

mod features;

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use comms_if::{
    geom::{AnalysisResult, ScanResult2D},
    unit::ReplySink,
};
use log::{error, trace, warn};
use serde::{Deserialize, Serialize};

use crate::runtime::{RuntimeError, Unit, WorkerPool};

pub use features::analyse;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// A request to analyse a sweep.
#[derive(Debug)]
pub struct ProcessingRequest {
    /// Where the analysis shall be sent.
    pub reply: ReplySink<AnalysisResult>,

    pub scan: ScanResult2D,

    /// Units: degrees
    pub angular_res_deg: f32,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ScanProcParams {
    /// Number of threads analysing scans.
    pub num_workers: usize,

    /// Angular distance to the neighbours used to measure the angle at each point.
    ///
    /// Units: degrees
    pub corner_span_deg: f32,

    /// Points where the walls meet at less than this angle are corners.
    ///
    /// Units: degrees
    pub corner_max_angle_deg: f32,

    /// Width of the opening needed around a target, its range is the shortest range in this
    /// window.
    ///
    /// Units: degrees
    pub target_window_deg: f32,
}

/// Scan processor unit.
pub struct ScanProcessor {
    params: ScanProcParams,
    pool: WorkerPool,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl ProcessingRequest {
    /// Request analysis of `scan` at the resolution it was measured with.
    pub fn new(reply: ReplySink<AnalysisResult>, scan: ScanResult2D) -> Self {
        Self {
            reply,
            angular_res_deg: scan.angular_res_deg(),
            scan,
        }
    }
}

impl Default for ScanProcParams {
    fn default() -> Self {
        Self {
            num_workers: 2,
            corner_span_deg: 4.0,
            corner_max_angle_deg: 120.0,
            target_window_deg: 10.0,
        }
    }
}

impl ScanProcessor {
    pub fn new(params: ScanProcParams) -> Result<Self, RuntimeError> {
        let pool = WorkerPool::new("scan_proc", params.num_workers)?;

        Ok(Self { params, pool })
    }
}

impl Unit for ScanProcessor {
    type Msg = ProcessingRequest;

    fn on_message(&mut self, msg: ProcessingRequest) {
        let ProcessingRequest {
            reply,
            scan,
            angular_res_deg,
        } = msg;
        let params = self.params.clone();

        trace!("Analysing scan of {} points", scan.points().len());

        let job = move || {
            let result = analyse(scan, angular_res_deg, &params);
            if let Err(e) = reply.deliver(result) {
                warn!("Could not deliver scan analysis: {}", e);
            }
        };

        if let Err(e) = self.pool.execute(job) {
            error!("Could not dispatch scan analysis: {}", e);
        }
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use comms_if::{geom::Point2f, unit::Ref};
    use std::{
        sync::{mpsc::channel, Arc},
        time::Duration,
    };

    #[test]
    fn test_processor_replies() {
        let mut processor = ScanProcessor::new(ScanProcParams {
            num_workers: 1,
            ..Default::default()
        })
        .unwrap();

        let (tx, rx) = channel::<AnalysisResult>();
        let scan = ScanResult2D::new(
            vec![
                Point2f::from_polar(1.0, -0.1),
                Point2f::from_polar(2.0, 0.0),
                Point2f::from_polar(1.0, 0.1),
            ],
            5.73,
        )
        .unwrap();

        processor.on_message(ProcessingRequest::new(
            ReplySink::to_unit(Arc::new(tx) as Ref<_>, |r| r),
            scan.clone(),
        ));

        let result = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(result.source, scan);
        assert_eq!(result.center_point, Point2f::from_polar(2.0, 0.0));
    }
}
