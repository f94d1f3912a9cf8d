//! Implementation of the MissionCtrl unit

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use chrono::Utc;
use comms_if::{
    eqpt::{
        lcd::{Colour, LcdMessage},
        scanner::{ScanRequest, ScanSpec},
    },
    geom::{AnalysisResult, Point2f, ScanResult2D},
    mission::{MissionEvent, NavigationMode},
    tank::{RotationDoneNotification, TankEvent},
    unit::{Ref, ReplySink},
};
use log::{debug, error, info, warn};

use super::{fastest_path, tm::MissionTm, MissionCtrlError, MissionCtrlParams, PathState};
use crate::{
    flag::AtomicFlag,
    runtime::{Context, Unit},
    scan_proc::ProcessingRequest,
    tank_ctrl::{Drivetrain, TurnAngles},
};

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Session relative path of the saved path state telemetry.
const PATH_STATE_TM_PATH: &str = "mission/path_state.json";

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Mission controller unit.
pub struct MissionCtrl {
    params: MissionCtrlParams,

    mode: NavigationMode,

    path_state: PathState,

    /// Changes how strongly the heading is corrected while driving.
    drivetrain: Drivetrain,

    /// Directions used to spin out of a corner.
    turn_angles: TurnAngles,

    tank: Ref<TankEvent>,
    lcd: Ref<LcdMessage>,
    scanner: Ref<ScanRequest>,
    scan_processor: Ref<ProcessingRequest>,

    /// Reference to this unit's own inbox, used to route replies back to it.
    self_ref: Ref<MissionMsg>,

    /// Set while a scan request is outstanding.
    scan_lock: AtomicFlag,

    /// The analysis the robot is currently rotating towards, waiting for the rotation to complete.
    pending_rotation: Option<AnalysisResult>,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// Messages accepted by the mission controller.
#[derive(Debug)]
pub enum MissionMsg {
    Event(MissionEvent),

    /// Result of a sweep, to be analysed
    Scan(ScanResult2D),

    /// Result of a single range measurement
    RangeScan(ScanResult2D),

    /// Analysis of a sweep
    Analysis(AnalysisResult),

    /// The tank refused the rotation towards the pending target
    RotationAborted,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl MissionCtrl {
    /// Initialise the mission controller from the given parameter file.
    ///
    /// If set, `mode_override` replaces the mode from the parameter file.
    pub fn init(
        params_path: &str,
        mode_override: Option<NavigationMode>,
        drivetrain: Drivetrain,
        ctx: &Context,
        self_ref: Ref<MissionMsg>,
    ) -> Result<Self, MissionCtrlError> {
        let params: MissionCtrlParams =
            util::params::load(params_path).map_err(MissionCtrlError::ParamLoadError)?;

        Self::new(with_mode(params, mode_override), drivetrain, ctx, self_ref)
    }

    /// Create the mission controller, resolving the units it drives from the context.
    ///
    /// `self_ref` must be the reference to this unit's own inbox.
    pub fn new(
        params: MissionCtrlParams,
        drivetrain: Drivetrain,
        ctx: &Context,
        self_ref: Ref<MissionMsg>,
    ) -> Result<Self, MissionCtrlError> {
        let wiring = [
            ("tank_id", &params.tank_id),
            ("lcd_id", &params.lcd_id),
            ("scanner_id", &params.scanner_id),
            ("scan_processor_id", &params.scan_processor_id),
        ];
        if let Some((key, _)) = wiring.iter().find(|(_, id)| id.is_none()) {
            return Err(MissionCtrlError::MissingConfig(*key));
        }

        let tank = resolve(ctx, "tank_id", &params.tank_id)?;
        let lcd = resolve(ctx, "lcd_id", &params.lcd_id)?;
        let scanner = resolve(ctx, "scanner_id", &params.scanner_id)?;
        let scan_processor = resolve(ctx, "scan_processor_id", &params.scan_processor_id)?;

        info!("Mission controller initialised in {} mode", params.mode);

        Ok(Self {
            mode: params.mode,
            drivetrain,
            turn_angles: TurnAngles::for_drivetrain(drivetrain),
            params,
            path_state: PathState::default(),
            tank,
            lcd,
            scanner,
            scan_processor,
            self_ref,
            scan_lock: AtomicFlag::new(),
            pending_rotation: None,
        })
    }

    pub fn path_state(&self) -> PathState {
        self.path_state
    }

    pub fn mode(&self) -> NavigationMode {
        self.mode
    }

    /// Stop the robot and start the mission from the beginning.
    pub fn start(&mut self) {
        self.show("Starting...", Colour::Teal);
        self.pending_rotation = None;
        self.send_tank(TankEvent::stop());

        match self.mode {
            NavigationMode::FastestPath => self.initiate_fastest_path(),
            NavigationMode::Gps | NavigationMode::Slam => {
                error!("Navigation mode {} is not supported", self.mode);
                self.show(format!("Unsupported\n{}", self.mode), Colour::Red);
            }
        }
    }

    /// Continue towards the target once the rotation requested for it has completed.
    pub fn stopped_rotating(&mut self) {
        match self.pending_rotation.take() {
            Some(result) => {
                self.send_tank(TankEvent::stop());
                self.start_move_to_target(&result);
            }
            None => debug!("Stopped rotating with no rotation pending"),
        }
    }

    /// Recover from a rotation the tank never started by looking around again.
    pub fn rotation_aborted(&mut self) {
        match self.pending_rotation.take() {
            Some(result) => {
                warn!(
                    "Rotation by {:.1} deg aborted by the tank, rescanning",
                    result.target_point.angle_rad.to_degrees()
                );
                self.send_tank(TankEvent::stop());
                self.schedule_scan(self.params.fastest_path.full_scan);
            }
            None => debug!("Rotation aborted with no rotation pending"),
        }
    }

    /// Forward a completed sweep for analysis.
    pub fn on_scan(&mut self, scan: ScanResult2D) {
        self.scan_lock.release();

        let reply = ReplySink::to_unit(self.self_ref.clone(), MissionMsg::Analysis);
        if let Err(e) = self
            .scan_processor
            .send(ProcessingRequest::new(reply, scan))
        {
            error!("Could not send scan for analysis: {}", e);
        }
    }

    /// Process a range measurement made while escaping a corner.
    ///
    /// While still enclosed the next measurement is taken on the side of the farthest point's
    /// bearing, so the robot keeps measuring towards the most open direction it has seen.
    ///
    /// A measurement arriving after a restart only frees the scanner, and the full scan the restart
    /// could not request is requested in its place.
    pub fn on_range_scan(&mut self, scan: ScanResult2D) {
        self.scan_lock.release();

        if self.path_state != PathState::Cornered {
            debug!("Range measurement ignored in state {:?}", self.path_state);

            if self.path_state == PathState::SeekingInfo
                && self.mode.is_implemented()
                && self.pending_rotation.is_none()
            {
                self.schedule_scan(self.params.fastest_path.full_scan);
            }
            return;
        }

        let farthest = scan.farthest_point();
        if farthest.range_m > self.params.fastest_path.escape_clearance_m {
            info!("Corner escaped, {:.1} m clear", farthest.range_m);
            self.send_tank(TankEvent::stop());
            self.update_state(PathState::SeekingInfo, Some(farthest));
            self.schedule_scan(self.params.fastest_path.full_scan);
        } else {
            self.schedule_range_measurement(farthest.angle_rad > 0.0);
        }
    }

    /// Decide what to do next from the analysis of a sweep.
    pub fn on_analysis(&mut self, result: AnalysisResult) {
        if !self.mode.is_implemented() {
            warn!("Analysis received in unsupported mode {}, ignored", self.mode);
            return;
        }

        match self.path_state {
            PathState::SeekingInfo => self.seek(result),
            PathState::MovingToTarget => self.move_to_target(result),
            PathState::Cornered => debug!("Analysis ignored while cornered"),
        }
    }

    fn initiate_fastest_path(&mut self) {
        self.path_state = PathState::SeekingInfo;
        self.save_tm(None);
        self.show("Starting\nMission!", Colour::Blue);
        self.schedule_scan(self.params.fastest_path.full_scan);
    }

    fn seek(&mut self, result: AnalysisResult) {
        if self.pending_rotation.is_some() {
            debug!("Analysis ignored while rotating towards a target");
            return;
        }

        let params = &self.params.fastest_path;
        let target = result.target_point;

        if fastest_path::is_cornered(&result, params) {
            let go_right = fastest_path::escape_to_right(&result, params);
            let escape_speed = params.escape_speed;

            self.send_tank(TankEvent::stop());
            self.update_state(PathState::Cornered, Some(target));
            self.show(
                format!(
                    "CornerEscape:\nG@{:.1}m,{:.1}deg",
                    target.range_m,
                    target.angle_rad.to_degrees()
                ),
                Colour::Red,
            );
            self.show("Corner escape\nRotating...", Colour::Blue);

            self.schedule_range_measurement(go_right);

            // Spin on the spot, the range probe decides when to stop rather than the gyro
            self.send_tank(TankEvent::drive(
                escape_speed,
                self.turn_angles.towards(go_right),
            ));
        } else {
            let rotation_speed = params.rotation_speed;

            self.show(
                format!(
                    "Rotating...\nR:{:.1} A:{:.1}",
                    target.range_m,
                    target.angle_rad.to_degrees()
                ),
                Colour::Yellow,
            );

            // Already facing the target, a zero rotation would be taken as a drive command
            if target.angle_rad == 0.0 {
                self.start_move_to_target(&result);
                return;
            }

            let listener =
                ReplySink::to_unit(self.self_ref.clone(), |n: RotationDoneNotification| match n {
                    RotationDoneNotification::RotationComplete => {
                        MissionMsg::Event(MissionEvent::StoppedRotating)
                    }
                    RotationDoneNotification::Aborted => MissionMsg::RotationAborted,
                });
            self.pending_rotation = Some(result);
            self.send_tank(TankEvent::rotate(
                rotation_speed,
                target.angle_rad,
                Some(listener),
            ));
        }
    }

    fn start_move_to_target(&mut self, result: &AnalysisResult) {
        let target = result.target_point;

        self.update_state(PathState::MovingToTarget, Some(target));
        self.show(
            format!("Moving to target\nR: {:.1}", target.range_m),
            Colour::Green,
        );
        self.schedule_scan(self.params.fastest_path.quick_scan);

        // Full speed ahead
        self.send_tank(TankEvent::drive(1.0, 0.0));
    }

    fn move_to_target(&mut self, result: AnalysisResult) {
        let params = &self.params.fastest_path;

        if fastest_path::is_cornered(&result, params) {
            info!(
                "Target reached ({:.2} m away)",
                result.target_point.distance(&Point2f::ORIGIN)
            );
            self.send_tank(TankEvent::stop());
            self.update_state(PathState::SeekingInfo, Some(result.target_point));
            self.schedule_scan(self.params.fastest_path.full_scan);
            return;
        }

        let decision = fastest_path::drive_decision(&result, self.drivetrain, params);
        let nearest = result.source.nearest_point();

        self.show(
            format!(
                "Goal: A:{:.0} R:{:.1}m\nNear: A:{:.0} R:{:.1}m",
                decision.aim.angle_rad.to_degrees(),
                decision.aim.range_m,
                nearest.angle_rad.to_degrees(),
                nearest.range_m
            ),
            Colour::Blue,
        );
        self.send_tank(TankEvent::drive(decision.speed, decision.direction_rad));
        self.schedule_scan(self.params.fastest_path.quick_scan);
    }

    /// Request a sweep unless a scan is already in progress.
    fn schedule_scan(&mut self, spec: ScanSpec) {
        if !self.scan_lock.try_acquire() {
            debug!("Scan already in progress, sweep request dropped");
            return;
        }

        let reply = ReplySink::to_unit(self.self_ref.clone(), MissionMsg::Scan);
        self.send_scan(ScanRequest::new(reply, spec));
    }

    /// Request a single range measurement to the right or left, unless a scan is already in
    /// progress.
    fn schedule_range_measurement(&mut self, go_right: bool) {
        if !self.scan_lock.try_acquire() {
            debug!("Scan already in progress, range measurement dropped");
            return;
        }

        let probe_deg = self.params.fastest_path.range_probe_deg;
        let bearing_deg = if go_right { probe_deg } else { -probe_deg };

        let reply = ReplySink::to_unit(self.self_ref.clone(), MissionMsg::RangeScan);
        self.send_scan(ScanRequest::range(reply, bearing_deg));
    }

    fn send_scan(&self, request: ScanRequest) {
        if let Err(e) = self.scanner.send(request) {
            // No result will ever arrive for this request
            error!("Could not send scan request: {}", e);
            self.scan_lock.release();
        }
    }

    fn update_state(&mut self, new_state: PathState, target: Option<Point2f>) {
        info!("Path state {:?} -> {:?}", self.path_state, new_state);
        self.path_state = new_state;

        let (colour, text) = new_state.display();
        self.show(text, colour);
        self.save_tm(target);
    }

    fn save_tm(&self, target: Option<Point2f>) {
        util::session::save_with_timestamp(
            PATH_STATE_TM_PATH,
            MissionTm {
                timestamp: Utc::now(),
                mode: self.mode,
                path_state: self.path_state,
                target,
            },
        );
    }

    fn send_tank(&self, event: TankEvent) {
        if let Err(e) = self.tank.send(event) {
            error!("Could not send command to the tank: {}", e);
        }
    }

    fn show<S: Into<String>>(&self, text: S, colour: Colour) {
        if let Err(e) = self.lcd.send(LcdMessage::new(text, colour)) {
            warn!("Could not update the display: {}", e);
        }
    }
}

impl Unit for MissionCtrl {
    type Msg = MissionMsg;

    fn on_message(&mut self, msg: MissionMsg) {
        match msg {
            MissionMsg::Event(MissionEvent::Start) => self.start(),
            MissionMsg::Event(MissionEvent::StoppedRotating) => self.stopped_rotating(),
            MissionMsg::Scan(s) => self.on_scan(s),
            MissionMsg::RangeScan(s) => self.on_range_scan(s),
            MissionMsg::Analysis(a) => self.on_analysis(a),
            MissionMsg::RotationAborted => self.rotation_aborted(),
        }
    }
}

// ------------------------------------------------------------------------------------------------
// FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Apply a mode given on the command line over the one from the parameter file.
fn with_mode(
    mut params: MissionCtrlParams,
    mode_override: Option<NavigationMode>,
) -> MissionCtrlParams {
    if let Some(mode) = mode_override {
        if mode != params.mode {
            info!("Navigation mode {} overridden to {}", params.mode, mode);
        }
        params.mode = mode;
    }

    params
}

fn resolve<M: 'static>(
    ctx: &Context,
    key: &'static str,
    id: &Option<String>,
) -> Result<Ref<M>, MissionCtrlError> {
    let id = id.as_ref().ok_or(MissionCtrlError::MissingConfig(key))?;

    ctx.get_ref::<M>(id)
        .ok_or_else(|| MissionCtrlError::UnresolvedRef {
            key,
            id: id.clone(),
        })
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use crate::mission_ctrl::FastestPathParams;
    use comms_if::geom::FeatureSet;
    use std::sync::{
        mpsc::{channel, Receiver},
        Arc,
    };

    struct Rig {
        mission: MissionCtrl,
        inbox: Receiver<MissionMsg>,
        tank: Receiver<TankEvent>,
        lcd: Receiver<LcdMessage>,
        scanner: Receiver<ScanRequest>,
        processor: Receiver<ProcessingRequest>,
    }

    impl Rig {
        fn new(mode: NavigationMode) -> Self {
            let (self_tx, inbox) = channel();
            let (tank_tx, tank) = channel();
            let (lcd_tx, lcd) = channel();
            let (scanner_tx, scanner) = channel();
            let (proc_tx, processor) = channel();

            let mut ctx = Context::new();
            ctx.register::<TankEvent>("tank", Arc::new(tank_tx));
            ctx.register::<LcdMessage>("lcd", Arc::new(lcd_tx));
            ctx.register::<ScanRequest>("scanner", Arc::new(scanner_tx));
            ctx.register::<ProcessingRequest>("scan_processor", Arc::new(proc_tx));

            let mission =
                MissionCtrl::new(params(mode), Drivetrain::Wheels, &ctx, Arc::new(self_tx))
                    .unwrap();

            Self {
                mission,
                inbox,
                tank,
                lcd,
                scanner,
                processor,
            }
        }

        /// Process everything in the mission's inbox.
        fn pump(&mut self) {
            while let Ok(m) = self.inbox.try_recv() {
                self.mission.on_message(m);
            }
        }

        fn send(&mut self, msg: MissionMsg) {
            self.mission.on_message(msg);
            self.pump();
        }

        /// Answer the outstanding sweep with the source of `result`, then answer the analysis
        /// request with `result`.
        fn complete_sweep(&mut self, result: AnalysisResult) {
            let request = self.scanner.try_recv().expect("no scan requested");
            assert!(!request.is_range_measurement());
            request.reply.deliver(result.source.clone()).unwrap();
            self.pump();

            let processing = self.processor.try_recv().expect("scan not analysed");
            assert_eq!(processing.scan, result.source);
            processing.reply.deliver(result).unwrap();
            self.pump();
        }

        /// Answer the outstanding range measurement.
        fn complete_range(&mut self, range_m: f32) -> f32 {
            let request = self.scanner.try_recv().expect("no range requested");
            assert!(request.is_range_measurement());
            let bearing_deg = request.start_deg;
            request
                .reply
                .deliver(
                    ScanResult2D::new(
                        vec![Point2f::from_polar(range_m, bearing_deg.to_radians())],
                        0.0,
                    )
                    .unwrap(),
                )
                .unwrap();
            self.pump();
            bearing_deg
        }

        fn tank_events(&self) -> Vec<TankEvent> {
            self.tank.try_iter().collect()
        }

        fn clear(&self) {
            self.tank.try_iter().count();
            self.lcd.try_iter().count();
        }
    }

    fn params(mode: NavigationMode) -> MissionCtrlParams {
        MissionCtrlParams {
            tank_id: Some("tank".into()),
            lcd_id: Some("lcd".into()),
            scanner_id: Some("scanner".into()),
            scan_processor_id: Some("scan_processor".into()),
            mode,
            fastest_path: FastestPathParams::default(),
        }
    }

    /// An analysis with the leftmost edge of the scan at 1 m and the rightmost at 2 m.
    fn analysis(target: Point2f) -> AnalysisResult {
        AnalysisResult {
            source: ScanResult2D::new(
                vec![
                    Point2f::from_polar(1.0, -0.7),
                    Point2f::from_polar(3.0, 0.0),
                    Point2f::from_polar(2.0, 0.7),
                ],
                0.4,
            )
            .unwrap(),
            features: FeatureSet::default(),
            target_point: target,
            center_point: Point2f::from_polar(3.0, 0.0),
        }
    }

    fn started() -> Rig {
        let mut rig = Rig::new(NavigationMode::FastestPath);
        rig.send(MissionMsg::Event(MissionEvent::Start));
        rig.clear();
        rig
    }

    /// Drive the rig from seeking info to moving towards a target 3 m away.
    fn rotate_and_move(rig: &mut Rig) {
        rig.complete_sweep(analysis(Point2f::from_polar(3.0, 0.4)));

        let mut events = rig.tank_events();
        assert_eq!(events.len(), 1);
        let rotation = events.remove(0);
        assert!(rotation.is_rotation());
        assert_eq!(rotation.rotate_rad, 0.4);

        // Not moving until the rotation is done, and no scan until then either
        assert_eq!(rig.mission.path_state(), PathState::SeekingInfo);
        assert!(rig.scanner.try_recv().is_err());

        rotation
            .rotation_done
            .unwrap()
            .deliver(RotationDoneNotification::RotationComplete)
            .unwrap();
        rig.pump();

        assert_eq!(rig.mission.path_state(), PathState::MovingToTarget);
        let events = rig.tank_events();
        assert_eq!(events.len(), 2);
        assert!(events[0].is_stop());
        assert_eq!((events[1].speed, events[1].direction_rad), (1.0, 0.0));
    }

    #[test]
    fn test_start() {
        let mut rig = Rig::new(NavigationMode::FastestPath);
        rig.send(MissionMsg::Event(MissionEvent::Start));

        let events = rig.tank_events();
        assert_eq!(events.len(), 1);
        assert!(events[0].is_stop());

        let texts: Vec<String> = rig.lcd.try_iter().map(|m| m.text).collect();
        assert_eq!(texts, vec!["Starting...", "Starting\nMission!"]);

        let scan = rig.scanner.try_recv().unwrap();
        assert_eq!(
            (scan.start_deg, scan.span_deg, scan.res_deg),
            (-45.0, 90.0, 0.4)
        );
        assert_eq!(rig.mission.path_state(), PathState::SeekingInfo);
    }

    #[test]
    fn test_single_scan_in_flight() {
        let mut rig = started();
        assert!(rig.scanner.try_recv().is_ok());

        // A restart while the sweep is outstanding doesn't request another one
        rig.send(MissionMsg::Event(MissionEvent::Start));
        assert!(rig.scanner.try_recv().is_err());
    }

    #[test]
    fn test_cornered() {
        let mut rig = started();
        rig.complete_sweep(analysis(Point2f::from_polar(0.3, 0.1)));

        assert_eq!(rig.mission.path_state(), PathState::Cornered);

        // Stop, then spin towards the more open right side. Never a forward drive.
        let events = rig.tank_events();
        assert_eq!(events.len(), 2);
        assert!(events[0].is_stop());
        assert!(!events[1].is_rotation());
        assert_eq!(events[1].speed, 0.5);
        assert_eq!(events[1].direction_rad, TurnAngles::WHEELS.towards(true));

        let texts: Vec<String> = rig.lcd.try_iter().map(|m| m.text).collect();
        assert_eq!(
            texts,
            vec![
                "Cornered",
                "CornerEscape:\nG@0.3m,5.7deg",
                "Corner escape\nRotating..."
            ]
        );

        // Probe the range on the right
        let request = rig.scanner.try_recv().unwrap();
        assert!(request.is_range_measurement());
        assert_eq!(request.start_deg, 10.0);
    }

    #[test]
    fn test_cornered_close_corner() {
        let mut rig = started();
        let mut result = analysis(Point2f::from_polar(0.3, 0.1));
        result.features.corners.push(Point2f::from_polar(0.6, -0.5));
        rig.complete_sweep(result);

        let events = rig.tank_events();
        assert_eq!(events[1].direction_rad, TurnAngles::WHEELS.towards(false));
        assert_eq!(rig.scanner.try_recv().unwrap().start_deg, -10.0);
    }

    #[test]
    fn test_corner_escape() {
        let mut rig = started();
        rig.complete_sweep(analysis(Point2f::from_polar(0.3, 0.1)));
        rig.clear();

        // Still blocked, keep probing on the same side
        assert_eq!(rig.complete_range(1.0), 10.0);
        assert_eq!(rig.mission.path_state(), PathState::Cornered);
        assert!(rig.tank_events().is_empty());

        // Clear, go back to seeking info with a full sweep
        assert_eq!(rig.complete_range(1.5), 10.0);
        assert_eq!(rig.mission.path_state(), PathState::SeekingInfo);
        let events = rig.tank_events();
        assert_eq!(events.len(), 1);
        assert!(events[0].is_stop());

        let scan = rig.scanner.try_recv().unwrap();
        assert_eq!(scan.span_deg, 90.0);
    }

    #[test]
    fn test_restart_while_cornered() {
        let mut rig = started();
        rig.complete_sweep(analysis(Point2f::from_polar(0.3, 0.1)));
        assert_eq!(rig.mission.path_state(), PathState::Cornered);

        // The range measurement still holds the scanner, so the restart can't request its sweep
        rig.send(MissionMsg::Event(MissionEvent::Start));
        assert_eq!(rig.mission.path_state(), PathState::SeekingInfo);
        rig.clear();

        // Once the measurement is in, the sweep is requested
        assert_eq!(rig.complete_range(0.8), 10.0);
        assert_eq!(rig.mission.path_state(), PathState::SeekingInfo);
        assert!(rig.mission.scan_lock.is_set());

        rig.complete_sweep(analysis(Point2f::from_polar(3.0, 0.0)));
        assert_eq!(rig.mission.path_state(), PathState::MovingToTarget);
    }

    #[test]
    fn test_corner_follows_farthest_point() {
        let mut rig = started();
        rig.complete_sweep(analysis(Point2f::from_polar(0.3, 0.1)));
        rig.clear();

        let request = rig.scanner.try_recv().unwrap();
        assert_eq!(request.start_deg, 10.0);

        // Still enclosed, but the farthest point is now on the left
        request
            .reply
            .deliver(
                ScanResult2D::new(
                    vec![
                        Point2f::from_polar(1.2, -0.17),
                        Point2f::from_polar(0.9, 0.17),
                    ],
                    0.0,
                )
                .unwrap(),
            )
            .unwrap();
        rig.pump();

        assert_eq!(rig.mission.path_state(), PathState::Cornered);
        assert_eq!(rig.scanner.try_recv().unwrap().start_deg, -10.0);
    }

    #[test]
    fn test_rotation_aborted() {
        let mut rig = started();
        rig.complete_sweep(analysis(Point2f::from_polar(3.0, 0.4)));

        let rotation = rig.tank_events().remove(0);
        assert!(rotation.is_rotation());
        rotation
            .rotation_done
            .unwrap()
            .deliver(RotationDoneNotification::Aborted)
            .unwrap();
        rig.pump();

        // Stopped and looking again, not waiting for the rotation
        assert_eq!(rig.mission.path_state(), PathState::SeekingInfo);
        let events = rig.tank_events();
        assert_eq!(events.len(), 1);
        assert!(events[0].is_stop());

        // The next analysis is acted on
        rig.complete_sweep(analysis(Point2f::from_polar(3.0, 0.0)));
        assert_eq!(rig.mission.path_state(), PathState::MovingToTarget);

        // A late abort changes nothing
        rig.clear();
        rig.send(MissionMsg::RotationAborted);
        assert!(rig.tank_events().is_empty());
        assert_eq!(rig.mission.path_state(), PathState::MovingToTarget);
    }

    #[test]
    fn test_rotate_then_move() {
        let mut rig = started();
        rotate_and_move(&mut rig);

        // Quick scan requested once moving
        let scan = rig.scanner.try_recv().unwrap();
        assert_eq!(
            (scan.start_deg, scan.span_deg, scan.res_deg),
            (-30.0, 60.0, 1.0)
        );
    }

    #[test]
    fn test_facing_target() {
        let mut rig = started();
        rig.complete_sweep(analysis(Point2f::from_polar(3.0, 0.0)));

        assert_eq!(rig.mission.path_state(), PathState::MovingToTarget);
        let events = rig.tank_events();
        assert_eq!(events.len(), 1);
        assert!(!events[0].is_rotation());
        assert_eq!(events[0].speed, 1.0);
    }

    #[test]
    fn test_moving_updates() {
        let mut rig = started();
        rotate_and_move(&mut rig);

        // Target straight ahead is good enough, drive straight limited by the nearest point
        rig.complete_sweep(analysis(Point2f::from_polar(3.0, 0.1)));
        assert_eq!(rig.mission.path_state(), PathState::MovingToTarget);
        let events = rig.tank_events();
        assert_eq!(events.len(), 1);
        assert_eq!((events[0].speed, events[0].direction_rad), (1.0, 0.0));

        // Another quick scan is requested after each update
        assert_eq!(rig.scanner.try_recv().unwrap().span_deg, 60.0);
    }

    #[test]
    fn test_goal_reached_round_trip() {
        let mut rig = started();

        for _ in 0..3 {
            rotate_and_move(&mut rig);

            // Target now close, stop and start over with a full sweep
            rig.complete_sweep(analysis(Point2f::from_polar(0.4, 0.2)));
            assert_eq!(rig.mission.path_state(), PathState::SeekingInfo);

            let events = rig.tank_events();
            assert_eq!(events.len(), 1);
            assert!(events[0].is_stop());
            // The sweep is left outstanding for the next loop
        }
    }

    #[test]
    fn test_unsupported_mode() {
        let mut rig = Rig::new(NavigationMode::Gps);
        rig.send(MissionMsg::Event(MissionEvent::Start));

        let events = rig.tank_events();
        assert_eq!(events.len(), 1);
        assert!(events[0].is_stop());
        assert_eq!((events[0].speed, events[0].direction_rad), (0.0, 0.0));

        assert!(rig.scanner.try_recv().is_err());
        assert_eq!(rig.mission.path_state(), PathState::SeekingInfo);
        assert_eq!(
            rig.lcd.try_iter().last().map(|m| m.colour),
            Some(Colour::Red)
        );

        // Analysis is dropped
        rig.send(MissionMsg::Analysis(analysis(Point2f::from_polar(0.3, 0.1))));
        assert_eq!(rig.mission.path_state(), PathState::SeekingInfo);
        assert!(rig.tank_events().is_empty());
    }

    #[test]
    fn test_stopped_rotating_without_rotation() {
        let mut rig = started();
        rig.send(MissionMsg::Event(MissionEvent::StoppedRotating));

        assert!(rig.tank_events().is_empty());
        assert_eq!(rig.mission.path_state(), PathState::SeekingInfo);
    }

    #[test]
    fn test_range_ignored_unless_cornered() {
        let mut rig = started();
        rig.send(MissionMsg::RangeScan(
            ScanResult2D::new(vec![Point2f::from_polar(3.0, 0.1)], 0.0).unwrap(),
        ));

        assert_eq!(rig.mission.path_state(), PathState::SeekingInfo);
        assert!(rig.tank_events().is_empty());
    }

    #[test]
    fn test_mode_override() {
        let p = with_mode(params(NavigationMode::FastestPath), Some(NavigationMode::Slam));
        assert_eq!(p.mode, NavigationMode::Slam);

        let p = with_mode(params(NavigationMode::Gps), None);
        assert_eq!(p.mode, NavigationMode::Gps);
    }

    #[test]
    fn test_missing_wiring() {
        let (self_tx, _) = channel::<MissionMsg>();
        let mut p = params(NavigationMode::FastestPath);
        p.lcd_id = None;

        assert!(matches!(
            MissionCtrl::new(
                p,
                Drivetrain::Wheels,
                &Context::new(),
                Arc::new(self_tx.clone())
            ),
            Err(MissionCtrlError::MissingConfig("lcd_id"))
        ));

        assert!(matches!(
            MissionCtrl::new(
                params(NavigationMode::FastestPath),
                Drivetrain::Wheels,
                &Context::new(),
                Arc::new(self_tx)
            ),
            Err(MissionCtrlError::UnresolvedRef { key: "tank_id", .. })
        ));
    }
}
