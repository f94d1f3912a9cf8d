//! Main navigation executable entry point.
//!
//! # Architecture
//!
//! Every unit runs on its own thread, communicating only by messages sent through the references
//! registered in the shared context:
//!
//!     - Simulated equipment: display, motor bridge, gyroscope, range scanner, and the clock
//!       stepping the simulated world
//!     - Scan processor, analysing the scanner's sweeps on a worker pool
//!     - Tank controller, driving and rotating on the gyroscope's feedback
//!     - Mission controller, deciding where to go next
//!
//! The mission starts once the gyroscope has been calibrated through the tank controller.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::{io, sync::Arc, thread, time::Duration};

use color_eyre::{eyre::WrapErr, Report};
use comms_if::{
    eqpt::{
        gyro::{CalibrationDone, GyroRequest},
        lcd::{Colour, LcdMessage},
        motion::MotionEvent,
        scanner::ScanRequest,
    },
    mission::{MissionEvent, NavigationMode},
    tank::TankEvent,
    unit::{MappedRef, ReplyError, ReplySink},
};
use log::{error, info, warn};
use structopt::StructOpt;

use nav_lib::{
    mission_ctrl::{MissionCtrl, MissionMsg},
    params::{self, NavExecParams},
    runtime::{spawn_unit, Context, Inbox, UnitHandle},
    scan_proc::{ProcessingRequest, ScanProcessor},
    sim::{ConsoleLcd, SimClock, SimGyro, SimGyroMsg, SimMotion, SimScanner, SimWorld},
    tank_ctrl::{TankCtrl, TankMsg},
};
use util::{
    logger::{logger_init, LevelFilter},
    session::{self, Session},
};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, StructOpt)]
#[structopt(name = "nav_exec", about = "Autonomous navigation executable")]
struct Opt {
    /// Navigation mode, overriding the one set in mission_ctrl.toml
    #[structopt(short, long)]
    mode: Option<NavigationMode>,

    /// Shut down after this many seconds instead of waiting for enter
    #[structopt(short, long)]
    duration_s: Option<f64>,
}

// ------------------------------------------------------------------------------------------------
// FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Executable main function, entry point.
fn main() -> Result<(), Report> {
    color_eyre::install()?;

    let opt = Opt::from_args();

    // ---- EARLY INITIALISATION ----

    let session = Session::new("nav_exec", "sessions").wrap_err("Failed to create the session")?;

    logger_init(LevelFilter::Debug, &session).wrap_err("Failed to initialise logging")?;

    info!("Navigation Executable\n");
    info!("Session directory: {:?}\n", session.session_root);

    // ---- LOAD PARAMETERS ----

    let exec_params: NavExecParams =
        util::params::load("nav_exec.toml").wrap_err("Could not load exec params")?;

    let run_duration = params::run_duration(opt.duration_s.or(exec_params.run_duration_s))
        .wrap_err("Invalid run duration")?;

    info!("Exec parameters loaded");

    // ---- CONTEXT ----

    let ids = &exec_params.unit_ids;

    let lcd_inbox = Inbox::<LcdMessage>::new();
    let motion_inbox = Inbox::<MotionEvent>::new();
    let gyro_inbox = Inbox::<SimGyroMsg>::new();
    let scanner_inbox = Inbox::<ScanRequest>::new();
    let scan_proc_inbox = Inbox::<ProcessingRequest>::new();
    let tank_inbox = Inbox::<TankMsg>::new();
    let mission_inbox = Inbox::<MissionMsg>::new();

    let mut ctx = Context::new();
    ctx.register(&ids.lcd, lcd_inbox.unit_ref());
    ctx.register(&ids.motion, motion_inbox.unit_ref());
    ctx.register::<GyroRequest>(
        &ids.gyro,
        Arc::new(MappedRef::new(gyro_inbox.unit_ref(), SimGyroMsg::Request)),
    );
    ctx.register(&ids.scanner, scanner_inbox.unit_ref());
    ctx.register(&ids.scan_processor, scan_proc_inbox.unit_ref());
    ctx.register::<TankEvent>(
        &ids.tank,
        Arc::new(MappedRef::new(tank_inbox.unit_ref(), TankMsg::Event)),
    );
    let ctx = Arc::new(ctx);

    // ---- INITIALISE UNITS ----

    info!("Initialising units...");

    let world = SimWorld::shared(exec_params.sim.clone());
    let calibration_time_s = exec_params.sim.calibration_time_ms as f32 / 1000.0;

    let scan_processor = ScanProcessor::new(exec_params.scan_proc.clone())
        .wrap_err("Failed to initialise the ScanProcessor")?;

    let tank = TankCtrl::init(
        "tank_ctrl.toml",
        exec_params.drivetrain,
        ctx.clone(),
        tank_inbox.unit_ref(),
    )
    .wrap_err("Failed to initialise TankCtrl")?;
    info!("TankCtrl init complete");

    let mission = MissionCtrl::init(
        "mission_ctrl.toml",
        opt.mode,
        exec_params.drivetrain,
        &ctx,
        mission_inbox.unit_ref(),
    )
    .wrap_err("Failed to initialise MissionCtrl")?;
    info!("MissionCtrl init complete");

    // ---- START UNITS ----

    let lcd_ref = lcd_inbox.unit_ref();
    let gyro_ref = gyro_inbox.unit_ref();
    let tank_ref = tank_inbox.unit_ref();
    let mission_ref = mission_inbox.unit_ref();

    // Started in dependency order, stopped in reverse
    let handles: Vec<UnitHandle> = vec![
        spawn_unit("lcd", ConsoleLcd::default(), lcd_inbox)?,
        spawn_unit("motion", SimMotion::new(world.clone()), motion_inbox)?,
        spawn_unit("gyro", SimGyro::new(calibration_time_s), gyro_inbox)?,
        spawn_unit("scanner", SimScanner::new(world.clone()), scanner_inbox)?,
        spawn_unit("scan_proc", scan_processor, scan_proc_inbox)?,
        spawn_unit("tank_ctrl", tank, tank_inbox)?,
        spawn_unit("mission_ctrl", mission, mission_inbox)?,
    ];

    let clock = SimClock::start(
        world.clone(),
        gyro_ref,
        Duration::from_millis(exec_params.sim.tick_period_ms),
    )
    .wrap_err("Failed to start the simulation clock")?;

    info!("Units started\n");

    // ---- START MISSION ----

    // The robot must stay still until the gyro is calibrated
    let on_calibrated = ReplySink::new(move |_: CalibrationDone| {
        if lcd_ref
            .send(LcdMessage::new("Starting", Colour::Teal))
            .is_err()
        {
            warn!("Display unavailable");
        }

        mission_ref
            .send(MissionMsg::Event(MissionEvent::Start))
            .map_err(ReplyError::Unit)
    });

    tank_ref
        .send(TankMsg::Calibrate(Some(on_calibrated)))
        .wrap_err("Could not start the gyro calibration")?;

    // ---- RUN ----

    match run_duration {
        Some(duration) => {
            info!("Running for {:.1} s", duration.as_secs_f64());
            thread::sleep(duration);
        }
        None => {
            info!("Press enter to stop");
            let mut line = String::new();
            io::stdin()
                .read_line(&mut line)
                .wrap_err("Failed to read from stdin")?;
        }
    }

    // ---- SHUTDOWN ----

    info!("Shutting down");

    clock.stop();

    for handle in handles.into_iter().rev() {
        let name = handle.name().to_string();
        match handle.shutdown() {
            Ok(()) => info!("Unit {} stopped", name),
            Err(e) => error!("Unit {} did not stop cleanly: {}", name, e),
        }
    }

    match world.lock() {
        Ok(w) => {
            let pose = w.pose();
            info!(
                "Final pose: ({:.2}, {:.2}) m, {:.1} deg",
                pose.position_m.x,
                pose.position_m.y,
                pose.heading_rad.to_degrees()
            );
            session::save("sim/final_pose.json", pose);
        }
        Err(_) => error!("Simulated world mutex poisoned"),
    }

    info!("Ran for {:.1} s", session::get_elapsed_seconds());

    session.exit();

    Ok(())
}
