//! Main tracker executable entry point.
//!
//! # Architecture
//!
//! The general execution methodology consists of:
//!
//!     - Initialise all modules
//!     - Main loop:
//!         - Commit the latest cached odometry into the data store
//!         - Drain the path topic, one control computation and one command
//!           emission per received path
//!         - Cycle management
//!
//! Odometry and tuning updates arrive on background subscriber threads and
//! only refresh cached state, they never trigger a computation themselves.
//! The executive cycle period matches the speed controller's fixed
//! integration step, so the controller is called at the cadence it assumes.

// ---------------------------------------------------------------------------
// USE MODULES FROM LIBRARY
// ---------------------------------------------------------------------------

use track_lib::{
    cmd_server::CmdServer,
    data_store::DataStore,
    odom_client::OdomClient,
    path::Path,
    path_client::{PathClient, PathClientError},
    tuning_client::TuningClient,
};

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use color_eyre::{eyre::WrapErr, Report};
use log::{debug, info, warn};
use std::thread;
use std::time::{Duration, Instant};

// Internal
use comms_if::net::NetParams;
use util::{
    logger::{logger_init, LevelFilter},
    archive::Archived,
    module::State,
    session::Session,
};

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Target period of one cycle.
///
/// This is also the fixed integration step assumed by the speed controller.
const CYCLE_PERIOD_S: f64 = 0.10;

/// Number of cycles per second
const CYCLE_FREQUENCY_HZ: f64 = 1.0 / CYCLE_PERIOD_S;

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Executable main function, entry point.
fn main() -> Result<(), Report> {
    // ---- EARLY INITIALISATION ----

    // Initialise session
    let session = Session::new("track_exec", "sessions")
        .wrap_err("Failed to create the session")?;

    // Initialise logger
    logger_init(LevelFilter::Trace, &session)
        .wrap_err("Failed to initialise logging")?;

    // Log information on this execution.
    info!("Path Tracker Executable\n");
    info!("Session directory: {:?}\n", session.session_root);

    // ---- LOAD PARAMETERS ----

    let net_params: NetParams =
        util::params::load("net.toml").wrap_err("Could not load net params")?;

    info!("Exec parameters loaded");

    // ---- INITIALISE DATASTORE ----

    info!("Initialising modules...");

    let mut ds = DataStore::default();

    // ---- INITIALISE MODULES ----

    ds.track_ctrl
        .init("track_ctrl.toml", &session)
        .wrap_err("Failed to initialise TrackCtrl")?;
    info!("TrackCtrl init complete");

    info!("Module initialisation complete\n");

    // ---- INITIALISE NETWORK ----

    info!("Initialising network");

    let zmq_ctx = comms_if::net::zmq::Context::new();

    let odom_client = OdomClient::new(&zmq_ctx, &net_params)
        .wrap_err("Failed to initialise the OdomClient")?;
    info!("OdomClient initialised");

    let path_client = PathClient::new(&zmq_ctx, &net_params)
        .wrap_err("Failed to initialise the PathClient")?;
    info!("PathClient initialised");

    let _tuning_client = TuningClient::new(&zmq_ctx, &net_params, ds.track_ctrl.tuning_gate())
        .wrap_err("Failed to initialise the TuningClient")?;
    info!("TuningClient initialised");

    let mut cmd_server = CmdServer::new(&zmq_ctx, &net_params)
        .wrap_err("Failed to initialise the CmdServer")?;
    info!("CmdServer initialised");

    info!("Network initialisation complete");

    // ---- MAIN LOOP ----

    info!("Begining main loop\n");

    loop {
        // Get cycle start time
        let cycle_start_instant = Instant::now();

        // Clear items that need wiping at the start of the cycle
        ds.cycle_start(CYCLE_FREQUENCY_HZ);

        // ---- DATA INPUT ----

        // Commit the latest odometry into the data store. The cache holds
        // whichever update was last committed before this cycle started.
        if let Some(odom) = odom_client.latest_odom() {
            ds.set_odom(&odom);
        }

        // ---- PATH PROCESSING ----

        // Get paths until none remain. Each path triggers exactly one
        // control computation and one command emission, using whatever
        // pose/velocity state is currently cached.
        loop {
            let path_msg = match path_client.receive_path() {
                Ok(Some(p)) => p,
                Ok(None) => break,
                Err(e @ PathClientError::NonUtf8Message)
                | Err(e @ PathClientError::PathParseError(_)) => {
                    warn!("Could not parse recieved path: {}", e);
                    continue;
                }
                Err(e) => {
                    warn!("Error receiving paths from the planner: {}", e);
                    break;
                }
            };

            ds.num_paths_rx += 1;

            // Build the tracker's path from the message, discarding paths
            // that violate the planner contract
            let path = match Path::from_msg(&path_msg) {
                Ok(p) => p,
                Err(e) => {
                    warn!("Discarding invalid path: {}", e);
                    continue;
                }
            };

            // Assemble the input data from the cached state and the new path
            ds.track_ctrl_input.pose = ds.pose;
            ds.track_ctrl_input.speed_ms = ds
                .velocity
                .as_ref()
                .map(|v| v.speed_ms())
                .unwrap_or(0.0);
            ds.track_ctrl_input.path = Some(path);

            // TrackCtrl processing
            match ds.track_ctrl.proc(&ds.track_ctrl_input) {
                Ok((cmd, rpt)) => {
                    ds.track_ctrl_output = Some(cmd);
                    ds.track_ctrl_status_rpt = rpt;
                }
                Err(e) => {
                    // TrackCtrl errors mean no command can be produced for
                    // this path, so just issue the warning and continue.
                    warn!("Error during TrackCtrl processing: {}", e);
                    continue;
                }
            };

            // Publish the command
            if let Some(ref cmd) = ds.track_ctrl_output {
                match cmd_server.send(cmd) {
                    Ok(_) => ds.num_cmds_tx += 1,
                    Err(e) => warn!("CmdServer error: {}", e),
                }
            }

            // ---- WRITE ARCHIVES ----

            if let Err(e) = ds.track_ctrl.write() {
                warn!("Could not archive TrackCtrl report: {}", e);
            }
        }

        // ---- MONITORING ----

        if ds.is_1_hz_cycle {
            debug!(
                "{} paths recieved, {} commands published",
                ds.num_paths_rx, ds.num_cmds_tx
            );
        }

        // ---- CYCLE MANAGEMENT ----

        let cycle_dur = Instant::now() - cycle_start_instant;

        // Get sleep duration
        match Duration::from_secs_f64(CYCLE_PERIOD_S).checked_sub(cycle_dur) {
            Some(d) => {
                ds.num_consec_cycle_overruns = 0;
                thread::sleep(d);
            }
            None => {
                warn!(
                    "Cycle overran by {:.06} s",
                    cycle_dur.as_secs_f64()
                        - Duration::from_secs_f64(CYCLE_PERIOD_S).as_secs_f64()
                );
                ds.num_consec_cycle_overruns += 1;
            }
        }

        // Increment cycle counter
        ds.num_cycles += 1;
    }
}
