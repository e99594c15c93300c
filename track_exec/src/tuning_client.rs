//! # Tuning Client
//!
//! The TuningClient subscribes to the configuration-change topic on which
//! runtime tuning bundles are published. Each received bundle is pushed
//! through the tracker's [`TuningGate`], replacing any pending bundle
//! (last-write-wins). Receiving a bundle never blocks the executive and
//! never triggers a control computation, the gate is consumed by TrackCtrl
//! at the start of its next processing cycle.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use log::{debug, error, warn};
use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    thread::{self, JoinHandle},
};

use crate::track_ctrl::TuningGate;
use comms_if::{
    msg::TuningMsg,
    net::{zmq, MonitoredSocket, MonitoredSocketError, NetParams, SocketOptions},
};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

pub struct TuningClient {
    _bg_jh: Option<JoinHandle<()>>,
    bg_run: Arc<AtomicBool>,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum TuningClientError {
    #[error("Socket error: {0}")]
    SocketError(MonitoredSocketError),
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl TuningClient {
    /// Create a new instance of the TuningClient.
    ///
    /// The given gate handle is the one consumed by TrackCtrl, updates
    /// pushed through it are seen by the next processing cycle.
    pub fn new(
        ctx: &zmq::Context,
        params: &NetParams,
        gate: TuningGate,
    ) -> Result<Self, TuningClientError> {
        // Create the socket options
        let socket_options = SocketOptions {
            block_on_first_connect: false,
            connect_timeout: 1000,
            heartbeat_ivl: 500,
            heartbeat_ttl: 1000,
            heartbeat_timeout: 1000,
            linger: 1,
            recv_timeout: 10,
            send_timeout: 10,
            ..Default::default()
        };

        // Connect the socket
        let socket = MonitoredSocket::new(ctx, zmq::SUB, socket_options, &params.tuning_endpoint)
            .map_err(TuningClientError::SocketError)?;

        // Create the run flag
        let bg_run = Arc::new(AtomicBool::new(true));
        let bg_run_clone = bg_run.clone();

        // Start BG thread
        let bg_jh = Some(thread::spawn(move || bg_thread(socket, bg_run_clone, gate)));

        Ok(Self {
            _bg_jh: bg_jh,
            bg_run,
        })
    }
}

impl Drop for TuningClient {
    fn drop(&mut self) {
        self.bg_run.store(false, Ordering::Relaxed);
    }
}

// ------------------------------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Background thread, pushes each published tuning bundle through the gate.
fn bg_thread(socket: MonitoredSocket, run: Arc<AtomicBool>, gate: TuningGate) {
    // While instructed to run
    while run.load(Ordering::Relaxed) {
        // Read string from the socket
        let msg = match socket.recv_string(0) {
            Ok(Ok(s)) => s,
            Ok(Err(_)) => {
                warn!("Non UTF-8 message on the tuning topic");
                continue;
            }
            Err(zmq::Error::EAGAIN) => continue,
            Err(e) => {
                error!("Error receiving message on the tuning topic: {:?}", e);
                break;
            }
        };

        // Deserialize the message
        let bundle: TuningMsg = match serde_json::from_str(&msg) {
            Ok(b) => b,
            Err(e) => {
                warn!("Error deserialising tuning message: {:?}", e);
                continue;
            }
        };

        debug!("Tuning bundle received: {:?}", bundle);

        // Latest bundle wins, intermediate ones are coalesced
        gate.push(bundle);
    }
}
