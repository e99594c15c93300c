//! # Odometry Client
//!
//! The OdomClient subscribes to the localisation source's odometry topic.
//! Updates arrive in a publisher-subscriber model as frequently as the
//! source can produce them, and only ever refresh the cached state: an
//! odometry update never triggers a control computation.
//!
//! A background thread receives the updates and commits each one wholesale
//! into a mutex-guarded cell, so the executive always reads a complete
//! snapshot and never a torn one.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use log::{error, warn};
use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Mutex,
    },
    thread::{self, JoinHandle},
};

use comms_if::{
    msg::OdomMsg,
    net::{zmq, MonitoredSocket, MonitoredSocketError, NetParams, SocketOptions},
};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

pub struct OdomClient {
    _bg_jh: Option<JoinHandle<()>>,
    bg_run: Arc<AtomicBool>,
    latest: Arc<Mutex<Option<OdomMsg>>>,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum OdomClientError {
    #[error("Socket error: {0}")]
    SocketError(MonitoredSocketError),
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl OdomClient {
    /// Create a new instance of the OdomClient.
    ///
    /// This function will not block until the odometry source connects.
    pub fn new(ctx: &zmq::Context, params: &NetParams) -> Result<Self, OdomClientError> {
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
        let socket = MonitoredSocket::new(ctx, zmq::SUB, socket_options, &params.odom_endpoint)
            .map_err(OdomClientError::SocketError)?;

        // Create the shared cell and run flag
        let bg_run = Arc::new(AtomicBool::new(true));
        let latest = Arc::new(Mutex::new(None));

        // Create clones of these to pass to the bg thread
        let bg_run_clone = bg_run.clone();
        let latest_clone = latest.clone();

        // Start BG thread
        let bg_jh = Some(thread::spawn(move || {
            bg_thread(socket, bg_run_clone, latest_clone)
        }));

        Ok(Self {
            _bg_jh: bg_jh,
            bg_run,
            latest,
        })
    }

    /// Get the latest cached odometry update.
    ///
    /// Returns `None` if no update has been received since startup.
    pub fn latest_odom(&self) -> Option<OdomMsg> {
        let latest = self
            .latest
            .lock()
            .expect("OdomClient: latest mutex poisoned");

        (*latest).clone()
    }
}

impl Drop for OdomClient {
    fn drop(&mut self) {
        self.bg_run.store(false, Ordering::Relaxed);
    }
}

// ------------------------------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Background thread, commits each published odometry update into the cell.
fn bg_thread(socket: MonitoredSocket, run: Arc<AtomicBool>, latest: Arc<Mutex<Option<OdomMsg>>>) {
    // While instructed to run
    while run.load(Ordering::Relaxed) {
        // Read string from the socket
        let msg = match socket.recv_string(0) {
            Ok(Ok(s)) => s,
            Ok(Err(_)) => {
                warn!("Non UTF-8 message from the odometry source");
                continue;
            }
            Err(zmq::Error::EAGAIN) => continue,
            Err(e) => {
                error!("Error receiving message from the odometry source: {:?}", e);
                break;
            }
        };

        // Deserialize the message
        let odom: OdomMsg = match serde_json::from_str(&msg) {
            Ok(o) => o,
            Err(e) => {
                warn!("Error deserialising odometry message: {:?}", e);
                continue;
            }
        };

        // Commit the update wholesale
        {
            let mut l = latest.lock().expect("OdomClient: latest mutex poisoned");

            *l = Some(odom);
        }
    }
}
