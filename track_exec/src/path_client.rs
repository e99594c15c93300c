//! # Path Client
//!
//! The PathClient subscribes to the planner's path topic. Unlike odometry
//! and tuning, paths are not cached by a background thread: the executive
//! drains the socket itself so that each received path triggers exactly one
//! control computation and exactly one command emission.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use comms_if::{
    msg::PathMsg,
    net::{zmq, MonitoredSocket, MonitoredSocketError, NetParams, SocketOptions},
};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Path client
pub struct PathClient {
    socket: MonitoredSocket,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum PathClientError {
    #[error("Socket error: {0}")]
    SocketError(MonitoredSocketError),

    #[error("Could not recieve a message from the planner: {0}")]
    RecvError(zmq::Error),

    #[error("Could not parse the recieved path: {0}")]
    PathParseError(serde_json::Error),

    #[error("The planner sent a message which was not valid UTF-8")]
    NonUtf8Message,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl PathClient {
    /// Create a new instance of the Path Client.
    ///
    /// This function will not block until the planner connects.
    pub fn new(ctx: &zmq::Context, params: &NetParams) -> Result<Self, PathClientError> {
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
        let socket = MonitoredSocket::new(ctx, zmq::SUB, socket_options, &params.path_endpoint)
            .map_err(PathClientError::SocketError)?;

        Ok(Self { socket })
    }

    /// Recieve a single path from the planner.
    ///
    /// The protocol here is to call receive_path in a loop until `Ok(None)`
    /// is returned, indicating that there are no more pending paths to be
    /// recieved. This does not mean the planner will not publish another
    /// path in the future, just that there are none to handle right now.
    pub fn receive_path(&self) -> Result<Option<PathMsg>, PathClientError> {
        // Attempt to read a string from the socket
        let path_str = match self.socket.recv_string(0) {
            // Valid message
            Ok(Ok(s)) => s,
            // Non UTF-8 message
            Ok(Err(_)) => return Err(PathClientError::NonUtf8Message),
            // No message in timeout
            Err(zmq::Error::EAGAIN) => return Ok(None),
            // Recieve error
            Err(e) => return Err(PathClientError::RecvError(e)),
        };

        // Parse the path
        serde_json::from_str(&path_str)
            .map(Some)
            .map_err(PathClientError::PathParseError)
    }
}
