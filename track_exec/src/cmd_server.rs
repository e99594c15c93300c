//! # Command Server
//!
//! The CmdServer publishes the tracker's velocity commands for the vehicle
//! base controller to consume. A command is published synchronously once per
//! received path, there is no command queueing or retry.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use comms_if::{
    msg::VelocityCmd,
    net::{zmq, MonitoredSocket, MonitoredSocketError, NetParams, SocketOptions},
};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Velocity command server
pub struct CmdServer {
    socket: MonitoredSocket,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum CmdServerError {
    #[error("Socket error: {0}")]
    SocketError(MonitoredSocketError),

    #[error("Could not send the command: {0}")]
    SendError(zmq::Error),

    #[error("Could not serialize the command: {0}")]
    SerializationError(serde_json::Error),
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl CmdServer {
    /// Create a new instance of the Command Server.
    ///
    /// This function will not block until a subscriber connects.
    pub fn new(ctx: &zmq::Context, params: &NetParams) -> Result<Self, CmdServerError> {
        // Create the socket options
        let socket_options = SocketOptions {
            block_on_first_connect: false,
            bind: true,
            connect_timeout: 1000,
            heartbeat_ivl: 500,
            heartbeat_ttl: 1000,
            heartbeat_timeout: 1000,
            linger: 1,
            recv_timeout: 10,
            send_timeout: 10,
            ..Default::default()
        };

        // Bind the socket
        let socket = MonitoredSocket::new(ctx, zmq::PUB, socket_options, &params.cmd_endpoint)
            .map_err(CmdServerError::SocketError)?;

        Ok(Self { socket })
    }

    /// Publish a velocity command.
    pub fn send(&mut self, cmd: &VelocityCmd) -> Result<(), CmdServerError> {
        // Serialize the command
        let cmd_string = serde_json::to_string(cmd).map_err(CmdServerError::SerializationError)?;

        // Send the command
        self.socket
            .send(&cmd_string, 0)
            .map_err(CmdServerError::SendError)
    }
}
