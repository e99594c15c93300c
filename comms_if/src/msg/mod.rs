//! # Message module
//!
//! This module defines the wire format of every message the tracker
//! exchanges with its peers. All messages are serialised as JSON strings
//! over the network module's sockets.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

pub mod cmd;
pub mod odom;
pub mod path;
pub mod tuning;

// ---------------------------------------------------------------------------
// REEXPORTS
// ---------------------------------------------------------------------------

pub use cmd::VelocityCmd;
pub use odom::OdomMsg;
pub use path::{PathMsg, PathPoseMsg};
pub use tuning::TuningMsg;
