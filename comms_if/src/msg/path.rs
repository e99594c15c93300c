//! # Path message
//!
//! The reference path is published by the planner. Each message carries the
//! complete path, the tracker replaces its previous path wholesale on
//! reception.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

// ------------------------------------------------------------------------------------------------
// DATA STRUCTURES
// ------------------------------------------------------------------------------------------------

/// A reference path for the vehicle to follow.
///
/// The planner guarantees at least one pose per path, however the tracker
/// checks this defensively rather than trusting the contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathMsg {
    /// Identifier of the frame the path is expressed in.
    pub frame: String,

    /// The poses making up the path, in driving order.
    pub poses: Vec<PathPoseMsg>,
}

/// A single pose along a path.
///
/// Only the position is used by the tracker, the attitude of intermediate
/// path poses carries no meaning for pure pursuit steering.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PathPoseMsg {
    /// Position of the pose in the path frame.
    ///
    /// Units: meters
    pub position_m: [f64; 3],
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl PathMsg {
    /// Get the number of poses in the path.
    pub fn len(&self) -> usize {
        self.poses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.poses.is_empty()
    }
}
