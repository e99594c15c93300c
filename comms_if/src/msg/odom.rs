//! # Odometry message
//!
//! Odometry is published by the localisation system in a
//! publisher-subscriber model, as frequently as the source can produce it.
//! Each message fully replaces the previous one, there is no merging of
//! partial state.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

// ------------------------------------------------------------------------------------------------
// DATA STRUCTURES
// ------------------------------------------------------------------------------------------------

/// An odometry update for the vehicle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OdomMsg {
    /// Identifier of the world frame the pose is expressed in.
    ///
    /// The frame is stored but not validated against a transform tree.
    pub world_frame: String,

    /// Identifier of the vehicle body frame.
    pub body_frame: String,

    /// Position of the vehicle body in the world frame.
    ///
    /// Units: meters
    pub position_m: [f64; 3],

    /// Attitude of the vehicle body in the world frame, as a quaternion in
    /// (w, i, j, k) order.
    pub attitude_q: [f64; 4],

    /// Linear velocity of the vehicle.
    ///
    /// Units: meters/second
    pub linear_vel_ms: [f64; 3],
}
