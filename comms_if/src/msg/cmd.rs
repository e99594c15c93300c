//! # Velocity command message
//!
//! The velocity command is the tracker's only output. It is published once
//! per received path, and is consumed by the vehicle's base controller.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

// ------------------------------------------------------------------------------------------------
// DATA STRUCTURES
// ------------------------------------------------------------------------------------------------

/// A twist-style velocity demand for the vehicle base.
///
/// Only the longitudinal linear component and the yaw angular component are
/// ever commanded, the remaining components are always zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VelocityCmd {
    /// Linear velocity demand in the body frame.
    ///
    /// Units: meters/second
    pub linear_ms: [f64; 3],

    /// Angular velocity demand in the body frame.
    ///
    /// Units: radians/second
    pub angular_rads: [f64; 3],
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl VelocityCmd {
    /// Build a command from a forward speed and a yaw rate.
    pub fn from_planar(speed_ms: f64, yaw_rate_rads: f64) -> Self {
        Self {
            linear_ms: [speed_ms, 0.0, 0.0],
            angular_rads: [0.0, 0.0, yaw_rate_rads],
        }
    }

    /// The all-zero command, used to hold the vehicle in place.
    pub fn zero() -> Self {
        Self::from_planar(0.0, 0.0)
    }

    /// The commanded forward speed.
    pub fn speed_ms(&self) -> f64 {
        self.linear_ms[0]
    }

    /// The commanded yaw rate.
    pub fn yaw_rate_rads(&self) -> f64 {
        self.angular_rads[2]
    }
}

impl Default for VelocityCmd {
    fn default() -> Self {
        Self::zero()
    }
}
