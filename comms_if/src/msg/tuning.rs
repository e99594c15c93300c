//! # Tuning message
//!
//! Tuning updates carry the runtime-tunable controller parameters. They are
//! delivered on a best-effort "apply latest" channel, intermediate updates
//! between two control computations are coalesced by the tracker
//! (last-write-wins).

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

// ------------------------------------------------------------------------------------------------
// DATA STRUCTURES
// ------------------------------------------------------------------------------------------------

/// A bundle of runtime-tunable tracker parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TuningMsg {
    /// The speed the longitudinal controller regulates towards.
    ///
    /// Units: meters/second
    pub target_speed_ms: f64,

    /// Speed controller proportional gain
    pub k_p: f64,

    /// Speed controller integral gain
    pub k_i: f64,

    /// Speed controller derivative gain
    pub k_d: f64,

    /// Pure pursuit lookahead distance.
    ///
    /// Units: meters
    pub lookahead_m: f64,
}
