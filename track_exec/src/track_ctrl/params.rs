//! Trajectory tracking parameters

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for trajectory tracking.
///
/// These set the initial controller configuration. The target speed, PID
/// gains, and lookahead distance can be replaced at runtime through the
/// tuning gate; the PID step and output bounds are fixed for the life of
/// the process.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct Params {
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

    /// Fixed integration step of the speed controller. Shall match the
    /// executive cycle period.
    ///
    /// Units: seconds
    pub pid_step_s: f64,

    /// Lower bound on the speed demand.
    ///
    /// Units: meters/second
    pub pid_out_min_ms: f64,

    /// Upper bound on the speed demand.
    ///
    /// Units: meters/second
    pub pid_out_max_ms: f64,

    /// Pure pursuit lookahead distance.
    ///
    /// Units: meters
    pub lookahead_m: f64,

    /// Floor applied to lookahead distances arriving through the tuning
    /// gate. A lookahead at or below zero would collapse the steering
    /// target onto the nearest waypoint.
    ///
    /// Units: meters
    pub min_lookahead_m: f64,
}
