//! # Trajectory tracking module
//!
//! Trajectory tracking is responsible for keeping the vehicle on the
//! reference path published by the planner. It combines two laws:
//!
//! - A PID controller regulating the vehicle's forward speed towards the
//!   target speed.
//! - A pure pursuit steering law which picks a target waypoint at least one
//!   lookahead distance away along the path and turns the vehicle towards
//!   it, commanding a yaw rate proportional to the heading error.
//!
//! Each received path triggers exactly one processing cycle which emits
//! exactly one velocity command. Runtime tuning updates are applied through
//! the [`TuningGate`] at the start of a cycle, never part way through one.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod gate;
mod params;
mod pid;
mod pursuit;
mod state;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Internal
pub use gate::TuningGate;
pub use params::Params;
pub use pid::PidController;
pub use pursuit::find_target_point;
pub use state::*;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Gain applied to the heading error to produce the yaw rate demand.
///
/// Units: 1/seconds
///
/// This is a property of the steering law itself and is deliberately not
/// part of the runtime-tunable parameter set.
pub const STEERING_GAIN: f64 = 1.9;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Possible errors that can occur during TrackCtrl operation.
#[derive(Debug, thiserror::Error)]
pub enum TrackCtrlError {
    #[error("Could not load parameters: {0}")]
    ParamLoadError(util::params::LoadError),

    /// Processing was triggered without a path in the input data.
    #[error("Expected there to be a path but couldn't find one")]
    NoPath,

    /// The received path contains no waypoints, so no steering target can
    /// be selected.
    #[error("Received a path containing no waypoints")]
    EmptyPath,

    /// Attempted to track a path when the pose is not known.
    #[error("No pose has been received yet")]
    NoPose,
}
