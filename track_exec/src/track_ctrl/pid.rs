//! # Speed controller
//!
//! This module provides the PID controller used to regulate the vehicle's
//! forward speed.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::Serialize;

// Internal
use util::maths;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A PID controller with a fixed integration step.
///
/// The controller does not measure the elapsed time between calls, it
/// integrates with the step given at construction. Callers must therefore
/// call [`PidController::calculate`] at that cadence, in this software once
/// per executive cycle. This keeps the controller deterministic for a given
/// input sequence at the cost of integration drift if the cadence slips.
#[derive(Debug, Serialize, Clone, Default)]
pub struct PidController {
    /// Fixed integration step
    ///
    /// Units: seconds
    step_s: f64,

    /// Lower bound on the controller output
    out_min: f64,

    /// Upper bound on the controller output
    out_max: f64,

    /// Proportional gain
    k_p: f64,

    /// Integral gain
    k_i: f64,

    /// Dervative gain
    k_d: f64,

    /// Previous error
    prev_error: f64,

    /// The integral accumulation
    integral: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl PidController {
    /// Create a new controller with the given step, output bounds, and
    /// gains.
    pub fn new(step_s: f64, out_min: f64, out_max: f64, k_p: f64, k_i: f64, k_d: f64) -> Self {
        Self {
            step_s,
            out_min,
            out_max,
            k_p,
            k_i,
            k_d,
            prev_error: 0.0,
            integral: 0.0,
        }
    }

    /// Get the bounded correction for the given target and measured values.
    ///
    /// The accumulated integral and the previous error persist across calls.
    pub fn calculate(&mut self, target: f64, measured: f64) -> f64 {
        let error = target - measured;

        // Accumulate the integral term over the fixed step
        self.integral += error * self.step_s;

        // Derivative over the fixed step
        let deriv = (error - self.prev_error) / self.step_s;

        let raw = self.k_p * error + self.k_i * self.integral + self.k_d * deriv;

        // Remember the previous error
        self.prev_error = error;

        // Saturate the output into its bounds
        maths::clamp(&raw, &self.out_min, &self.out_max)
    }

    /// Replace the controller gains in place.
    ///
    /// The accumulated integral and previous error are NOT reset, so a gain
    /// change does not kick the output (bumpless transfer).
    pub fn update_settings(&mut self, k_p: f64, k_i: f64, k_d: f64) {
        self.k_p = k_p;
        self.k_i = k_i;
        self.k_d = k_d;
    }

    /// The current gains, as a (k_p, k_i, k_d) tuple.
    pub fn gains(&self) -> (f64, f64, f64) {
        (self.k_p, self.k_i, self.k_d)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_output_bounded() {
        let mut pid = PidController::new(0.1, -1.0, 1.0, 10.0, 5.0, 2.0);

        // A spread of target/measured pairs, including large and negative
        // errors, all outputs must stay inside the bounds
        let pairs = [
            (0.0, 0.0),
            (100.0, 0.0),
            (-100.0, 0.0),
            (0.0, 1e6),
            (1e6, -1e6),
            (0.5, 0.3),
        ];

        for (target, measured) in pairs.iter() {
            let out = pid.calculate(*target, *measured);
            assert!(out >= -1.0 && out <= 1.0, "pid output {} out of bounds", out);
            assert!(out.is_finite());
        }
    }

    #[test]
    fn test_zero_error_steady_state() {
        let mut pid = PidController::new(0.1, -1.0, 1.0, 1.0, 0.5, 0.2);

        // With no error the proportional and integral terms are zero, and
        // the derivative is zero after the first call
        for _ in 0..10 {
            let out = pid.calculate(2.0, 2.0);
            assert!(out.abs() < 1e-12);
        }
    }

    #[test]
    fn test_proportional_only() {
        let mut pid = PidController::new(0.1, -10.0, 10.0, 1.0, 0.0, 0.0);

        // Kp = 1 gives the raw error back
        assert!((pid.calculate(1.0, 0.0) - 1.0).abs() < 1e-12);
        assert!((pid.calculate(0.5, 0.0) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_integral_accumulates() {
        let mut pid = PidController::new(0.1, -10.0, 10.0, 0.0, 1.0, 0.0);

        // Constant error of 1.0, integral grows by error * step each call
        assert!((pid.calculate(1.0, 0.0) - 0.1).abs() < 1e-12);
        assert!((pid.calculate(1.0, 0.0) - 0.2).abs() < 1e-12);
        assert!((pid.calculate(1.0, 0.0) - 0.3).abs() < 1e-12);
    }

    #[test]
    fn test_update_settings_keeps_state() {
        let mut pid = PidController::new(0.1, -10.0, 10.0, 0.0, 1.0, 0.0);

        // Build up some integral
        pid.calculate(1.0, 0.0);
        pid.calculate(1.0, 0.0);

        // Change the gains, the accumulated integral must carry over
        pid.update_settings(0.0, 2.0, 0.0);
        assert_eq!(pid.gains(), (0.0, 2.0, 0.0));

        // integral = 0.3 after this call, scaled by the new Ki of 2
        assert!((pid.calculate(1.0, 0.0) - 0.6).abs() < 1e-12);
    }
}
