//! # Localisation types
//!
//! This module provides the tracker's view of where the vehicle is and how
//! fast it is moving. Both are produced wholesale from each odometry update,
//! there is no filtering or merging of successive updates.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use nalgebra::{Quaternion, UnitQuaternion, Vector3};

// Internal
use comms_if::msg::OdomMsg;
use util::maths;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// The current pose (position and attitude in the world frame) of the
/// vehicle.
#[derive(Debug, Copy, Clone)]
pub struct Pose {
    /// The position in the world frame
    pub position_m: Vector3<f64>,

    /// The attitude of the vehicle in the world frame. This is a quaternion
    /// that will rotate an object from the world frame into the body frame.
    pub attitude_q: UnitQuaternion<f64>,
}

/// The current velocity of the vehicle.
///
/// Only the magnitude of the linear velocity feeds the speed controller, the
/// full vector and its frame are kept for telemetry.
#[derive(Debug, Clone)]
pub struct Velocity {
    /// Linear velocity vector
    ///
    /// Units: meters/second
    pub linear_ms: Vector3<f64>,

    /// Identifier of the frame the velocity is expressed in
    pub frame: String,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Pose {
    /// Build a pose from an odometry update.
    pub fn from_odom(odom: &OdomMsg) -> Self {
        let q = Quaternion::new(
            odom.attitude_q[0],
            odom.attitude_q[1],
            odom.attitude_q[2],
            odom.attitude_q[3],
        );

        Self {
            position_m: Vector3::from(odom.position_m),
            attitude_q: UnitQuaternion::from_quaternion(q),
        }
    }

    /// Return the heading (yaw about the world Z axis) of the vehicle in
    /// radians.
    pub fn get_heading(&self) -> f64 {
        self.attitude_q.euler_angles().2
    }

    /// True if every component of the pose is finite.
    pub fn is_finite(&self) -> bool {
        self.position_m.iter().all(|v| v.is_finite())
            && self.attitude_q.coords.iter().all(|v| v.is_finite())
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self {
            position_m: Vector3::zeros(),
            attitude_q: UnitQuaternion::identity(),
        }
    }
}

impl Velocity {
    /// Build a velocity from an odometry update.
    ///
    /// The velocity is expressed in the update's body frame.
    pub fn from_odom(odom: &OdomMsg) -> Self {
        Self {
            linear_ms: Vector3::from(odom.linear_vel_ms),
            frame: odom.body_frame.clone(),
        }
    }

    /// Magnitude of the linear velocity.
    pub fn speed_ms(&self) -> f64 {
        maths::norm(self.linear_ms.as_slice(), &[0.0; 3]).unwrap_or(0.0)
    }

    /// True if every component of the velocity is finite.
    pub fn is_finite(&self) -> bool {
        self.linear_ms.iter().all(|v| v.is_finite())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn odom(position_m: [f64; 3], attitude_q: [f64; 4], linear_vel_ms: [f64; 3]) -> OdomMsg {
        OdomMsg {
            world_frame: "world".into(),
            body_frame: "base_link".into(),
            position_m,
            attitude_q,
            linear_vel_ms,
        }
    }

    #[test]
    fn test_heading_from_quaternion() {
        // Identity attitude gives zero heading
        let pose = Pose::from_odom(&odom([0.0; 3], [1.0, 0.0, 0.0, 0.0], [0.0; 3]));
        assert!(pose.get_heading().abs() < 1e-12);

        // A pure yaw rotation of pi/2: q = (cos(pi/4), 0, 0, sin(pi/4))
        let half = std::f64::consts::FRAC_PI_4;
        let pose = Pose::from_odom(&odom(
            [0.0; 3],
            [half.cos(), 0.0, 0.0, half.sin()],
            [0.0; 3],
        ));
        assert!((pose.get_heading() - std::f64::consts::FRAC_PI_2).abs() < 1e-9);
    }

    #[test]
    fn test_speed_magnitude() {
        let vel = Velocity::from_odom(&odom([0.0; 3], [1.0, 0.0, 0.0, 0.0], [3.0, 4.0, 0.0]));
        assert!((vel.speed_ms() - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_finite_checks() {
        let pose = Pose::from_odom(&odom(
            [f64::NAN, 0.0, 0.0],
            [1.0, 0.0, 0.0, 0.0],
            [0.0; 3],
        ));
        assert!(!pose.is_finite());

        let vel = Velocity::from_odom(&odom(
            [0.0; 3],
            [1.0, 0.0, 0.0, 0.0],
            [0.0, f64::INFINITY, 0.0],
        ));
        assert!(!vel.is_finite());
    }
}
