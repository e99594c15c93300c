//! # Path
//!
//! This module defines the reference path followed by the tracker. A path is
//! an ordered sequence of waypoints, it is built wholesale from each path
//! message and is immutable for the duration of one control computation.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

// Internal
use comms_if::msg::PathMsg;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A path defining the desired trajectory of the vehicle.
#[derive(Clone, Serialize, Deserialize, Debug, Default)]
pub struct Path {
    pub points_m: Vec<Vector3<f64>>,
}

// -----------------------------------------------------------------------------------------------
// ENUMS
// -----------------------------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum PathError {
    /// The planner contract requires at least one waypoint per path, an
    /// empty path cannot provide a steering target.
    #[error("Attempted to create a path with no waypoints")]
    NoWaypoints,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Path {
    /// Build a path from a path message.
    ///
    /// Messages with no poses are rejected rather than trusted to the
    /// planner contract.
    pub fn from_msg(msg: &PathMsg) -> Result<Self, PathError> {
        if msg.is_empty() {
            return Err(PathError::NoWaypoints);
        }

        Ok(Self {
            points_m: msg
                .poses
                .iter()
                .map(|pose| Vector3::from(pose.position_m))
                .collect(),
        })
    }

    /// Get the number of waypoints in the path
    pub fn get_num_points(&self) -> usize {
        self.points_m.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points_m.is_empty()
    }

    /// True if every waypoint of the path is finite.
    pub fn is_finite(&self) -> bool {
        self.points_m
            .iter()
            .all(|point| point.iter().all(|v| v.is_finite()))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use comms_if::msg::PathPoseMsg;

    fn path_msg(points: &[[f64; 3]]) -> PathMsg {
        PathMsg {
            frame: "world".into(),
            poses: points
                .iter()
                .map(|p| PathPoseMsg { position_m: *p })
                .collect(),
        }
    }

    #[test]
    fn test_from_msg() {
        let path = Path::from_msg(&path_msg(&[[0.0, 0.0, 0.0], [1.0, 2.0, 3.0]])).unwrap();
        assert_eq!(path.get_num_points(), 2);
        assert_eq!(path.points_m[1], Vector3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_empty_msg_rejected() {
        assert!(matches!(
            Path::from_msg(&path_msg(&[])),
            Err(PathError::NoWaypoints)
        ));
    }

    #[test]
    fn test_finite_check() {
        let path = Path::from_msg(&path_msg(&[[0.0, 0.0, 0.0], [f64::NAN, 0.0, 0.0]])).unwrap();
        assert!(!path.is_finite());

        let path = Path::from_msg(&path_msg(&[[0.0, 0.0, 0.0]])).unwrap();
        assert!(path.is_finite());
    }
}
