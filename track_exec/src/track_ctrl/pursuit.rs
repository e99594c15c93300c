//! # Pure pursuit target selection
//!
//! The steering target is the first waypoint along the path that lies at
//! least one lookahead distance from the vehicle. The scan is forward-only
//! and never interpolates between waypoints, the returned point is always an
//! actual waypoint of the path.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use nalgebra::Vector3;

// Internal
use crate::path::Path;

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Find the steering target for the given position, path, and lookahead
/// distance.
///
/// Waypoints are scanned in path order and the first one whose euclidian
/// distance from `current_pos_m` is greater than or equal to `lookahead_m`
/// is returned. A waypoint at exactly the lookahead distance counts, so ties
/// are decided by path order, not by distance.
///
/// If the whole path lies within the lookahead radius (including the
/// single-waypoint case) the final waypoint is returned instead. `None` is
/// only returned for an empty path, which callers must have rejected
/// already.
pub fn find_target_point(
    current_pos_m: &Vector3<f64>,
    path: &Path,
    lookahead_m: f64,
) -> Option<Vector3<f64>> {
    let lookahead_point = path
        .points_m
        .iter()
        .find(|point_m| (*point_m - current_pos_m).norm() >= lookahead_m);

    match lookahead_point {
        Some(point_m) => Some(*point_m),
        // Use the final waypoint if no suitable lookahead point is found
        None => path.points_m.last().copied(),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn path_of(points: &[[f64; 3]]) -> Path {
        Path {
            points_m: points.iter().map(|p| Vector3::from(*p)).collect(),
        }
    }

    #[test]
    fn test_first_point_at_threshold() {
        // Waypoints at distances 0.5, 1.0, 2.0 and 3.0 from the origin, with
        // a lookahead of 2.0 the waypoint at exactly 2.0 must be selected
        let path = path_of(&[
            [0.5, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [2.0, 0.0, 0.0],
            [3.0, 0.0, 0.0],
        ]);

        let target = find_target_point(&Vector3::zeros(), &path, 2.0).unwrap();
        assert_eq!(target, Vector3::new(2.0, 0.0, 0.0));
    }

    #[test]
    fn test_path_order_decides() {
        // The first point meeting the threshold wins even if a later point
        // is closer to the threshold
        let path = path_of(&[[0.0, 3.0, 0.0], [2.0, 0.0, 0.0]]);

        let target = find_target_point(&Vector3::zeros(), &path, 2.0).unwrap();
        assert_eq!(target, Vector3::new(0.0, 3.0, 0.0));
    }

    #[test]
    fn test_fallback_to_final_point() {
        // Every waypoint is within the lookahead radius, the final one is
        // used
        let path = path_of(&[[0.1, 0.0, 0.0], [0.2, 0.0, 0.0], [0.3, 0.0, 0.0]]);

        let target = find_target_point(&Vector3::zeros(), &path, 5.0).unwrap();
        assert_eq!(target, Vector3::new(0.3, 0.0, 0.0));
    }

    #[test]
    fn test_single_waypoint_path() {
        let path = path_of(&[[1.0, 0.0, 0.0]]);

        // A single-waypoint path returns that waypoint whatever the
        // lookahead
        let target = find_target_point(&Vector3::zeros(), &path, 1.5).unwrap();
        assert_eq!(target, Vector3::new(1.0, 0.0, 0.0));

        let target = find_target_point(&Vector3::zeros(), &path, 0.1).unwrap();
        assert_eq!(target, Vector3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_distance_is_three_dimensional() {
        // A waypoint 2.0 away purely in z must satisfy a 2.0 lookahead
        let path = path_of(&[[0.0, 0.0, 2.0], [5.0, 0.0, 0.0]]);

        let target = find_target_point(&Vector3::zeros(), &path, 2.0).unwrap();
        assert_eq!(target, Vector3::new(0.0, 0.0, 2.0));
    }

    #[test]
    fn test_empty_path() {
        let path = path_of(&[]);
        assert!(find_target_point(&Vector3::zeros(), &path, 1.0).is_none());
    }
}
