//! Implementations for the TrackCtrl state structure

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{debug, warn};
use serde::Serialize;

// Internal
use super::{find_target_point, Params, PidController, TrackCtrlError, TuningGate, STEERING_GAIN};
use crate::loc::Pose;
use crate::path::Path;
use comms_if::msg::{TuningMsg, VelocityCmd};
use util::{
    archive::{Archived, Archiver},
    maths,
    module::State,
    params,
    session::Session,
};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Trajectory tracking module state
#[derive(Default)]
pub struct TrackCtrl {
    pub(crate) params: Params,

    /// Longitudinal speed controller
    pid: PidController,

    /// Gate through which runtime tuning updates are applied
    gate: TuningGate,

    /// The target speed currently in use
    target_speed_ms: f64,

    /// The lookahead distance currently in use
    lookahead_m: f64,

    report: StatusReport,
    arch_report: Archiver,
}

/// Input data to trajectory tracking.
#[derive(Default)]
pub struct InputData {
    /// The latest cached pose, or `None` if no odometry has been received
    /// yet.
    pub pose: Option<Pose>,

    /// Magnitude of the latest cached velocity.
    ///
    /// Units: meters/second
    pub speed_ms: f64,

    /// The newly received path which triggered this processing cycle, or
    /// `None` if there is no new path on this cycle.
    pub path: Option<Path>,
}

/// Status report for TrackCtrl processing.
#[derive(Clone, Copy, Default, Serialize, Debug)]
pub struct StatusReport {
    /// Error between the target and measured speed
    pub speed_error_ms: f64,

    /// The speed demand produced by the controller
    pub speed_dem_ms: f64,

    /// Heading error to the steering target
    pub yaw_error_rad: f64,

    /// The yaw rate demand produced by the controller
    pub yaw_rate_dem_rads: f64,

    /// The selected steering target
    pub target_x_m: f64,
    pub target_y_m: f64,
    pub target_z_m: f64,

    /// If true the whole path was within the lookahead radius and the final
    /// waypoint was used as the target
    pub lookahead_fallback: bool,

    /// If true a non-finite input was detected and a hold command emitted
    pub nonfinite_input: bool,

    /// If true a pending tuning bundle was applied on this cycle
    pub tuning_applied: bool,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl State for TrackCtrl {
    type InitData = &'static str;
    type InitError = TrackCtrlError;

    type InputData = InputData;
    type OutputData = VelocityCmd;
    type StatusReport = StatusReport;
    type ProcError = TrackCtrlError;

    /// Initialise the TrackCtrl module.
    ///
    /// Expected init data is the path to the parameter file
    fn init(&mut self, init_data: Self::InitData, session: &Session)
        -> Result<(), Self::InitError>
    {
        // Load the parameters
        self.params = match params::load(init_data) {
            Ok(p) => p,
            Err(e) => return Err(TrackCtrlError::ParamLoadError(e)),
        };

        // Initialise the speed controller
        self.pid = PidController::new(
            self.params.pid_step_s,
            self.params.pid_out_min_ms,
            self.params.pid_out_max_ms,
            self.params.k_p,
            self.params.k_i,
            self.params.k_d,
        );

        // The initial active values come from the parameter file, tuning
        // updates replace them at runtime. The lookahead floor applies to
        // the file value as well, it must always be positive.
        self.target_speed_ms = self.params.target_speed_ms;
        self.lookahead_m = self.params.lookahead_m.max(self.params.min_lookahead_m);

        // Create the arch folder for track_ctrl
        let mut arch_path = session.arch_root.clone();
        arch_path.push("track_ctrl");
        std::fs::create_dir_all(arch_path).unwrap();

        // Initialise the archiver
        self.arch_report = Archiver::from_path(
            session, "track_ctrl/status_report.csv"
        ).unwrap();

        // Record the configuration this run started with
        session.save("track_ctrl/params.json", self.params.clone());

        Ok(())
    }

    /// Process trajectory tracking.
    ///
    /// Processing involves:
    ///  1. Applying any pending tuning bundle (the only point where tuning
    ///     takes effect).
    ///  2. Calculating the speed demand from the PID controller.
    ///  3. Selecting the pure pursuit target and calculating the yaw rate
    ///     demand from the heading error.
    fn proc(&mut self, input_data: &Self::InputData)
        -> Result<(Self::OutputData, Self::StatusReport), Self::ProcError>
    {
        // Setup cycle data
        self.report = StatusReport::default();

        // Validate path
        let path = match input_data.path {
            Some(ref p) => p,
            None => return Err(TrackCtrlError::NoPath),
        };
        if path.is_empty() {
            return Err(TrackCtrlError::EmptyPath);
        }

        // Validate pose
        let pose = match input_data.pose {
            Some(p) => p,
            None => return Err(TrackCtrlError::NoPose),
        };

        // Apply any pending tuning before touching the controllers, changes
        // never take effect part way through a cycle
        if let Some(bundle) = self.gate.take() {
            self.apply_tuning(&bundle);
            self.report.tuning_applied = true;
        }

        // Detect non-finite inputs before they reach the controllers. A hold
        // command is emitted in place of NaN actuation, and the accumulated
        // integral is left untouched.
        if !pose.is_finite() || !input_data.speed_ms.is_finite() || !path.is_finite() {
            warn!("Non-finite tracking input, commanding hold");
            self.report.nonfinite_input = true;
            return Ok((VelocityCmd::zero(), self.report));
        }

        // Speed demand from the PID controller
        let speed_dem_ms = self.pid.calculate(self.target_speed_ms, input_data.speed_ms);
        self.report.speed_error_ms = self.target_speed_ms - input_data.speed_ms;
        self.report.speed_dem_ms = speed_dem_ms;

        // Find the steering target.
        //
        // The unwrap here is safe since the path was checked non-empty above.
        let target_m = find_target_point(&pose.position_m, path, self.lookahead_m).unwrap();
        self.report.target_x_m = target_m[0];
        self.report.target_y_m = target_m[1];
        self.report.target_z_m = target_m[2];

        // If the target is inside the lookahead radius it can only be the
        // final waypoint fallback
        self.report.lookahead_fallback =
            (target_m - pose.position_m).norm() < self.lookahead_m;

        // Heading error to the target, normalised into [-pi, pi)
        let yaw_target_rad =
            (target_m[1] - pose.position_m[1]).atan2(target_m[0] - pose.position_m[0]);
        let yaw_error_rad = maths::normalize_angle(yaw_target_rad - pose.get_heading());
        self.report.yaw_error_rad = yaw_error_rad;

        // Yaw rate demand from the steering law
        let yaw_rate_dem_rads = STEERING_GAIN * yaw_error_rad;
        self.report.yaw_rate_dem_rads = yaw_rate_dem_rads;

        Ok((
            VelocityCmd::from_planar(speed_dem_ms, yaw_rate_dem_rads),
            self.report,
        ))
    }
}

impl TrackCtrl {
    /// Get a handle on the module's tuning gate.
    ///
    /// The handle is given to the tuning client so that updates arriving on
    /// its background thread are seen by the next processing cycle.
    pub fn tuning_gate(&self) -> TuningGate {
        self.gate.clone()
    }

    /// Apply a tuning bundle to the active controller settings.
    fn apply_tuning(&mut self, bundle: &TuningMsg) {
        self.target_speed_ms = bundle.target_speed_ms;
        self.pid
            .update_settings(bundle.k_p, bundle.k_i, bundle.k_d);

        // Reject degenerate lookaheads at the boundary, a lookahead at or
        // below zero would collapse the steering target onto the nearest
        // waypoint
        let mut lookahead_m = bundle.lookahead_m;
        if lookahead_m < self.params.min_lookahead_m {
            warn!(
                "Tuned lookahead of {} m is below the minimum, clamping to {} m",
                lookahead_m, self.params.min_lookahead_m
            );
            lookahead_m = self.params.min_lookahead_m;
        }
        self.lookahead_m = lookahead_m;

        debug!(
            "Tuning applied: target speed {} m/s, gains ({}, {}, {}), lookahead {} m",
            self.target_speed_ms, bundle.k_p, bundle.k_i, bundle.k_d, self.lookahead_m
        );
    }
}

impl Archived for TrackCtrl {
    fn write(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        self.arch_report.serialise(self.report)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use nalgebra::Vector3;

    /// Build a module as `init` would, without touching the filesystem.
    fn test_ctrl(params: Params) -> TrackCtrl {
        let pid = PidController::new(
            params.pid_step_s,
            params.pid_out_min_ms,
            params.pid_out_max_ms,
            params.k_p,
            params.k_i,
            params.k_d,
        );
        let target_speed_ms = params.target_speed_ms;
        let lookahead_m = params.lookahead_m;

        TrackCtrl {
            params,
            pid,
            target_speed_ms,
            lookahead_m,
            ..Default::default()
        }
    }

    fn default_params() -> Params {
        Params {
            target_speed_ms: 1.0,
            k_p: 1.0,
            k_i: 0.0,
            k_d: 0.0,
            pid_step_s: 0.1,
            pid_out_min_ms: -1.0,
            pid_out_max_ms: 1.0,
            lookahead_m: 1.5,
            min_lookahead_m: 0.1,
        }
    }

    fn input(pose: Pose, speed_ms: f64, points: &[[f64; 3]]) -> InputData {
        InputData {
            pose: Some(pose),
            speed_ms,
            path: Some(Path {
                points_m: points.iter().map(|p| Vector3::from(*p)).collect(),
            }),
        }
    }

    #[test]
    fn test_single_waypoint_scenario() {
        // Vehicle at the origin with zero heading and speed, a single
        // waypoint dead ahead: full speed demand, no turn
        let mut ctrl = test_ctrl(default_params());

        let (cmd, report) = ctrl
            .proc(&input(Pose::default(), 0.0, &[[1.0, 0.0, 0.0]]))
            .unwrap();

        assert!((cmd.speed_ms() - 1.0).abs() < 1e-12);
        assert!(cmd.yaw_rate_rads().abs() < 1e-12);
        assert!(report.lookahead_fallback);
        assert_eq!(report.target_x_m, 1.0);
    }

    #[test]
    fn test_yaw_rate_proportional_to_heading_error() {
        // Target directly to the left of a vehicle facing +x, heading error
        // is pi/2 and the yaw rate demand is the steering gain times that
        let mut ctrl = test_ctrl(default_params());

        let (cmd, report) = ctrl
            .proc(&input(Pose::default(), 0.0, &[[0.0, 2.0, 0.0]]))
            .unwrap();

        let expected = STEERING_GAIN * std::f64::consts::FRAC_PI_2;
        assert!((report.yaw_error_rad - std::f64::consts::FRAC_PI_2).abs() < 1e-9);
        assert!((cmd.yaw_rate_rads() - expected).abs() < 1e-9);
        assert!(!report.lookahead_fallback);
    }

    #[test]
    fn test_missing_path_and_pose() {
        let mut ctrl = test_ctrl(default_params());

        assert!(matches!(
            ctrl.proc(&InputData::default()),
            Err(TrackCtrlError::NoPath)
        ));

        let mut input = input(Pose::default(), 0.0, &[[1.0, 0.0, 0.0]]);
        input.pose = None;
        assert!(matches!(ctrl.proc(&input), Err(TrackCtrlError::NoPose)));
    }

    #[test]
    fn test_empty_path_rejected() {
        let mut ctrl = test_ctrl(default_params());

        let input = input(Pose::default(), 0.0, &[]);
        assert!(matches!(ctrl.proc(&input), Err(TrackCtrlError::EmptyPath)));
    }

    #[test]
    fn test_nonfinite_input_holds() {
        let mut ctrl = test_ctrl(default_params());

        let (cmd, report) = ctrl
            .proc(&input(Pose::default(), f64::NAN, &[[1.0, 0.0, 0.0]]))
            .unwrap();

        assert_eq!(cmd, VelocityCmd::zero());
        assert!(report.nonfinite_input);

        // A later finite input must produce a finite command again
        let (cmd, _) = ctrl
            .proc(&input(Pose::default(), 0.0, &[[1.0, 0.0, 0.0]]))
            .unwrap();
        assert!(cmd.speed_ms().is_finite());
    }

    #[test]
    fn test_tuning_applied_once_latest_wins() {
        let mut ctrl = test_ctrl(default_params());
        let gate = ctrl.tuning_gate();

        // Two bundles pushed before the cycle runs, only the second is
        // applied
        gate.push(TuningMsg {
            target_speed_ms: 5.0,
            k_p: 10.0,
            k_i: 0.0,
            k_d: 0.0,
            lookahead_m: 1.5,
        });
        gate.push(TuningMsg {
            target_speed_ms: 0.5,
            k_p: 1.0,
            k_i: 0.0,
            k_d: 0.0,
            lookahead_m: 1.5,
        });

        let (cmd, report) = ctrl
            .proc(&input(Pose::default(), 0.0, &[[1.0, 0.0, 0.0]]))
            .unwrap();

        assert!(report.tuning_applied);
        assert_eq!(ctrl.pid.gains(), (1.0, 0.0, 0.0));
        assert!((cmd.speed_ms() - 0.5).abs() < 1e-12);

        // No bundle pending on the next cycle
        let (_, report) = ctrl
            .proc(&input(Pose::default(), 0.0, &[[1.0, 0.0, 0.0]]))
            .unwrap();
        assert!(!report.tuning_applied);
    }

    #[test]
    fn test_degenerate_lookahead_clamped() {
        let mut ctrl = test_ctrl(default_params());
        let gate = ctrl.tuning_gate();

        gate.push(TuningMsg {
            target_speed_ms: 1.0,
            k_p: 1.0,
            k_i: 0.0,
            k_d: 0.0,
            lookahead_m: -2.0,
        });

        ctrl.proc(&input(Pose::default(), 0.0, &[[1.0, 0.0, 0.0]]))
            .unwrap();

        assert_eq!(ctrl.lookahead_m, ctrl.params.min_lookahead_m);
    }

    #[test]
    fn test_speed_demand_clamped_to_bounds() {
        let mut params = default_params();
        params.target_speed_ms = 100.0;
        let mut ctrl = test_ctrl(params);

        let (cmd, _) = ctrl
            .proc(&input(Pose::default(), 0.0, &[[1.0, 0.0, 0.0]]))
            .unwrap();

        assert!((cmd.speed_ms() - 1.0).abs() < 1e-12);
    }
}
