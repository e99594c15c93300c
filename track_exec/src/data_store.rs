//! # Data Store

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use comms_if::msg::{OdomMsg, VelocityCmd};

use crate::{
    loc::{Pose, Velocity},
    track_ctrl,
};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Global data store for the executable.
#[derive(Default)]
pub struct DataStore {
    // Cycle management
    /// Number of cycles already executed
    pub num_cycles: u128,

    /// True if this cycle falls on a 1Hz boundary
    pub is_1_hz_cycle: bool,

    /// Session elapsed time
    pub elapsed_time_s: f64,

    // Localisation
    /// The latest cached pose, overwritten wholesale by each odometry update
    pub pose: Option<Pose>,

    /// The latest cached velocity, from the same updates as the pose
    pub velocity: Option<Velocity>,

    /// World frame id from the latest odometry update. Stored, not validated.
    pub world_frame: String,

    /// Body frame id from the latest odometry update. Stored, not validated.
    pub body_frame: String,

    // TrackCtrl
    pub track_ctrl: track_ctrl::TrackCtrl,
    pub track_ctrl_input: track_ctrl::InputData,
    pub track_ctrl_output: Option<VelocityCmd>,
    pub track_ctrl_status_rpt: track_ctrl::StatusReport,

    // Monitoring Counters
    /// Number of consecutive cycle overruns
    pub num_consec_cycle_overruns: u64,

    /// Number of paths received from the planner
    pub num_paths_rx: u64,

    /// Number of velocity commands published
    pub num_cmds_tx: u64,
}

// ---------------------------------------------------------------------------
// IMPLS
// ---------------------------------------------------------------------------

impl DataStore {
    /// Commit an odometry update into the cached state.
    ///
    /// The previous pose and velocity are replaced wholesale, there is no
    /// merging of partial state.
    pub fn set_odom(&mut self, odom: &OdomMsg) {
        self.world_frame = odom.world_frame.clone();
        self.body_frame = odom.body_frame.clone();
        self.pose = Some(Pose::from_odom(odom));
        self.velocity = Some(Velocity::from_odom(odom));
    }

    /// Perform actions required at the start of a cycle.
    ///
    /// Clears those items that need clearing at the start of a cycle, and
    /// sets the 1Hz cycle flag.
    pub fn cycle_start(&mut self, cycle_frequency_hz: f64) {
        self.is_1_hz_cycle = self.num_cycles % (cycle_frequency_hz as u128) == 0;

        self.track_ctrl_input = track_ctrl::InputData::default();
        self.track_ctrl_output = None;
        self.track_ctrl_status_rpt = track_ctrl::StatusReport::default();

        self.elapsed_time_s = util::session::get_elapsed_seconds();
    }
}
