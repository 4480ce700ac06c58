use std::time::{Duration, SystemTime};

use serde::{Deserialize, Serialize};

/// One waypoint of a trajectory: target positions plus the offset from
/// trajectory start at which they should be reached.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TrajectoryPoint {
    pub positions: Vec<f64>,
    pub time_from_start: Duration,
}

impl TrajectoryPoint {
    pub fn new(positions: Vec<f64>, time_from_start: Duration) -> Self {
        Self {
            positions,
            time_from_start,
        }
    }
}

/// An ordered plan of joint position waypoints.
///
/// `joint_names` defines the meaning of each index of the point positions.
/// It is not required to match the simulator's own joint order, or to cover
/// the configured joints at all; mismatches surface during playback.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Trajectory {
    pub joint_names: Vec<String>,
    pub points: Vec<TrajectoryPoint>,
}

impl Trajectory {
    pub fn new(joint_names: Vec<String>, points: Vec<TrajectoryPoint>) -> Self {
        Self {
            joint_names,
            points,
        }
    }
}

/// Generic joint state report, published every reporting tick.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct JointStateReport {
    pub sequence: u64,
    pub stamp: SystemTime,
    pub names: Vec<String>,
    pub positions: Vec<f64>,
}

/// Trajectory execution feedback report, published together with
/// [`JointStateReport`] and carrying the same sequence and stamp.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FeedbackReport {
    pub sequence: u64,
    pub stamp: SystemTime,
    pub joint_names: Vec<String>,
    pub actual: Vec<f64>,
}
