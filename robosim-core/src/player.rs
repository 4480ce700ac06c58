use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
    time::Duration,
};

use tokio::{sync::Notify, task::JoinHandle, time::Instant};
use tracing::{debug, error};

use crate::{
    error::Error,
    model::JointStateModel,
    msg::{Trajectory, TrajectoryPoint},
};

/// Handle for delivering trajectories to the playback task.
///
/// Delivery is fire-and-forget and newest-wins: a trajectory handed over
/// while another is playing replaces it and interrupts any in-flight wait.
/// There is no queue of pending trajectories.
#[derive(Clone, Debug)]
pub struct PlayerHandle {
    pending: Arc<Mutex<Option<Trajectory>>>,
    supersede: Arc<Notify>,
}

impl PlayerHandle {
    pub fn send_trajectory(&self, trajectory: Trajectory) {
        self.pending.lock().unwrap().replace(trajectory);
        self.supersede.notify_one();
    }

    fn take_pending(&self) -> Option<Trajectory> {
        self.pending.lock().unwrap().take()
    }

    fn has_pending(&self) -> bool {
        self.pending.lock().unwrap().is_some()
    }
}

/// Plays trajectories against a [`JointStateModel`] in simulated real time.
///
/// At most one trajectory plays at a time. Waypoints are applied in order,
/// each after waiting out the `time_from_start` delta to its predecessor. A
/// waypoint that cannot be mapped onto the configured joints aborts the rest
/// of its trajectory; the process keeps running.
#[derive(Debug)]
pub struct TrajectoryPlayer {
    model: Arc<JointStateModel>,
    handle: PlayerHandle,
    playback_task: Option<JoinHandle<()>>,
}

impl TrajectoryPlayer {
    pub fn new(model: Arc<JointStateModel>) -> Self {
        Self {
            model,
            handle: PlayerHandle {
                pending: Arc::new(Mutex::new(None)),
                supersede: Arc::new(Notify::new()),
            },
            playback_task: None,
        }
    }

    pub fn handle(&self) -> PlayerHandle {
        self.handle.clone()
    }

    /// Spawns the long-lived playback task. Must be called exactly once,
    /// inside a tokio runtime.
    pub fn run_playback_task(&mut self) {
        if self.playback_task.is_some() {
            panic!("playback task is already running.");
        }
        let model = self.model.clone();
        let handle = self.handle.clone();
        self.playback_task = Some(tokio::spawn(async move {
            loop {
                let trajectory = loop {
                    match handle.take_pending() {
                        Some(trajectory) => break trajectory,
                        None => handle.supersede.notified().await,
                    }
                };
                play(&model, &handle, trajectory).await;
            }
        }));
    }
}

impl Drop for TrajectoryPlayer {
    fn drop(&mut self) {
        if let Some(task) = self.playback_task.take() {
            task.abort();
        }
    }
}

async fn play(model: &JointStateModel, handle: &PlayerHandle, trajectory: Trajectory) {
    if trajectory.points.is_empty() {
        debug!("received empty trajectory");
        return;
    }
    debug!(points = trajectory.points.len(), "starting playback");
    let mut last_time = Duration::ZERO;
    for (index, point) in trajectory.points.iter().enumerate() {
        // Timing is relative to the previous waypoint, not to wall-clock
        // receipt time. Non-increasing time_from_start saturates to zero.
        let delta = point.time_from_start.saturating_sub(last_time);
        last_time = point.time_from_start;
        if !delta.is_zero() {
            let deadline = Instant::now() + delta;
            loop {
                tokio::select! {
                    _ = handle.supersede.notified() => {
                        if handle.has_pending() {
                            debug!("superseded, discarding remaining waypoints");
                            return;
                        }
                    }
                    _ = tokio::time::sleep_until(deadline) => break,
                }
            }
        }
        // The mailbox lock is held across the apply, so handoff and write
        // are mutually exclusive: once send_trajectory has stored a
        // successor, no further waypoint of this trajectory can land.
        {
            let pending = handle.pending.lock().unwrap();
            if pending.is_some() {
                debug!("superseded, discarding remaining waypoints");
                return;
            }
            if let Err(e) = apply_point(model, &trajectory.joint_names, point) {
                error!("aborting playback at waypoint {index}: {e}");
                return;
            }
        }
    }
    debug!("playback completed");
}

fn apply_point(
    model: &JointStateModel,
    joint_names: &[String],
    point: &TrajectoryPoint,
) -> Result<(), Error> {
    if joint_names.len() != point.positions.len() {
        return Err(Error::LengthMismatch {
            names: joint_names.len(),
            positions: point.positions.len(),
        });
    }
    let targets: HashMap<String, f64> = joint_names
        .iter()
        .cloned()
        .zip(point.positions.iter().copied())
        .collect();
    model.apply_targets(&targets)
}
