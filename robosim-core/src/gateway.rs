use tokio::task::JoinHandle;
use tracing::debug;

use crate::{msg::Trajectory, player::PlayerHandle};

/// Receives trajectories from the inbound transport and hands each to the
/// playback task, unconditionally replacing whatever is currently playing.
///
/// No validation happens here; joint name mismatches surface as playback
/// failures. Delivery never blocks on playback progress.
#[derive(Debug)]
pub struct IngestGateway {
    receiver: flume::Receiver<Trajectory>,
    player: PlayerHandle,
}

impl IngestGateway {
    pub fn new(receiver: flume::Receiver<Trajectory>, player: PlayerHandle) -> Self {
        Self { receiver, player }
    }

    /// Spawns the forwarding task. It ends when the inbound channel
    /// disconnects.
    pub fn run(self) -> JoinHandle<()> {
        tokio::spawn(async move {
            while let Ok(trajectory) = self.receiver.recv_async().await {
                debug!(
                    joints = trajectory.joint_names.len(),
                    points = trajectory.points.len(),
                    "received trajectory"
                );
                self.player.send_trajectory(trajectory);
            }
            debug!("trajectory channel disconnected");
        })
    }
}
