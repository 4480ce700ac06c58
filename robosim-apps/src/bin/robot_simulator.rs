use std::{path::PathBuf, sync::Arc};

use anyhow::Result;
use clap::Parser;
use robosim_apps::{utils::init_tracing, SimulatorConfig};
use robosim_core::{
    FeedbackReport, IngestGateway, JointStateModel, JointStateReport, StateReporter, Trajectory,
    TrajectoryPlayer,
};
use serde::Serialize;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info, warn};

/// Simulated robot controller: plays back joint trajectories received as
/// JSON lines on stdin and reports joint state as JSON lines on stdout.
#[derive(Parser, Debug)]
#[command(name = env!("CARGO_BIN_NAME"))]
struct Opt {
    /// Path to the setting file.
    #[arg(short, long)]
    config_path: Option<PathBuf>,
}

fn print_report<T: Serialize>(topic: &'static str, msg: T) {
    let mut stdout = std::io::stdout().lock();
    if let Err(e) = robosim_apps::utils::write_report(&mut stdout, topic, msg) {
        warn!("failed to publish report: {e}");
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let opt = Opt::parse();
    debug!("opt: {opt:?}");

    let config_path = robosim_apps::utils::get_simulator_config_path(opt.config_path);
    let config = match &config_path {
        Some(path) => SimulatorConfig::try_new(path)?,
        None => {
            let config = SimulatorConfig::default();
            config.validate()?;
            config
        }
    };
    info!(
        rate = config.publish_rate_hz,
        joints = config.joint_names.len(),
        "starting simulator"
    );

    let model = Arc::new(JointStateModel::new(config.joint_names.clone()));

    let mut player = TrajectoryPlayer::new(model.clone());
    player.run_playback_task();

    let (trajectory_tx, trajectory_rx) = flume::unbounded();
    IngestGateway::new(trajectory_rx, player.handle()).run();

    let (joint_state_tx, joint_state_rx) = flume::unbounded::<JointStateReport>();
    let (feedback_tx, feedback_rx) = flume::unbounded::<FeedbackReport>();
    let mut reporter =
        StateReporter::try_new(model, config.publish_period(), joint_state_tx, feedback_tx)?;
    reporter.run_report_task();

    tokio::spawn(async move {
        while let Ok(report) = joint_state_rx.recv_async().await {
            print_report("joint_states", report);
        }
    });
    tokio::spawn(async move {
        while let Ok(report) = feedback_rx.recv_async().await {
            print_report("feedback_states", report);
        }
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<Trajectory>(&line) {
            Ok(trajectory) => {
                if trajectory_tx.send(trajectory).is_err() {
                    break;
                }
            }
            Err(e) => warn!("ignoring malformed trajectory: {e}"),
        }
    }
    info!("stdin closed, shutting down");
    Ok(())
}
