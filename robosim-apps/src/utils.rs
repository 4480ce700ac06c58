use std::{io::Write, path::PathBuf};

use serde::Serialize;
use tracing::warn;

const ROBOSIM_CONFIG_ENV_NAME: &str = "ROBOSIM_CONFIG_PATH";

/// Get the config path from the input or the ROBOSIM_CONFIG_PATH env var.
pub fn get_simulator_config_path(config: Option<PathBuf>) -> Option<PathBuf> {
    if config.is_some() {
        config
    } else {
        std::env::var(ROBOSIM_CONFIG_ENV_NAME)
            .map(|s| {
                warn!("### ENV VAR {} is used ###", s);
                PathBuf::from(s)
            })
            .ok()
    }
}

/// Initializes the tracing subscriber once per process.
///
/// Logs go to stderr; stdout is reserved for the report streams.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
}

/// One line of the report mirror, tagged with its topic name.
#[derive(Debug, Serialize)]
pub struct TaggedReport<T> {
    pub topic: &'static str,
    pub msg: T,
}

/// Writes a report as one JSON line onto `writer`.
///
/// Failures are returned to the caller, which logs them and keeps its
/// report loop alive; a closed sink must not take the process down.
pub fn write_report<W, T>(writer: &mut W, topic: &'static str, msg: T) -> anyhow::Result<()>
where
    W: Write,
    T: Serialize,
{
    let line = serde_json::to_string(&TaggedReport { topic, msg })?;
    writeln!(writer, "{line}")?;
    Ok(())
}
