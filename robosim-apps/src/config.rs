use std::{collections::HashSet, path::Path, time::Duration};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::Error;

fn default_publish_rate_hz() -> f64 {
    10.0
}

fn default_joint_names() -> Vec<String> {
    (1..=6).map(|i| format!("joint_{i}")).collect()
}

/// Startup configuration of the simulator, immutable once loaded.
#[derive(Debug, Serialize, Deserialize, Clone, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct SimulatorConfig {
    /// Cadence of the joint state / feedback report pair.
    #[serde(default = "default_publish_rate_hz")]
    pub publish_rate_hz: f64,
    /// Joints of the simulated robot, in report order.
    #[serde(default = "default_joint_names")]
    pub joint_names: Vec<String>,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            publish_rate_hz: default_publish_rate_hz(),
            joint_names: default_joint_names(),
        }
    }
}

impl SimulatorConfig {
    /// Loads and validates a config from a TOML file.
    pub fn try_new<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let path = path.as_ref();
        let s =
            std::fs::read_to_string(path).map_err(|e| Error::NoFile(path.to_owned(), e))?;
        let config: SimulatorConfig =
            toml::from_str(&s).map_err(|e| Error::TomlParseFailure(path.to_owned(), e))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks startup invariants. An empty joint list is allowed but warned
    /// about; the simulator then reports empty arrays.
    pub fn validate(&self) -> Result<(), Error> {
        if !self.publish_rate_hz.is_finite() || self.publish_rate_hz <= 0.0 {
            return Err(Error::InvalidPublishRate(self.publish_rate_hz));
        }
        let mut seen = HashSet::new();
        for name in &self.joint_names {
            if !seen.insert(name) {
                return Err(Error::DuplicateJointName(name.clone()));
            }
        }
        if self.joint_names.is_empty() {
            warn!("joint_names is empty, all reports will carry empty arrays");
        }
        Ok(())
    }

    pub fn publish_period(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.publish_rate_hz)
    }
}
