use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error("robosim-apps: No File {:?} is found ({}).", .0, .1)]
    NoFile(PathBuf, #[source] std::io::Error),
    #[error("robosim-apps: Failed to parse {:?} as toml ({}).", .0, .1)]
    TomlParseFailure(PathBuf, #[source] toml::de::Error),
    #[error("robosim-apps: Invalid publish rate {}.", .0)]
    InvalidPublishRate(f64),
    #[error("robosim-apps: Duplicated joint name {}.", .0)]
    DuplicateJointName(String),
    #[error("robosim-apps: robosim-core: {:?}", .0)]
    Core(#[from] robosim_core::Error),
}
