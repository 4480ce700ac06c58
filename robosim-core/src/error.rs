use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error("robosim: No Joint={} is found.", .0)]
    NoJoint(String),
    #[error("robosim: Length mismatch (names = {}, positions = {})", names, positions)]
    LengthMismatch { names: usize, positions: usize },
    #[error("robosim: Invalid report period {:?}", .0)]
    InvalidPeriod(Duration),
    #[error("robosim: Connection error : {}", message)]
    Connection { message: String },
    #[error("robosim: Other: {:?}", .0)]
    Other(#[from] anyhow::Error),
}
