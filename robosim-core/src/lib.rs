//! Simulated industrial robot controller.
//!
//! Plays back time-stamped joint trajectories against a shared joint state
//! model and reports that state on a fixed cadence, standing in for robot
//! firmware while testing motion planning software.

mod error;
mod gateway;
mod model;
mod msg;
mod player;
mod reporter;

pub use error::*;
pub use gateway::*;
pub use model::*;
pub use msg::*;
pub use player::*;
pub use reporter::*;
