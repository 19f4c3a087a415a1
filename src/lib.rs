pub mod action;
pub mod catalog;
mod error;
pub mod goal;
pub mod literal;
mod manager;
pub mod plan;
pub mod prompt;
pub mod resolver;
pub mod snapshot;
pub mod world_state;

pub use action::{Action, ActionResponse, ActionStatus};
pub use catalog::Catalog;
pub use error::{EsmError, Result};
pub use goal::TaskGoal;
pub use manager::StateManager;
pub use snapshot::{History, SnapshotEvent, StateSnapshot};
pub use world_state::{RobotStatus, WorldState};
