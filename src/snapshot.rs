//! Point-in-time copies of the world state.
//!
//! Every mutation attempt on the [`StateManager`](crate::StateManager)
//! records a [`StateSnapshot`] in a [`History`]. A snapshot whose state is
//! identical to the previous one is dropped, so the history only contains
//! actual changes.

use std::fmt;
use std::io::Write;

use chrono::{DateTime, Utc};
use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

use crate::world_state::{Environment, RobotStatus};
use crate::{Result, TaskGoal, WorldState};

/// Why a snapshot was taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SnapshotEvent {
    Initialized,
    TaskGoalUpdated,
    ActionUpdate,
}

impl SnapshotEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            SnapshotEvent::Initialized => "initialized",
            SnapshotEvent::TaskGoalUpdated => "task_goal_updated",
            SnapshotEvent::ActionUpdate => "action_update",
        }
    }
}

impl fmt::Display for SnapshotEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An immutable copy of the world state at one point in time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateSnapshot {
    pub event: SnapshotEvent,
    pub timestamp: DateTime<Utc>,
    pub robot_status: RobotStatus,
    pub environment: Environment,
    pub known_locations: IndexMap<String, String>,
    pub open_locations: IndexSet<String>,
    pub task_goal: TaskGoal,
    /// Raw directive that triggered the snapshot (`raw` for goals, `action`
    /// for actions)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<IndexMap<String, String>>,
}

impl StateSnapshot {
    /// Copies `state` into a new snapshot stamped with the current time.
    pub fn capture(
        event: SnapshotEvent,
        state: &WorldState,
        metadata: Option<IndexMap<String, String>>,
    ) -> Self {
        Self {
            event,
            timestamp: Utc::now(),
            robot_status: state.robot_status.clone(),
            environment: state.environment.clone(),
            known_locations: state.known_item_locations.clone(),
            open_locations: state.open_locations.clone(),
            task_goal: state.task_goal.clone(),
            metadata,
        }
    }

    /// Returns `true` if both snapshots describe the same world, ignoring
    /// event, time and metadata.
    pub fn same_state(&self, other: &StateSnapshot) -> bool {
        self.robot_status == other.robot_status
            && self.environment == other.environment
            && self.known_locations == other.known_locations
            && self.open_locations == other.open_locations
            && self.task_goal == other.task_goal
    }
}

/// Append-only, coalescing list of snapshots.
///
/// The history is unbounded; a session keeps every distinct state it went
/// through.
#[derive(Debug, Clone, Default)]
pub struct History {
    snapshots: Vec<StateSnapshot>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `snapshot` unless it repeats the state of the last one.
    /// Returns whether it was appended.
    pub fn record(&mut self, snapshot: StateSnapshot) -> bool {
        if let Some(last) = self.last() {
            if last.same_state(&snapshot) {
                log::debug!(
                    "Dropping {} snapshot: state unchanged since {}",
                    snapshot.event,
                    last.event
                );
                return false;
            }
        }
        self.snapshots.push(snapshot);
        true
    }

    /// All snapshots, oldest first.
    pub fn snapshots(&self) -> &[StateSnapshot] {
        &self.snapshots
    }

    pub fn last(&self) -> Option<&StateSnapshot> {
        self.snapshots.last()
    }

    /// Serializes the history as a JSON array.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.snapshots)?)
    }

    /// Writes one JSON object per snapshot per line.
    pub fn write_jsonl<W: Write>(&self, mut writer: W) -> Result<()> {
        for snapshot in &self.snapshots {
            serde_json::to_writer(&mut writer, snapshot)?;
            writer.write_all(b"\n")?;
        }
        writer.flush()?;
        Ok(())
    }
}
