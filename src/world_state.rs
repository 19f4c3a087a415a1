//! World state representation for the external state manager.
//!
//! [`WorldState`] is the symbolic model of the home: where the robot is and
//! what it carries ([`RobotStatus`]), which items sit in which location,
//! which items the robot has already located, which locations are open, and
//! the current [`TaskGoal`].
//!
//! Item and location names keep the casing they were seeded or introduced
//! with. Lookups from planner text go through
//! [`NameResolver`](crate::resolver::NameResolver).
//!
//! # Example
//!
//! ```
//! use esmrs::{Catalog, WorldState};
//!
//! let catalog = Catalog::new("LivingRoom", [
//!     ("Kitchen", vec!["Cup"]),
//!     ("LivingRoom", vec![]),
//! ]);
//! let state = WorldState::from_catalog(&catalog);
//!
//! assert_eq!(state.robot_status.location, "LivingRoom");
//! assert!(state.robot_status.holding.is_empty());
//! assert_eq!(state.items_at("Kitchen"), Some(&["Cup".to_string()][..]));
//! ```

use std::collections::HashSet;
use std::fmt;

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

use crate::resolver::same_name;
use crate::{Catalog, EsmError, Result, TaskGoal};

/// Location name to the items currently in it.
pub type Environment = IndexMap<String, Vec<String>>;

/// Where the robot is and what it is carrying.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RobotStatus {
    /// Name of the location the robot is in
    pub location: String,
    /// Items in the robot's hands, in pick-up order
    pub holding: Vec<String>,
}

/// The complete symbolic state of the world.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldState {
    pub robot_status: RobotStatus,
    pub environment: Environment,
    /// Items the robot has located, and where
    pub known_item_locations: IndexMap<String, String>,
    pub open_locations: IndexSet<String>,
    pub task_goal: TaskGoal,
}

impl WorldState {
    /// Seeds a state from a catalog: every location with its starting items,
    /// the robot at the start location with empty hands, and no goal.
    ///
    /// The start location takes the spelling of the matching catalog entry.
    pub fn from_catalog(catalog: &Catalog) -> Self {
        let start = catalog
            .locations
            .keys()
            .find(|location| same_name(location, &catalog.start_location))
            .unwrap_or(&catalog.start_location);
        Self {
            robot_status: RobotStatus {
                location: start.clone(),
                holding: Vec::new(),
            },
            environment: catalog.locations.clone(),
            known_item_locations: IndexMap::new(),
            open_locations: IndexSet::new(),
            task_goal: TaskGoal::default(),
        }
    }

    /// Items at `location` (exact name), or `None` for an unknown location.
    pub fn items_at(&self, location: &str) -> Option<&[String]> {
        self.environment.get(location).map(Vec::as_slice)
    }

    /// Returns `true` if `location` is currently open.
    pub fn is_open(&self, location: &str) -> bool {
        self.open_locations.contains(location)
    }

    /// Counts how many containers (locations plus the robot's hands) hold
    /// an item with exactly this name.
    pub fn occurrences(&self, item: &str) -> usize {
        let in_locations: usize = self
            .environment
            .values()
            .map(|items| items.iter().filter(|i| *i == item).count())
            .sum();
        in_locations + self.robot_status.holding.iter().filter(|i| *i == item).count()
    }

    /// Checks that no item sits in two containers at once.
    ///
    /// # Errors
    ///
    /// Returns [`EsmError::Internal`] naming the first duplicated item.
    pub fn check_consistency(&self) -> Result<()> {
        let mut seen = HashSet::new();
        let items = self
            .environment
            .values()
            .flatten()
            .chain(&self.robot_status.holding);
        for item in items {
            if !seen.insert(item.as_str()) {
                return Err(EsmError::Internal(format!(
                    "item '{}' is in more than one place",
                    item
                )));
            }
        }
        Ok(())
    }

    /// Moves the robot to `location`.
    pub(crate) fn move_robot(&mut self, location: &str) {
        self.robot_status.location = location.to_string();
    }

    /// Moves `item` from `location` into the robot's hands.
    ///
    /// Returns `false` and leaves the state untouched if the item is not in
    /// that location.
    pub(crate) fn pick_from(&mut self, location: &str, item: &str) -> bool {
        let Some(items) = self.environment.get_mut(location) else {
            return false;
        };
        let Some(index) = items.iter().position(|i| i == item) else {
            return false;
        };
        let picked = items.remove(index);
        self.known_item_locations.shift_remove(&picked);
        self.robot_status.holding.push(picked);
        true
    }

    /// Removes the first held item whose name matches `item` ignoring case.
    pub(crate) fn release_held(&mut self, item: &str) -> Option<String> {
        let index = self
            .robot_status
            .holding
            .iter()
            .position(|held| same_name(held, item))?;
        Some(self.robot_status.holding.remove(index))
    }

    /// Places an item in `location`, creating the location entry if needed,
    /// and records where it is.
    pub(crate) fn place_in(&mut self, location: &str, item: String) {
        self.known_item_locations
            .insert(item.clone(), location.to_string());
        self.environment
            .entry(location.to_string())
            .or_default()
            .push(item);
    }

    /// Marks `location` as open. Returns `false` if it already was.
    pub(crate) fn open(&mut self, location: &str) -> bool {
        self.open_locations.insert(location.to_string())
    }

    /// Marks `location` as closed. Returns `false` if it was not open.
    pub(crate) fn close(&mut self, location: &str) -> bool {
        self.open_locations.shift_remove(location)
    }
}

impl fmt::Display for RobotStatus {
    /// Formats as `at <location>, holding [<items>]`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "at {}, holding [", self.location)?;
        let mut first = true;
        for item in &self.holding {
            if !first {
                write!(f, ", ")?;
            }
            write!(f, "{}", item)?;
            first = false;
        }
        write!(f, "]")
    }
}
