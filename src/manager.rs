//! # State Manager
//!
//! [`StateManager`] owns the [`WorldState`] of one session and its snapshot
//! [`History`]. It is the only place the world changes:
//!
//! 1. [`StateManager::set_task_goal`] stores the goal announced by the planner.
//! 2. [`StateManager::execute_action`] applies one action directive and
//!    returns a human-readable execution log.
//!
//! Two read views complete the interface: [`StateManager::render_prompt_view`]
//! for the planner's next request, and [`StateManager::history`] for
//! reporting.
//!
//! Planner text is untrusted. Neither operation returns an error or panics
//! on malformed input; problems become log lines and `false` results.
//!
//! ## Basic Usage
//!
//! ```
//! use esmrs::{Catalog, StateManager};
//!
//! let catalog = Catalog::new("LivingRoom", [
//!     ("Kitchen", vec!["Cup"]),
//!     ("LivingRoom", vec![]),
//! ]);
//! let mut manager = StateManager::with_catalog(catalog).unwrap();
//!
//! assert!(manager.set_task_goal(r#"Goal: {"target_location": "LivingRoom", "items_needed": {"Cup": 1}}"#));
//!
//! manager.execute_action("go to the kitchen");
//! let log = manager.execute_action("pick up the cup");
//! assert!(log.contains("Robot picked up Cup from Kitchen"));
//! assert_eq!(manager.state().robot_status.holding, vec!["Cup".to_string()]);
//! ```

use std::io::Write;

use indexmap::IndexMap;

use crate::action::{Action, ActionResponse, ActionStatus};
use crate::prompt::PromptView;
use crate::resolver::NameResolver;
use crate::snapshot::{History, SnapshotEvent, StateSnapshot};
use crate::{Catalog, EsmError, Result, TaskGoal, WorldState};

/// What a successfully interpreted action reports.
struct Outcome {
    message: String,
    status: ActionStatus,
}

impl Outcome {
    fn applied(message: String) -> Self {
        Self {
            message,
            status: ActionStatus::Applied,
        }
    }

    fn informational(message: String) -> Self {
        Self {
            message,
            status: ActionStatus::Informational,
        }
    }
}

/// Owner of the world model for one session.
#[derive(Debug, Clone)]
pub struct StateManager {
    state: WorldState,
    history: History,
}

impl StateManager {
    /// Creates a manager seeded with the built-in home catalog.
    pub fn new() -> Self {
        Self::seeded(&Catalog::home())
    }

    /// Creates a manager seeded with `catalog`.
    ///
    /// # Errors
    ///
    /// Returns [`EsmError::Catalog`] if the catalog fails
    /// [`Catalog::validate`].
    pub fn with_catalog(catalog: Catalog) -> Result<Self> {
        catalog.validate()?;
        Ok(Self::seeded(&catalog))
    }

    fn seeded(catalog: &Catalog) -> Self {
        let mut manager = Self {
            state: WorldState::from_catalog(catalog),
            history: History::new(),
        };
        manager.record(SnapshotEvent::Initialized, None);
        log::info!(
            "State manager initialized with {} locations, robot at {}",
            manager.state.environment.len(),
            manager.state.robot_status.location
        );
        manager
    }

    /// The current world state.
    pub fn state(&self) -> &WorldState {
        &self.state
    }

    /// Every recorded snapshot, oldest first.
    ///
    /// The history is never trimmed, so it grows with the number of state
    /// changes in the session.
    pub fn history(&self) -> &[StateSnapshot] {
        self.history.snapshots()
    }

    /// The history as a pretty-printed JSON array.
    pub fn history_json(&self) -> Result<String> {
        self.history.to_json()
    }

    /// Writes the history as JSON Lines.
    pub fn write_history_jsonl<W: Write>(&self, writer: W) -> Result<()> {
        self.history.write_jsonl(writer)
    }

    /// Renders the planner's view of the current state.
    pub fn render_prompt_view(&self) -> String {
        PromptView::new(&self.state).to_string()
    }

    /// Parses a goal directive and stores the goal.
    ///
    /// Returns `false` and leaves the goal untouched when the directive has
    /// no `Goal: {...}` block or the block is not a valid goal literal.
    pub fn set_task_goal(&mut self, directive: &str) -> bool {
        match self.try_set_task_goal(directive) {
            Ok(_) => true,
            Err(err) => {
                log::warn!("Error parsing task goal: {} (received: {:?})", err, directive);
                false
            }
        }
    }

    /// Like [`set_task_goal`](Self::set_task_goal), but reports why parsing
    /// failed.
    pub fn try_set_task_goal(&mut self, directive: &str) -> Result<TaskGoal> {
        let goal = TaskGoal::from_directive(directive)?;
        self.state.task_goal = goal.clone();
        log::info!("Goal Set: {}", goal);

        let mut metadata = IndexMap::new();
        metadata.insert("raw".to_string(), directive.to_string());
        self.record(SnapshotEvent::TaskGoalUpdated, Some(metadata));
        Ok(goal)
    }

    /// Applies one action directive and returns the execution log, one line
    /// per step.
    pub fn execute_action(&mut self, text: &str) -> String {
        self.execute(text).to_string()
    }

    /// Applies one action directive and returns the structured result.
    ///
    /// The log always starts with `Action Executed: <text>` and ends with a
    /// `State Updated:` summary. One snapshot is recorded per call; it is
    /// dropped by the history if nothing changed.
    pub fn execute(&mut self, text: &str) -> ActionResponse {
        let mut lines = vec![format!("Action Executed: {}", text)];

        let status = match self.apply_checked(text) {
            Ok(outcome) => {
                lines.push(outcome.message);
                outcome.status
            }
            Err(err) if err.is_parse_error() => {
                lines.push(err.to_string());
                ActionStatus::ParseFailed
            }
            Err(err) if err.is_precondition() => {
                lines.push(err.to_string());
                ActionStatus::Refused
            }
            Err(err) => {
                lines.push(format!("State Update Error: {} on action: {}", err, text.trim()));
                ActionStatus::Failed
            }
        };

        lines.push(format!("State Updated: Robot {}", self.state.robot_status));
        for line in &lines {
            log::info!("{}", line);
        }
        if !matches!(status, ActionStatus::Applied | ActionStatus::Informational) {
            log::warn!("Action {:?} was not applied ({:?})", text, status);
        }

        let mut metadata = IndexMap::new();
        metadata.insert("action".to_string(), text.to_string());
        self.record(SnapshotEvent::ActionUpdate, Some(metadata));

        ActionResponse::new(text, lines, status)
    }

    /// Executes each step in order.
    pub fn execute_plan<I, S>(&mut self, steps: I) -> Vec<ActionResponse>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        steps
            .into_iter()
            .map(|step| self.execute(step.as_ref()))
            .collect()
    }

    fn record(&mut self, event: SnapshotEvent, metadata: Option<IndexMap<String, String>>) {
        self.history
            .record(StateSnapshot::capture(event, &self.state, metadata));
    }

    /// Parses and applies `text`. A change that leaves an item in two places
    /// is rolled back and reported as [`EsmError::Internal`].
    fn apply_checked(&mut self, text: &str) -> Result<Outcome> {
        let action = Action::parse(text)?;
        let before = self.state.clone();
        let outcome = self.apply(&action)?;
        if let Err(err) = self.state.check_consistency() {
            self.state = before;
            return Err(err);
        }
        Ok(outcome)
    }

    fn apply(&mut self, action: &Action) -> Result<Outcome> {
        log::debug!("Applying {} action: {}", action.verb(), action);
        match action {
            Action::GoTo { location } => Ok(self.go_to(location)),
            Action::Find { item } => Ok(self.find(item)),
            Action::PickUp { item } => self.pick_up(item),
            Action::Take { item, location } => self.take(item, location),
            Action::Put { item, location } => self.put(item, location),
            Action::Open { location } => self.open(location),
            Action::Close { location } => self.close(location),
            Action::HandOver { item } => self.hand_over(item),
            Action::Push { object } => Ok(Outcome::informational(format!(
                "Robot pushed {}",
                object
            ))),
            Action::Done => Ok(Outcome::informational("Task completed.".to_string())),
        }
    }

    fn resolver(&self) -> NameResolver<'_> {
        NameResolver::new(&self.state)
    }

    fn go_to(&mut self, location: &str) -> Outcome {
        let resolved = self.resolver().location(location);
        self.state.move_robot(&resolved);
        Outcome::applied(format!("Robot moved to {}", resolved))
    }

    fn find(&mut self, item: &str) -> Outcome {
        let found = self
            .resolver()
            .find_item(item)
            .map(|(item, location)| (item.to_string(), location.to_string()));
        match found {
            Some((item, location)) => {
                let message = format!("Found {} at {}", item, location);
                self.state.known_item_locations.insert(item, location);
                Outcome::applied(message)
            }
            None => Outcome::informational(format!("{} not found in the environment", item)),
        }
    }

    fn pick_up(&mut self, item: &str) -> Result<Outcome> {
        let current = self.state.robot_status.location.clone();
        let location = self.resolver().location(&current);
        let resolved = self.resolver().item(item, Some(&location));
        if self.state.pick_from(&location, &resolved) {
            Ok(Outcome::applied(format!(
                "Robot picked up {} from {}",
                resolved, location
            )))
        } else {
            Err(EsmError::ItemNotFound {
                item: item.to_string(),
                location: current,
            })
        }
    }

    fn take(&mut self, item: &str, location: &str) -> Result<Outcome> {
        let resolved_location = self.resolver().location(location);
        let current = &self.state.robot_status.location;
        if !self.resolver().same_location(&resolved_location, current) {
            return Err(EsmError::NotColocated {
                current: current.clone(),
                verb: "take items from",
                requested: location.to_string(),
            });
        }
        let resolved = self.resolver().item(item, Some(&resolved_location));
        if self.state.pick_from(&resolved_location, &resolved) {
            Ok(Outcome::applied(format!(
                "Robot took {} from {}",
                resolved, resolved_location
            )))
        } else {
            Err(EsmError::ItemNotFound {
                item: item.to_string(),
                location: location.to_string(),
            })
        }
    }

    fn put(&mut self, item: &str, location: &str) -> Result<Outcome> {
        let resolved_location = self.resolver().location(location);
        let current = &self.state.robot_status.location;
        if !self.resolver().same_location(&resolved_location, current) {
            return Err(EsmError::NotColocated {
                current: current.clone(),
                verb: "put items in",
                requested: location.to_string(),
            });
        }
        let resolved = self.resolver().item(item, None);
        let released = self
            .state
            .release_held(&resolved)
            .ok_or_else(|| EsmError::NotHolding(item.to_string()))?;
        let message = format!("Robot put {} in the {}", released, resolved_location);
        self.state.place_in(&resolved_location, released);
        Ok(Outcome::applied(message))
    }

    fn open(&mut self, location: &str) -> Result<Outcome> {
        let resolved = self
            .resolver()
            .known_location(location)
            .map(str::to_string)
            .ok_or_else(|| EsmError::UnknownLocation(location.to_string()))?;
        self.state.open(&resolved);
        Ok(Outcome::applied(format!("Robot opened the {}", resolved)))
    }

    fn close(&mut self, location: &str) -> Result<Outcome> {
        let resolved = self
            .resolver()
            .known_location(location)
            .map(str::to_string)
            .ok_or_else(|| EsmError::UnknownLocation(location.to_string()))?;
        self.state.close(&resolved);
        Ok(Outcome::applied(format!("Robot closed the {}", resolved)))
    }

    fn hand_over(&mut self, item: &str) -> Result<Outcome> {
        let released = self
            .state
            .release_held(item)
            .ok_or_else(|| EsmError::NotHolding(item.to_string()))?;
        Ok(Outcome::applied(format!(
            "Robot handed over {} to the user",
            released
        )))
    }
}

impl Default for StateManager {
    fn default() -> Self {
        Self::new()
    }
}
