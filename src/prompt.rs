//! Prompt-embeddable view of the world state.
//!
//! [`PromptView`] renders a [`WorldState`] as a tagged text block that the
//! planner receives with every request. Lists and mappings are written as
//! JSON-style literals with quoted names, every location is listed (also
//! when empty), and the block ends with a fixed planning hint.

use std::fmt;

use crate::WorldState;

/// Instruction appended to every view.
pub const PLANNING_HINT: [&str; 2] = [
    "When you name a location or item in a FunctionSequence, use the most similar name listed in this CurrentState.",
    "If no similar name is listed, tell the user that the location or item is not in the environment.",
];

/// Borrowing renderer for the planner's view of a world state.
///
/// # Examples
///
/// ```
/// use esmrs::{Catalog, WorldState};
/// use esmrs::prompt::PromptView;
///
/// let state = WorldState::from_catalog(&Catalog::new("Hall", [
///     ("Hall", vec!["keys"]),
///     ("Attic", vec![]),
/// ]));
/// let view = PromptView::new(&state).to_string();
///
/// assert!(view.starts_with("<CurrentState>"));
/// assert!(view.contains("<Location>Hall</Location>"));
/// assert!(view.contains("<Place name=\"Attic\">[]</Place>"));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct PromptView<'a> {
    state: &'a WorldState,
}

impl<'a> PromptView<'a> {
    pub fn new(state: &'a WorldState) -> Self {
        Self { state }
    }
}

impl fmt::Display for PromptView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state;
        writeln!(f, "<CurrentState>")?;
        writeln!(f, "  <RobotStatus>")?;
        writeln!(f, "    <Location>{}</Location>", state.robot_status.location)?;
        writeln!(f, "    <Holding>{}</Holding>", List(&state.robot_status.holding))?;
        writeln!(f, "  </RobotStatus>")?;
        writeln!(f, "  <Environment>")?;
        for (location, items) in &state.environment {
            writeln!(f, "    <Place name={:?}>{}</Place>", location, List(items))?;
        }
        writeln!(f, "  </Environment>")?;
        writeln!(
            f,
            "  <KnownItemLocations>{}</KnownItemLocations>",
            Mapping(state.known_item_locations.iter().map(|(k, v)| (k, Quoted(v))))
        )?;
        writeln!(
            f,
            "  <OpenLocations>{}</OpenLocations>",
            List(state.open_locations.iter())
        )?;
        writeln!(f, "  <TaskGoal>")?;
        match &state.task_goal.target_location {
            Some(target) => writeln!(f, "    <TargetLocation>{}</TargetLocation>", target)?,
            None => writeln!(f, "    <TargetLocation>None</TargetLocation>")?,
        }
        writeln!(
            f,
            "    <ItemsNeeded>{}</ItemsNeeded>",
            Mapping(state.task_goal.items_needed.iter())
        )?;
        writeln!(f, "  </TaskGoal>")?;
        writeln!(f, "  <PlanningHint>")?;
        for line in PLANNING_HINT {
            writeln!(f, "    {}", line)?;
        }
        writeln!(f, "  </PlanningHint>")?;
        write!(f, "</CurrentState>")
    }
}

/// `["a", "b"]`
struct List<I>(I);

impl<I, S> fmt::Display for List<I>
where
    I: IntoIterator<Item = S> + Clone,
    S: AsRef<str>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, item) in self.0.clone().into_iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{:?}", item.as_ref())?;
        }
        write!(f, "]")
    }
}

/// `"value"`
struct Quoted<'a>(&'a str);

impl fmt::Display for Quoted<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.0)
    }
}

/// `{"key": value}`
struct Mapping<I>(I);

impl<I, K, V> fmt::Display for Mapping<I>
where
    I: Iterator<Item = (K, V)> + Clone,
    K: AsRef<str>,
    V: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (key, value)) in self.0.clone().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{:?}: {}", key.as_ref(), value)?;
        }
        write!(f, "}}")
    }
}
