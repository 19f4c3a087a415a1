//! Task goal parsing.
//!
//! The planner announces the goal of a task as a directive such as
//! `Goal: {target_location: "dining table", items_needed: {"plate": 2}}`.
//! [`TaskGoal::from_directive`] extracts the brace-delimited block after the
//! `Goal:` marker and converts it with the restricted literal parser.

use std::fmt;
use std::sync::OnceLock;

use indexmap::IndexMap;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::literal::parse_literal;
use crate::{EsmError, Result};

fn goal_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?s)Goal:\s*(\{.*\})").expect("goal pattern is valid"))
}

/// The goal of the current task: where items should end up and how many of each.
///
/// # Examples
///
/// ```
/// use esmrs::TaskGoal;
///
/// let goal = TaskGoal::from_directive(
///     r#"Goal: {"target_location": "DiningTable", "items_needed": {"Plate": 2}}"#,
/// ).unwrap();
/// assert_eq!(goal.target_location.as_deref(), Some("DiningTable"));
/// assert_eq!(goal.items_needed.get("Plate"), Some(&2));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskGoal {
    /// Location the items should be brought to, if the planner named one
    pub target_location: Option<String>,
    /// Required count per item name
    pub items_needed: IndexMap<String, u64>,
}

impl TaskGoal {
    /// Returns `true` when neither a target nor any items are set.
    pub fn is_empty(&self) -> bool {
        self.target_location.is_none() && self.items_needed.is_empty()
    }

    /// Parses a goal directive.
    ///
    /// # Errors
    ///
    /// - [`EsmError::GoalMarkerMissing`] if no `Goal: {...}` block is present
    /// - [`EsmError::GoalLiteral`] if the block is not a valid literal
    /// - [`EsmError::GoalShape`] if the literal is not a mapping with the
    ///   expected field types
    pub fn from_directive(directive: &str) -> Result<Self> {
        let block = goal_pattern()
            .captures(directive)
            .and_then(|caps| caps.get(1))
            .ok_or(EsmError::GoalMarkerMissing)?;
        let value = parse_literal(block.as_str())?;
        Self::from_value(&value)
    }

    /// Builds a goal from an already parsed literal mapping.
    pub fn from_value(value: &Value) -> Result<Self> {
        let mapping = value
            .as_object()
            .ok_or_else(|| EsmError::GoalShape("goal must be a mapping".to_string()))?;

        let target_location = match mapping.get("target_location") {
            None | Some(Value::Null) => None,
            Some(Value::String(location)) => Some(location.clone()),
            Some(other) => {
                return Err(EsmError::GoalShape(format!(
                    "target_location must be a string, got {}",
                    other
                )))
            }
        };

        let mut items_needed = IndexMap::new();
        match mapping.get("items_needed") {
            None | Some(Value::Null) => {}
            Some(Value::Object(items)) => {
                for (item, count) in items {
                    let count = count.as_u64().ok_or_else(|| {
                        EsmError::GoalShape(format!(
                            "count for '{}' must be a non-negative integer, got {}",
                            item, count
                        ))
                    })?;
                    items_needed.insert(item.clone(), count);
                }
            }
            Some(other) => {
                return Err(EsmError::GoalShape(format!(
                    "items_needed must be a mapping, got {}",
                    other
                )))
            }
        }

        Ok(Self {
            target_location,
            items_needed,
        })
    }
}

impl fmt::Display for TaskGoal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{target_location: {}, items_needed: {{",
            self.target_location.as_deref().unwrap_or("None")
        )?;
        let mut first = true;
        for (item, count) in &self.items_needed {
            if !first {
                write!(f, ", ")?;
            }
            write!(f, "{}: {}", item, count)?;
            first = false;
        }
        write!(f, "}}}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_json_style_goal() {
        let goal = TaskGoal::from_directive(
            r#"Goal: {"target_location": "DiningTable", "items_needed": {"Plate": 2}}"#,
        )
        .unwrap();
        assert_eq!(goal.target_location.as_deref(), Some("DiningTable"));
        assert_eq!(goal.items_needed.len(), 1);
        assert_eq!(goal.items_needed["Plate"], 2);
    }

    #[test]
    fn test_parse_goal_embedded_in_prose() {
        let goal = TaskGoal::from_directive(
            "Understood.\nGoal: {target_location: 'desk',\n items_needed: {'pen': 1, 'notebook': 1}}\nThanks",
        )
        .unwrap();
        assert_eq!(goal.target_location.as_deref(), Some("desk"));
        assert_eq!(
            goal.items_needed.keys().collect::<Vec<_>>(),
            vec!["pen", "notebook"]
        );
    }

    #[test]
    fn test_missing_fields_default() {
        let goal = TaskGoal::from_directive("Goal: {}").unwrap();
        assert!(goal.is_empty());

        let goal = TaskGoal::from_directive("Goal: {'target_location': None}").unwrap();
        assert!(goal.target_location.is_none());
        assert!(goal.items_needed.is_empty());
    }

    #[test]
    fn test_missing_marker() {
        let err = TaskGoal::from_directive("{'target_location': 'desk'}").unwrap_err();
        assert!(matches!(err, EsmError::GoalMarkerMissing));
    }

    #[test]
    fn test_unsafe_literal_rejected() {
        let err = TaskGoal::from_directive("Goal: {'target_location': exec('rm')}").unwrap_err();
        assert!(matches!(err, EsmError::GoalLiteral { .. }));
    }

    #[test]
    fn test_bad_shapes_rejected() {
        assert!(matches!(
            TaskGoal::from_directive("Goal: {'target_location': 3}"),
            Err(EsmError::GoalShape(_))
        ));
        assert!(matches!(
            TaskGoal::from_directive("Goal: {'items_needed': ['plate']}"),
            Err(EsmError::GoalShape(_))
        ));
        assert!(matches!(
            TaskGoal::from_directive("Goal: {'items_needed': {'plate': -1}}"),
            Err(EsmError::GoalShape(_))
        ));
    }

    #[test]
    fn test_large_counts() {
        let goal = TaskGoal::from_directive("Goal: {items_needed: {'plate': 10000000000000000000}}")
            .unwrap();
        assert_eq!(goal.items_needed["plate"], 10_000_000_000_000_000_000);
    }

    #[test]
    fn test_display() {
        let goal = TaskGoal::from_directive("Goal: {items_needed: {'cup': 1}}").unwrap();
        assert_eq!(goal.to_string(), "{target_location: None, items_needed: {cup: 1}}");
    }
}
