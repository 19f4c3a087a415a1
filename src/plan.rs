//! Extraction of numbered plan steps.
//!
//! The planner returns its action plan as a numbered list:
//!
//! ```text
//! 1. go to the kitchen shelf
//! 2. pick up the cup
//! 3. done
//! ```
//!
//! [`parse_plan_steps`] turns that block into one directive per step.

use std::sync::OnceLock;

use regex::Regex;

fn step_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?m)^[ \t]*\d+\.[ \t]*(.*?)[ \t\r]*$").expect("step pattern is valid")
    })
}

/// Returns the text of every numbered line, in order.
///
/// Lines without a leading `<number>.` are ignored, as are numbered lines
/// with no text.
///
/// # Examples
///
/// ```
/// use esmrs::plan::parse_plan_steps;
///
/// let steps = parse_plan_steps("Plan:\n1. go to the desk\n  2.  pick up the pen \nthanks");
/// assert_eq!(steps, vec!["go to the desk", "pick up the pen"]);
/// ```
pub fn parse_plan_steps(text: &str) -> Vec<String> {
    step_pattern()
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|step| step.as_str().trim())
        .filter(|step| !step.is_empty())
        .map(str::to_string)
        .collect()
}
