//! # Action Module
//!
//! Classifies one line of planner text into an [`Action`] and describes the
//! result of applying it ([`ActionResponse`]).
//!
//! ## Grammar
//!
//! Templates are matched case-insensitively against the start of the
//! trimmed text, in this order; the first match wins:
//!
//! | Template                      | Variant             |
//! |-------------------------------|---------------------|
//! | `go to the <location>`        | [`Action::GoTo`]    |
//! | `find <item>`                 | [`Action::Find`]    |
//! | `pick up the <item>`          | [`Action::PickUp`]  |
//! | `take <item> from <location>` | [`Action::Take`]    |
//! | `put <item> in the <location>`| [`Action::Put`]     |
//! | `open the <location>`         | [`Action::Open`]    |
//! | `close the <location>`        | [`Action::Close`]   |
//! | `hand over <item> to user`    | [`Action::HandOver`]|
//! | `push <object>`               | [`Action::Push`]    |
//! | `done...`                     | [`Action::Done`]    |
//!
//! `take`, `put` and `hand over` only claim a line that also contains their
//! infix (` from `, ` in the `, ` to user`); the argument is split at the
//! last occurrence of the infix. `done` matches any text starting with
//! `done`.
//!
//! ```
//! use esmrs::Action;
//!
//! let action = Action::parse("Take the red cup from Kitchen").unwrap();
//! assert_eq!(
//!     action,
//!     Action::Take { item: "the red cup".to_string(), location: "Kitchen".to_string() }
//! );
//!
//! assert!(Action::parse("dance").is_err());
//! ```

use std::fmt;

use crate::{EsmError, Result};

/// One primitive robot action understood by the state manager.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    GoTo { location: String },
    Find { item: String },
    PickUp { item: String },
    Take { item: String, location: String },
    Put { item: String, location: String },
    Open { location: String },
    Close { location: String },
    HandOver { item: String },
    Push { object: String },
    Done,
}

impl Action {
    /// Classifies an action directive.
    ///
    /// # Errors
    ///
    /// - [`EsmError::MalformedAction`] when a template keyword is present but
    ///   an argument is empty (`go to the`, `find`, `hand over to user`)
    /// - [`EsmError::UnrecognizedAction`] when no template matches
    pub fn parse(text: &str) -> Result<Self> {
        let action = text.trim();
        // ASCII lowering keeps byte offsets aligned with `action`.
        let lower = action.to_ascii_lowercase();
        let line = Line {
            action,
            lower: &lower,
        };

        if let Some(rest) = line.keyword("go to the") {
            return Ok(Action::GoTo {
                location: line.argument(rest, "location")?,
            });
        }
        if let Some(rest) = line.keyword("find") {
            return Ok(Action::Find {
                item: line.argument(rest, "item to find")?,
            });
        }
        if let Some(rest) = line.keyword("pick up the") {
            return Ok(Action::PickUp {
                item: line.argument(rest, "item to pick up")?,
            });
        }
        if let Some((item, location)) = line.keyword_with_infix("take", " from ") {
            return Ok(Action::Take {
                item: line.argument(item, "item or location to take")?,
                location: line.argument(location, "item or location to take")?,
            });
        }
        if let Some((item, location)) = line.keyword_with_infix("put", " in the ") {
            return Ok(Action::Put {
                item: line.argument(item, "item or location to put")?,
                location: line.argument(location, "item or location to put")?,
            });
        }
        if let Some(rest) = line.keyword("open the") {
            return Ok(Action::Open {
                location: line.argument(rest, "location to open")?,
            });
        }
        if let Some(rest) = line.keyword("close the") {
            return Ok(Action::Close {
                location: line.argument(rest, "location to close")?,
            });
        }
        if let Some((item, _)) = line.keyword_with_infix("hand over", " to user") {
            return Ok(Action::HandOver {
                item: line.argument(item, "item to hand over")?,
            });
        }
        if let Some(rest) = line.keyword("push") {
            return Ok(Action::Push {
                object: line.argument(rest, "object to push")?,
            });
        }
        if lower.starts_with("done") {
            return Ok(Action::Done);
        }

        Err(EsmError::UnrecognizedAction(action.to_string()))
    }

    /// Short verb name, used in logs.
    pub fn verb(&self) -> &'static str {
        match self {
            Action::GoTo { .. } => "go_to",
            Action::Find { .. } => "find",
            Action::PickUp { .. } => "pick_up",
            Action::Take { .. } => "take",
            Action::Put { .. } => "put",
            Action::Open { .. } => "open",
            Action::Close { .. } => "close",
            Action::HandOver { .. } => "hand_over",
            Action::Push { .. } => "push",
            Action::Done => "done",
        }
    }
}

impl fmt::Display for Action {
    /// Formats the action back into its canonical template.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::GoTo { location } => write!(f, "go to the {}", location),
            Action::Find { item } => write!(f, "find {}", item),
            Action::PickUp { item } => write!(f, "pick up the {}", item),
            Action::Take { item, location } => write!(f, "take {} from {}", item, location),
            Action::Put { item, location } => write!(f, "put {} in the {}", item, location),
            Action::Open { location } => write!(f, "open the {}", location),
            Action::Close { location } => write!(f, "close the {}", location),
            Action::HandOver { item } => write!(f, "hand over {} to user", item),
            Action::Push { object } => write!(f, "push {}", object),
            Action::Done => write!(f, "done"),
        }
    }
}

/// A trimmed directive alongside its ASCII-lowercased copy.
struct Line<'a> {
    action: &'a str,
    lower: &'a str,
}

impl<'a> Line<'a> {
    /// Byte range after `keyword` if the line starts with it as whole words.
    fn keyword(&self, keyword: &str) -> Option<Span> {
        if !self.lower.starts_with(keyword) {
            return None;
        }
        let boundary = self.lower[keyword.len()..]
            .chars()
            .next()
            .map_or(true, char::is_whitespace);
        boundary.then_some((keyword.len(), self.action.len()))
    }

    /// Splits the text after `keyword` at the last occurrence of `infix`,
    /// returning the byte ranges of both parts.
    fn keyword_with_infix(&self, keyword: &str, infix: &str) -> Option<(Span, Span)> {
        let (start, end) = self.keyword(keyword)?;
        let split = self.lower[start..].rfind(infix)? + start;
        Some(((start, split), (split + infix.len(), end)))
    }

    fn argument(&self, (start, end): Span, what: &'static str) -> Result<String> {
        let value = self.action[start..end].trim();
        if value.is_empty() {
            return Err(EsmError::MalformedAction {
                what,
                action: self.action.to_string(),
            });
        }
        Ok(value.to_string())
    }
}

type Span = (usize, usize);

/// Outcome category of an executed action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionStatus {
    /// The action changed the world state (or was an idempotent no-op of a
    /// valid request, like opening an open drawer)
    Applied,
    /// The action was understood and only reports information
    Informational,
    /// The action was understood but the world did not allow it
    Refused,
    /// The text could not be classified
    ParseFailed,
    /// Something unexpected went wrong while applying the action
    Failed,
}

/// Response from executing one action directive.
///
/// Holds the human-readable log lines produced while executing and the
/// overall [`ActionStatus`]. Its `Display` form is the newline-joined log.
///
/// # Examples
///
/// ```
/// use esmrs::{ActionResponse, ActionStatus};
///
/// let response = ActionResponse::new(
///     "go to the Kitchen",
///     vec!["Action Executed: go to the Kitchen".into(), "Robot moved to Kitchen".into()],
///     ActionStatus::Applied,
/// );
/// assert!(response.is_success());
/// assert_eq!(response.to_string(), "Action Executed: go to the Kitchen\nRobot moved to Kitchen");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionResponse {
    action: String,
    lines: Vec<String>,
    status: ActionStatus,
}

impl ActionResponse {
    pub fn new(action: impl Into<String>, lines: Vec<String>, status: ActionStatus) -> Self {
        Self {
            action: action.into(),
            lines,
            status,
        }
    }

    /// The directive text as received.
    pub fn action(&self) -> &str {
        &self.action
    }

    /// The log lines, in order.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn status(&self) -> ActionStatus {
        self.status
    }

    /// `true` for [`ActionStatus::Applied`] and [`ActionStatus::Informational`].
    pub fn is_success(&self) -> bool {
        matches!(self.status, ActionStatus::Applied | ActionStatus::Informational)
    }
}

impl fmt::Display for ActionResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.lines.join("\n"))
    }
}
