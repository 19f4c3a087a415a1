use thiserror::Error;

/// Error types for the external state manager.
///
/// The variants fall into four families: goal parsing, action parsing,
/// action preconditions, and catalog/export I/O. None of them is fatal to a
/// session; [`StateManager::execute_action`](crate::StateManager::execute_action)
/// turns every action error into a log line.
///
/// # Examples
///
/// ```
/// use esmrs::EsmError;
///
/// let error = EsmError::NotHolding("cup".to_string());
/// assert_eq!(format!("{}", error), "Robot is not holding cup");
/// ```
#[derive(Error, Debug)]
pub enum EsmError {
    // Goal errors
    /// The directive has no `Goal: {...}` block
    #[error("Could not find 'Goal: {{...}}' pattern")]
    GoalMarkerMissing,

    /// The brace-delimited goal literal is not a valid literal
    #[error("Invalid goal literal at offset {position}: {message}")]
    GoalLiteral { position: usize, message: String },

    /// The goal literal parsed but does not have the expected shape
    #[error("Invalid goal structure: {0}")]
    GoalShape(String),

    // Action parse errors
    /// No verb template matches the action text
    #[error("Unrecognized action: {0}")]
    UnrecognizedAction(String),

    /// A verb template matched but a required argument is missing
    #[error("Could not parse {what} in action: {action}")]
    MalformedAction { what: &'static str, action: String },

    // Precondition violations
    /// The robot is not at the location the action refers to
    #[error("Robot is at {current} and cannot {verb} {requested}")]
    NotColocated {
        current: String,
        verb: &'static str,
        requested: String,
    },

    /// The item is not present at the location
    #[error("Item {item} not found at {location}")]
    ItemNotFound { item: String, location: String },

    /// The item is not in the robot's hands
    #[error("Robot is not holding {0}")]
    NotHolding(String),

    /// The location is not part of the environment
    #[error("Unknown location: {0}")]
    UnknownLocation(String),

    /// Anything unexpected raised while applying an action
    #[error("Internal error: {0}")]
    Internal(String),

    // Catalog and export errors
    /// The seed catalog is inconsistent
    #[error("Catalog error: {0}")]
    Catalog(String),

    /// A wrapper around standard IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A wrapper around serde_json serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// A wrapper around TOML deserialization errors
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl EsmError {
    /// Returns `true` for errors caused by the action text itself rather than
    /// by the state of the world.
    pub fn is_parse_error(&self) -> bool {
        matches!(
            self,
            EsmError::UnrecognizedAction(_)
                | EsmError::MalformedAction { .. }
                | EsmError::GoalMarkerMissing
                | EsmError::GoalLiteral { .. }
                | EsmError::GoalShape(_)
        )
    }

    /// Returns `true` for refusals where the action was understood but the
    /// world does not allow it.
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            EsmError::NotColocated { .. }
                | EsmError::ItemNotFound { .. }
                | EsmError::NotHolding(_)
                | EsmError::UnknownLocation(_)
        )
    }
}

/// Result type alias for state manager operations.
pub type Result<T> = std::result::Result<T, EsmError>;
