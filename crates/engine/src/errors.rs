use std::fmt;

/// Turn/state-class failures the state machine can return from `apply`.
/// Resource- and protocol-class errors (`game_not_found`, `invalid_format`,
/// ...) live above the engine, in `gameroom`/`hosting`, since they concern
/// messages the engine never sees.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    NotYourTurn,
    InvalidAction(String),
    ActionFailed(String),
}

impl EngineError {
    /// The wire error code from the external-interfaces table.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotYourTurn => "not_your_turn",
            Self::InvalidAction(_) => "invalid_action",
            Self::ActionFailed(_) => "action_failed",
        }
    }
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::NotYourTurn => write!(f, "not your turn"),
            Self::InvalidAction(reason) => write!(f, "invalid action: {reason}"),
            Self::ActionFailed(reason) => write!(f, "action failed: {reason}"),
        }
    }
}

impl std::error::Error for EngineError {}
