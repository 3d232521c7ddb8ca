use database::DatabaseError;
use thiserror::Error;
use types::{ParseError, PhaseKind};

#[derive(Error, Debug)]
pub enum GameError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    State(String),

    #[error(transparent)]
    Vote(#[from] VoteError),

    #[error(transparent)]
    Action(#[from] ActionError),

    #[error("{0}")]
    NotFound(String),

    #[error("Only mods can {0}!")]
    PermissionDenied(String),

    #[error("Persistence error: {0}")]
    Persistence(#[from] DatabaseError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<ParseError> for GameError {
    fn from(err: ParseError) -> Self {
        GameError::Validation(err.to_string())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VoteError {
    #[error("Voting is currently disabled!")]
    Disabled,

    #[error("Votes can only be submitted in channel {0}!")]
    WrongChannel(u64),

    #[error("Only (alive) players are allowed to vote!")]
    InvalidVoter,

    #[error("The player you have selected is not a valid vote target!")]
    InvalidTarget,

    #[error("Sleep / no elim is not an option in this game!")]
    SleepDisabled,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ActionError {
    #[error("Only (alive) players can submit actions!")]
    InvalidActor,

    #[error("An action must be provided!")]
    MissingAction,

    #[error("No rolecard found! Cannot submit actions.")]
    NoRoleCard,

    #[error("Action '{0}' not found!")]
    UnknownAction(String),

    #[error("Action '{action}' cannot be used in {phase} phase!")]
    WrongPhase { action: String, phase: PhaseKind },

    #[error("Action {action} requires {expected} targets, but {given} were given!")]
    TargetCount {
        action: String,
        expected: usize,
        given: usize,
    },

    #[error("Action target '{0}' cannot be found!")]
    UnknownTarget(String),

    #[error("Action target '{0}' is not alive! You can only target alive players.")]
    DeadTarget(String),

    #[error("You cannot target yourself with this action!")]
    SelfTarget,
}
