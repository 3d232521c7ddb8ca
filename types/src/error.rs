use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Invalid phase given: '{0}' (examples: d1, Night 2, Day 5)")]
    Phase(String),

    #[error("Phase number must be between 1 and 99, got {0}")]
    PhaseNumber(u32),

    #[error("Invalid player name '{0}': names must be alphanumeric")]
    PlayerName(String),
}
