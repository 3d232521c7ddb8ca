use std::{fmt::Display, str::FromStr, sync::OnceLock};

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::ParseError;

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PhaseKind {
    Day,
    Night,
}

impl Display for PhaseKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PhaseKind::Day => write!(f, "Day"),
            PhaseKind::Night => write!(f, "Night"),
        }
    }
}

/// A point in the day/night cycle.
///
/// Field order matters: the derived `Ord` compares the cycle number first and
/// the kind second, giving `Day(n) < Night(n) < Day(n + 1)`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GamePhase {
    pub num: u32,
    pub kind: PhaseKind,
}

/// Highest cycle number a host may set; matches the two-digit shorthand.
pub const MAX_CYCLE: u32 = 99;

impl GamePhase {
    /// Builds a phase for an explicit override; cycle numbers run from 1 to
    /// [`MAX_CYCLE`].
    pub fn new(kind: PhaseKind, num: u32) -> Result<Self, ParseError> {
        if !(1..=MAX_CYCLE).contains(&num) {
            return Err(ParseError::PhaseNumber(num));
        }
        Ok(Self { num, kind })
    }

    pub fn day(num: u32) -> Self {
        Self {
            num,
            kind: PhaseKind::Day,
        }
    }

    pub fn night(num: u32) -> Self {
        Self {
            num,
            kind: PhaseKind::Night,
        }
    }

    /// The phase after this one. Saturates at `u32::MAX` rather than wrapping
    /// back to cycle 0.
    pub fn next(self) -> Self {
        match self.kind {
            PhaseKind::Day => GamePhase::night(self.num),
            PhaseKind::Night => GamePhase::day(self.num.saturating_add(1)),
        }
    }

    pub fn is_day(&self) -> bool {
        self.kind == PhaseKind::Day
    }
}

impl Default for GamePhase {
    fn default() -> Self {
        GamePhase::day(1)
    }
}

impl Display for GamePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.kind, self.num)
    }
}

fn phase_regex() -> &'static Regex {
    static PHASE_RE: OnceLock<Regex> = OnceLock::new();
    PHASE_RE.get_or_init(|| {
        Regex::new(r"^(?<kind>d|day|n|night) ?(?<num>\d{1,2})$").expect("Valid phase regex")
    })
}

/// Accepts the host shorthand: `d1`, `n 2`, `Day 5`, `night 3`.
impl FromStr for GamePhase {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let input = s.trim().to_lowercase();
        let captures = phase_regex()
            .captures(&input)
            .ok_or_else(|| ParseError::Phase(s.to_string()))?;
        let kind = if captures["kind"].starts_with('d') {
            PhaseKind::Day
        } else {
            PhaseKind::Night
        };
        let num: u32 = captures["num"]
            .parse()
            .map_err(|_| ParseError::Phase(s.to_string()))?;
        GamePhase::new(kind, num)
    }
}
