use std::fmt::Display;

use chrono::{DateTime, Utc};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use types::GamePhase;

use crate::vote::VoteLedger;

pub const NO_VOTES: &str = "No votes yet!";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TallyEntry {
    pub target: String,
    pub count: usize,
    pub voters: Vec<String>,
}

impl Display for TallyEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({}): {}", self.target, self.count, self.voters.join(", "))
    }
}

/// Ranks targets by vote count, most votes first.
///
/// Ties are broken by target name in reverse lexicographic order. This is the
/// order the bot has always produced and players compare counts against it,
/// so it is kept as is.
pub fn tally(votes: &VoteLedger) -> Vec<TallyEntry> {
    votes
        .iter()
        .filter(|(_, voters)| !voters.is_empty())
        .map(|(target, voters)| TallyEntry {
            target: target.to_string(),
            count: voters.len(),
            voters: voters.to_vec(),
        })
        .sorted_by(|a, b| b.count.cmp(&a.count).then_with(|| b.target.cmp(&a.target)))
        .collect()
}

pub fn render(entries: &[TallyEntry]) -> String {
    if entries.is_empty() {
        return NO_VOTES.to_string();
    }
    entries.iter().map(|entry| entry.to_string()).join("\n")
}

/// A ranked count together with the phase it belongs to.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TallyView {
    pub phase: GamePhase,
    pub entries: Vec<TallyEntry>,
    pub as_of: Option<DateTime<Utc>>,
}

impl TallyView {
    pub fn new(phase: GamePhase, votes: &VoteLedger, as_of: Option<DateTime<Utc>>) -> Self {
        Self {
            phase,
            entries: tally(votes),
            as_of,
        }
    }

    pub fn render(&self) -> String {
        render(&self.entries)
    }
}

impl Display for TallyView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Vote Count ({}):\n{}", self.phase, self.render())
    }
}
