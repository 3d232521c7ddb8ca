use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use types::GamePhase;

use crate::{
    history::{Stamp, VoteHistory, VoteSnapshot},
    tally::{tally, TallyEntry},
};

/// Target name used for a vote to end the day without an elimination.
pub const NO_ELIMINATION: &str = "Sleep / No Elim";

/// Current votes: target name to voters in the order they voted.
///
/// A voter appears under at most one target. Targets whose last voter left
/// are dropped from the map.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VoteLedger {
    votes: BTreeMap<String, Vec<String>>,
}

impl VoteLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Vec<String>)> {
        self.votes.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.votes.is_empty()
    }

    pub fn voters(&self, target: &str) -> &[String] {
        self.votes.get(target).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn target_of(&self, voter: &str) -> Option<&str> {
        self.votes
            .iter()
            .find(|(_, voters)| voters.iter().any(|v| v == voter))
            .map(|(target, _)| target.as_str())
    }

    /// Moves `voter`'s single vote onto `target`.
    pub fn cast(&mut self, voter: &str, target: &str) {
        self.retract(voter);
        self.votes
            .entry(target.to_string())
            .or_default()
            .push(voter.to_string());
    }

    /// Drops `voter`'s vote, returning the target it was on.
    pub fn retract(&mut self, voter: &str) -> Option<String> {
        let target = self.target_of(voter)?.to_string();
        if let Some(voters) = self.votes.get_mut(&target) {
            voters.retain(|v| v != voter);
            if voters.is_empty() {
                self.votes.remove(&target);
            }
        }
        Some(target)
    }

    pub fn clear(&mut self) {
        self.votes.clear();
    }
}

/// The live ledger together with its snapshot history.
///
/// Live commands and transcript replay both go through these methods, so the
/// two paths record the same snapshots for the same events.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteBook {
    pub ledger: VoteLedger,
    pub history: VoteHistory,
}

impl VoteBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_parts(ledger: VoteLedger, history: VoteHistory) -> Self {
        Self { ledger, history }
    }

    pub fn cast(&mut self, voter: &str, target: &str, phase: GamePhase, stamp: Stamp) {
        self.ledger.cast(voter, target);
        log::debug!("{voter} voted for {target} in {phase}");
        self.record(phase, stamp);
    }

    pub fn retract(&mut self, voter: &str, phase: GamePhase, stamp: Stamp) -> Option<String> {
        let previous = self.ledger.retract(voter);
        log::debug!("{voter} unvoted ({previous:?}) in {phase}");
        self.record(phase, stamp);
        previous
    }

    pub fn clear(&mut self, phase: GamePhase, stamp: Stamp) {
        self.ledger.clear();
        self.record(phase, stamp);
    }

    /// Appends a copy of the current ledger to the history.
    pub fn record(&mut self, phase: GamePhase, stamp: Stamp) {
        self.history.push(VoteSnapshot {
            time: stamp.at,
            votes: self.ledger.clone(),
            phase,
            message_id: stamp.message_id,
        });
    }

    /// Ends `old`: snapshots its final votes, clears the ledger and records an
    /// empty snapshot for `new`. Returns the final tally of `old`.
    pub fn close_phase(&mut self, old: GamePhase, new: GamePhase, stamp: Stamp) -> Vec<TallyEntry> {
        let final_tally = tally(&self.ledger);
        self.record(old, stamp);
        self.ledger.clear();
        self.record(new, stamp);
        final_tally
    }
}
