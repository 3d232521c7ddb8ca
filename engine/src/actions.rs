use std::fmt::Display;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

/// One queued ability use for the current phase.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingAction {
    pub actor: String,
    pub action: String,
    pub targets: Vec<String>,
}

impl Display for PendingAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} uses **{}**", self.actor, self.action)?;
        if !self.targets.is_empty() {
            write!(f, " on {}", self.targets.join(", "))?;
        }
        Ok(())
    }
}

/// What happened to an accepted submission.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Submission {
    /// Stored until the phase ends.
    Queued(PendingAction),
    /// Lightning action, resolved on the spot and never stored.
    Resolved(PendingAction),
}

impl Submission {
    pub fn pending(&self) -> &PendingAction {
        match self {
            Submission::Queued(p) | Submission::Resolved(p) => p,
        }
    }
}

/// Pending submissions of the current phase, at most one per actor.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActionLedger {
    pending: Vec<PendingAction>,
}

impl ActionLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PendingAction> {
        self.pending.iter()
    }

    pub fn get(&self, actor: &str) -> Option<&PendingAction> {
        self.pending.iter().find(|p| p.actor == actor)
    }

    /// Stores `action`, replacing the actor's earlier submission in place.
    /// Returns the replaced submission.
    pub fn submit(&mut self, action: PendingAction) -> Option<PendingAction> {
        match self.pending.iter_mut().find(|p| p.actor == action.actor) {
            Some(existing) => Some(std::mem::replace(existing, action)),
            None => {
                self.pending.push(action);
                None
            }
        }
    }

    /// Empties the ledger, handing back what was pending.
    pub fn drain(&mut self) -> Vec<PendingAction> {
        std::mem::take(&mut self.pending)
    }

    pub fn summary(&self) -> String {
        self.pending.iter().map(|p| p.to_string()).join("\n")
    }
}
