use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use types::GamePhase;

use crate::vote::VoteLedger;

/// When a command arrived, and which host message carried it.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stamp {
    pub at: DateTime<Utc>,
    pub message_id: Option<u64>,
}

impl Stamp {
    pub fn at(at: DateTime<Utc>) -> Self {
        Self {
            at,
            message_id: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteSnapshot {
    pub time: DateTime<Utc>,
    pub votes: VoteLedger,
    pub phase: GamePhase,
    #[serde(default)]
    pub message_id: Option<u64>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum HistoryQuery {
    At(DateTime<Utc>),
    Message(u64),
}

/// Append-only, time-ordered list of full ledger copies.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VoteHistory {
    snapshots: Vec<VoteSnapshot>,
}

impl VoteHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn snapshots(&self) -> &[VoteSnapshot] {
        &self.snapshots
    }

    pub fn latest(&self) -> Option<&VoteSnapshot> {
        self.snapshots.last()
    }

    /// Appends a snapshot. A timestamp older than the newest snapshot is
    /// clamped up to it so lookups can binary search.
    pub fn push(&mut self, mut snapshot: VoteSnapshot) {
        if let Some(latest) = self.snapshots.last() {
            if snapshot.time < latest.time {
                log::warn!(
                    "Snapshot at {} is older than the latest at {}; clamping",
                    snapshot.time,
                    latest.time
                );
                snapshot.time = latest.time;
            }
        }
        self.snapshots.push(snapshot);
    }

    /// The last snapshot recorded at or before `time`.
    pub fn at(&self, time: DateTime<Utc>) -> Option<&VoteSnapshot> {
        let idx = self.snapshots.partition_point(|s| s.time <= time);
        idx.checked_sub(1).map(|i| &self.snapshots[i])
    }

    /// The state left behind by the given host message.
    pub fn by_message(&self, message_id: u64) -> Option<&VoteSnapshot> {
        self.snapshots
            .iter()
            .rev()
            .find(|s| s.message_id == Some(message_id))
    }
}
