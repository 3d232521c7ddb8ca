use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use types::{GamePhase, Role, RoleCard};

use crate::tally::TallyEntry;

/// Notifications for the announcement layer, drained per session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event")]
pub enum GameEvent {
    VoteRecorded {
        phase: GamePhase,
        tally: Vec<TallyEntry>,
        at: DateTime<Utc>,
    },
    PhaseChanged {
        old: GamePhase,
        new: GamePhase,
        final_tally: Vec<TallyEntry>,
        voting_enabled: bool,
    },
    PhaseSet {
        phase: GamePhase,
    },
    ActionQueued {
        phase: GamePhase,
        summary: String,
    },
    LightningAction {
        actor: String,
        action: String,
        targets: Vec<String>,
    },
    ShotFired {
        /// Only set when the shooter was revealed.
        shooter: Option<String>,
        target: String,
        flipped: Option<Role>,
    },
    RolesAssigned {
        assignments: Vec<(String, RoleCard)>,
    },
}
