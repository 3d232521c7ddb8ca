mod abilities;
mod players;
mod replay;
mod voting;

use chrono::{DateTime, Utc};
use database::SessionRecord;
use types::{GamePhase, PhaseKind, RoleCardTemplate, UserId};

use crate::{
    actions::ActionLedger,
    config::{GameConfig, GameSetup, Rules},
    error::GameError,
    events::GameEvent,
    history::{Stamp, VoteHistory},
    registry::PlayerRegistry,
    vote::{VoteBook, VoteLedger},
};

pub use abilities::ActionView;
pub use replay::{ReplayReport, TranscriptEntry, TranscriptEvent};

/// Who issued a command, where and when.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Invocation {
    pub author: UserId,
    pub channel: u64,
    pub at: DateTime<Utc>,
    pub message_id: Option<u64>,
    pub privileged: bool,
}

impl Invocation {
    pub fn new(author: UserId, channel: u64, at: DateTime<Utc>) -> Self {
        Self {
            author,
            channel,
            at,
            message_id: None,
            privileged: false,
        }
    }

    pub fn with_message(mut self, message_id: u64) -> Self {
        self.message_id = Some(message_id);
        self
    }

    pub fn as_mod(mut self) -> Self {
        self.privileged = true;
        self
    }

    pub fn stamp(&self) -> Stamp {
        Stamp {
            at: self.at,
            message_id: self.message_id,
        }
    }
}

/// State of one hosted game. Every command validates before it mutates, so a
/// rejected command leaves the session exactly as it was.
#[derive(Clone, Debug)]
pub struct GameSession {
    config: GameConfig,
    rules: Rules,
    phase: GamePhase,
    players: PlayerRegistry,
    roles: Vec<RoleCardTemplate>,
    votes: VoteBook,
    voting_enabled: bool,
    actions: ActionLedger,
    events: Vec<GameEvent>,
}

impl GameSession {
    pub fn new(config: GameConfig, rules: Rules) -> Self {
        Self {
            config,
            rules,
            phase: GamePhase::default(),
            players: PlayerRegistry::new(),
            roles: Vec::new(),
            votes: VoteBook::new(),
            voting_enabled: true,
            actions: ActionLedger::new(),
            events: Vec::new(),
        }
    }

    pub fn from_setup(setup: GameSetup) -> Result<Self, GameError> {
        let mut session = Self::new(setup.config, setup.rules);
        for entry in &setup.players {
            session.players.add(&entry.name, entry.user_id)?;
        }
        session.roles = setup.roles;
        Ok(session)
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn players(&self) -> &PlayerRegistry {
        &self.players
    }

    pub fn roles(&self) -> &[RoleCardTemplate] {
        &self.roles
    }

    pub fn votes(&self) -> &VoteLedger {
        &self.votes.ledger
    }

    pub fn history(&self) -> &VoteHistory {
        &self.votes.history
    }

    pub fn voting_enabled(&self) -> bool {
        self.voting_enabled
    }

    pub fn actions(&self) -> &ActionLedger {
        &self.actions
    }

    /// Hands pending notifications to the caller.
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    fn require_mod(invocation: &Invocation, what: &str) -> Result<(), GameError> {
        if invocation.privileged {
            Ok(())
        } else {
            Err(GameError::PermissionDenied(what.to_string()))
        }
    }

    /// Moves to the next phase: the outgoing votes are snapshotted then
    /// cleared, pending actions use up one shot each and are dropped, and
    /// voting opens for a day or closes for a night.
    pub fn advance_phase(&mut self, invocation: &Invocation) -> Result<GamePhase, GameError> {
        Self::require_mod(invocation, "change the phase")?;
        let old = self.phase;
        let new = old.next();

        let final_tally = self.votes.close_phase(old, new, invocation.stamp());
        self.phase = new;
        self.voting_enabled = new.is_day();
        self.deplete_pending_actions();

        log::info!("Phase changed from {old} to {new}");
        self.emit(GameEvent::PhaseChanged {
            old,
            new,
            final_tally,
            voting_enabled: self.voting_enabled,
        });
        Ok(new)
    }

    /// Overrides the phase without ending the current one. Votes, pending
    /// actions and the voting flag are left alone.
    pub fn set_phase(
        &mut self,
        invocation: &Invocation,
        kind: PhaseKind,
        num: u32,
    ) -> Result<GamePhase, GameError> {
        Self::require_mod(invocation, "set the phase")?;
        let phase = GamePhase::new(kind, num)?;
        self.phase = phase;
        self.votes.record(phase, invocation.stamp());
        log::info!("Phase set to {phase}");
        self.emit(GameEvent::PhaseSet { phase });
        Ok(phase)
    }

    fn deplete_pending_actions(&mut self) {
        for pending in self.actions.drain() {
            let Some(card) = self
                .players
                .slot_mut(&pending.actor)
                .and_then(|p| p.role_card.as_mut())
            else {
                log::warn!("Pending action of {} has no role card to deplete", pending.actor);
                continue;
            };
            card.deplete(&pending.action);
        }
    }

    pub fn to_record(&self, updated_at: DateTime<Utc>) -> Result<SessionRecord, GameError> {
        Ok(SessionRecord {
            config: serde_json::to_value(&self.config)?,
            rules: serde_json::to_value(&self.rules)?,
            phase: serde_json::to_value(self.phase)?,
            voting_enabled: self.voting_enabled,
            votes: serde_json::to_value(&self.votes.ledger)?,
            vote_history: serde_json::to_value(&self.votes.history)?,
            players: serde_json::to_value(self.players.players())?,
            player_slots: serde_json::to_value(self.players.slots())?,
            action_submissions: serde_json::to_value(&self.actions)?,
            roles: serde_json::to_value(&self.roles)?,
            updated_at,
        })
    }

    pub fn from_record(record: SessionRecord) -> Result<Self, GameError> {
        Ok(Self {
            config: serde_json::from_value(record.config)?,
            rules: serde_json::from_value(record.rules)?,
            phase: serde_json::from_value(record.phase)?,
            players: PlayerRegistry::from_parts(
                serde_json::from_value(record.players)?,
                serde_json::from_value(record.player_slots)?,
            ),
            roles: serde_json::from_value(record.roles)?,
            votes: VoteBook::from_parts(
                serde_json::from_value(record.votes)?,
                serde_json::from_value(record.vote_history)?,
            ),
            voting_enabled: record.voting_enabled,
            actions: serde_json::from_value(record.action_submissions)?,
            events: Vec::new(),
        })
    }
}
