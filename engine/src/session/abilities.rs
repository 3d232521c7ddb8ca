use std::fmt::Display;

use rand::Rng;
use types::{Ability, GamePhase, SideEffect};

use crate::{
    actions::{PendingAction, Submission},
    error::{ActionError, GameError},
    events::GameEvent,
};

use super::{GameSession, Invocation};

/// What a player may do this phase and what they have already queued.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActionView {
    pub phase: GamePhase,
    pub available: Vec<Ability>,
    pub pending: Option<PendingAction>,
}

impl Display for ActionView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.available.is_empty() {
            write!(f, "You have no active abilities available this phase.")?;
        } else {
            writeln!(f, "You may use the following actions this phase:")?;
            let lines: Vec<_> = self.available.iter().map(|a| format!("- {a}")).collect();
            write!(f, "{}", lines.join("\n"))?;
        }
        match &self.pending {
            Some(pending) => write!(f, "\n\nCurrently submitted: {pending}"),
            None => write!(f, "\n\nNo action submitted for {}.", self.phase),
        }
    }
}

impl GameSession {
    /// Validates a submission without touching any state.
    fn check_submission<T: AsRef<str>>(
        &self,
        invocation: &Invocation,
        action_name: &str,
        targets: &[T],
    ) -> Result<(PendingAction, Ability), ActionError> {
        let actor = self
            .players
            .by_id(invocation.author)
            .filter(|p| p.alive)
            .ok_or(ActionError::InvalidActor)?;
        if action_name.trim().is_empty() {
            return Err(ActionError::MissingAction);
        }
        let card = actor.role_card.as_ref().ok_or(ActionError::NoRoleCard)?;
        let ability = card
            .ability(action_name)
            .ok_or_else(|| ActionError::UnknownAction(action_name.to_string()))?;
        let action = &ability.action;

        if !action.can_use_in_phase(self.phase.kind) {
            return Err(ActionError::WrongPhase {
                action: action.name.clone(),
                phase: self.phase.kind,
            });
        }
        if targets.len() != action.targets {
            return Err(ActionError::TargetCount {
                action: action.name.clone(),
                expected: action.targets,
                given: targets.len(),
            });
        }

        let mut resolved = Vec::with_capacity(targets.len());
        for target in targets {
            let target = target.as_ref();
            let player = self
                .players
                .by_name(target)
                .ok_or_else(|| ActionError::UnknownTarget(target.to_string()))?;
            if !player.alive {
                return Err(ActionError::DeadTarget(player.name.clone()));
            }
            if player.user_id == actor.user_id && !action.self_targetable {
                return Err(ActionError::SelfTarget);
            }
            resolved.push(player.name.clone());
        }

        let pending = PendingAction {
            actor: actor.name.clone(),
            action: action.name.clone(),
            targets: resolved,
        };
        Ok((pending, ability.clone()))
    }

    /// Submits an ability use for the current phase.
    ///
    /// Side effects fire first, in the order the action lists them. Lightning
    /// actions then resolve on the spot and use up a shot immediately; any
    /// other action replaces the actor's earlier submission for the phase.
    pub fn submit_action<T, R>(
        &mut self,
        invocation: &Invocation,
        action_name: &str,
        targets: &[T],
        rng: &mut R,
    ) -> Result<Submission, GameError>
    where
        T: AsRef<str>,
        R: Rng + ?Sized,
    {
        let (pending, ability) = self.check_submission(invocation, action_name, targets)?;

        for effect in &ability.action.side_effects {
            self.fire_side_effect(*effect, &pending, rng)?;
        }

        if ability.action.is_lightning() {
            if let Some(card) = self
                .players
                .by_id_mut(invocation.author)
                .and_then(|p| p.role_card.as_mut())
            {
                card.deplete(&pending.action);
            }
            log::info!("{pending} (lightning)");
            self.emit(GameEvent::LightningAction {
                actor: pending.actor.clone(),
                action: pending.action.clone(),
                targets: pending.targets.clone(),
            });
            return Ok(Submission::Resolved(pending));
        }

        if let Some(replaced) = self.actions.submit(pending.clone()) {
            log::debug!("Replaced earlier submission: {replaced}");
        }
        log::info!("{pending}");
        self.emit(GameEvent::ActionQueued {
            phase: self.phase,
            summary: self.actions.summary(),
        });
        Ok(Submission::Queued(pending))
    }

    fn fire_side_effect<R: Rng + ?Sized>(
        &mut self,
        effect: SideEffect,
        pending: &PendingAction,
        rng: &mut R,
    ) -> Result<(), GameError> {
        match effect {
            SideEffect::PewPew => {
                let Some(target) = pending.targets.first() else {
                    return Ok(());
                };
                let victim = self.players.kill(target)?;
                let flipped = victim.flips_as().cloned();
                let target = victim.name.clone();
                let shooter = rng.gen_bool(0.5).then(|| pending.actor.clone());
                log::info!("{} shot {target}", pending.actor);
                self.emit(GameEvent::ShotFired {
                    shooter,
                    target,
                    flipped,
                });
            }
        }
        Ok(())
    }

    /// The caller's own actions, or a named player's when a mod asks.
    pub fn view_actions(
        &self,
        invocation: &Invocation,
        player: Option<&str>,
    ) -> Result<ActionView, GameError> {
        let player = match player {
            Some(name) => {
                Self::require_mod(invocation, "view another player's actions")?;
                self.players
                    .by_name(name)
                    .ok_or_else(|| GameError::NotFound(format!("{name} is not a valid player!")))?
            }
            None => self
                .players
                .by_id(invocation.author)
                .ok_or(ActionError::InvalidActor)?,
        };
        let card = player.role_card.as_ref().ok_or(ActionError::NoRoleCard)?;
        Ok(ActionView {
            phase: self.phase,
            available: card
                .available_abilities(self.phase.kind)
                .into_iter()
                .cloned()
                .collect(),
            pending: self.actions.get(&player.name).cloned(),
        })
    }

    /// Rolling summary of everything queued this phase.
    pub fn list_actions(&self, invocation: &Invocation) -> Result<String, GameError> {
        Self::require_mod(invocation, "list actions")?;
        log::debug!("{} pending actions in {}", self.actions.len(), self.phase);
        Ok(self.actions.summary())
    }

    /// Drops every pending submission without using up any shots.
    pub fn clear_actions(&mut self, invocation: &Invocation) -> Result<(), GameError> {
        Self::require_mod(invocation, "clear actions")?;
        let dropped = self.actions.drain();
        log::info!("Cleared {} pending actions", dropped.len());
        Ok(())
    }
}
