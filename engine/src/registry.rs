use std::collections::BTreeMap;

use rand::{seq::SliceRandom, Rng};
use serde::{Deserialize, Serialize};
use types::{Player, Role, RoleCard, RoleCardTemplate, UserId};

use crate::error::GameError;

/// Players of one session, addressable by host identity or display name.
///
/// The slot map remembers every display name a slot has ever had, so votes
/// recorded under a substituted-out name still resolve to the slot.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct PlayerRegistry {
    players: Vec<Player>,
    slots: BTreeMap<String, UserId>,
}

impl PlayerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_parts(players: Vec<Player>, slots: BTreeMap<String, UserId>) -> Self {
        Self { players, slots }
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn slots(&self) -> &BTreeMap<String, UserId> {
        &self.slots
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn by_name(&self, name: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.is_named(name))
    }

    pub fn by_name_mut(&mut self, name: &str) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.is_named(name))
    }

    pub fn by_id(&self, user_id: UserId) -> Option<&Player> {
        self.players.iter().find(|p| p.user_id == user_id)
    }

    pub fn by_id_mut(&mut self, user_id: UserId) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.user_id == user_id)
    }

    /// Like [`by_name`](Self::by_name) but unknown names are an error.
    pub fn require(&self, name: &str) -> Result<&Player, GameError> {
        self.by_name(name)
            .ok_or_else(|| GameError::NotFound(format!("Player with name: {name} cannot be found!")))
    }

    fn require_mut(&mut self, name: &str) -> Result<&mut Player, GameError> {
        self.by_name_mut(name)
            .ok_or_else(|| GameError::NotFound(format!("Player with name: {name} cannot be found!")))
    }

    /// Resolves any current or former display name to its slot's occupant.
    pub fn slot(&self, name: &str) -> Option<&Player> {
        self.slots.get(name).and_then(|&id| self.by_id(id))
    }

    pub fn slot_mut(&mut self, name: &str) -> Option<&mut Player> {
        let id = *self.slots.get(name)?;
        self.players.iter_mut().find(|p| p.user_id == id)
    }

    pub fn alive(&self) -> impl Iterator<Item = &Player> {
        self.players.iter().filter(|p| p.alive)
    }

    pub fn dead(&self) -> impl Iterator<Item = &Player> {
        self.players.iter().filter(|p| !p.alive)
    }

    fn check_unused(&self, name: &str, user_id: UserId) -> Result<(), GameError> {
        if self.by_name(name).is_some() {
            return Err(GameError::State(format!(
                "{name} has already been added as a player!"
            )));
        }
        if self.by_id(user_id).is_some() {
            return Err(GameError::State(format!(
                "User {user_id} has already been added as a player!"
            )));
        }
        Ok(())
    }

    pub fn add(&mut self, name: &str, user_id: UserId) -> Result<&Player, GameError> {
        let player = Player::new(name, user_id)?;
        self.check_unused(name, user_id)?;
        self.slots.insert(player.name.clone(), user_id);
        self.players.push(player);
        log::info!("Added player {name} ({user_id})");
        Ok(&self.players[self.players.len() - 1])
    }

    /// Hands an existing slot to a new person, keeping its role and status.
    pub fn substitute(
        &mut self,
        old_name: &str,
        new_name: &str,
        new_user_id: UserId,
    ) -> Result<&Player, GameError> {
        Player::new(new_name, new_user_id)?;
        let old_id = self
            .by_name(old_name)
            .map(|p| p.user_id)
            .ok_or_else(|| {
                GameError::NotFound(format!(
                    "Cannot find player '{old_name}' to sub out; make sure the name is correct!"
                ))
            })?;
        self.check_unused(new_name, new_user_id)?;

        for id in self.slots.values_mut().filter(|id| **id == old_id) {
            *id = new_user_id;
        }
        self.slots.insert(new_name.to_string(), new_user_id);
        let slot = self.require_mut(old_name)?;
        slot.name = new_name.to_string();
        slot.user_id = new_user_id;
        log::info!("Subbed {old_name} out for {new_name} ({new_user_id})");
        Ok(slot)
    }

    pub fn set_alive(&mut self, name: &str, alive: bool) -> Result<&Player, GameError> {
        let player = self.require_mut(name)?;
        player.alive = alive;
        log::info!("{} is now {}", player.name, if alive { "alive" } else { "dead" });
        Ok(player)
    }

    pub fn kill(&mut self, name: &str) -> Result<&Player, GameError> {
        self.set_alive(name, false)
    }

    pub fn set_flips_as(&mut self, name: &str, role: Role) -> Result<&Player, GameError> {
        let player = self.require_mut(name)?;
        player
            .role_card
            .get_or_insert_with(RoleCard::default)
            .flips_as = Some(role);
        Ok(player)
    }

    pub fn delete(&mut self, name: &str) -> Result<Player, GameError> {
        let idx = self
            .players
            .iter()
            .position(|p| p.is_named(name))
            .ok_or_else(|| GameError::NotFound(format!("Player with name: {name} cannot be found!")))?;
        let removed = self.players.remove(idx);
        log::info!("Deleted player {}", removed.name);
        Ok(removed)
    }

    /// Deals one fresh role card per player in random order and revives
    /// everyone. Returns `(player name, role card)` pairs.
    pub fn assign_roles<R: Rng + ?Sized>(
        &mut self,
        roles: &[RoleCardTemplate],
        rng: &mut R,
    ) -> Result<Vec<(String, RoleCard)>, GameError> {
        if roles.len() != self.players.len() {
            return Err(GameError::State(format!(
                "The number of players ({}) and the number of roles ({}) must be equal!",
                self.players.len(),
                roles.len()
            )));
        }
        let mut order: Vec<usize> = (0..self.players.len()).collect();
        order.shuffle(rng);
        let mut assignments = Vec::with_capacity(roles.len());
        for (template, idx) in roles.iter().zip(order) {
            let player = &mut self.players[idx];
            player.alive = true;
            let card = RoleCard::from(template);
            player.role_card = Some(card.clone());
            assignments.push((player.name.clone(), card));
        }
        log::info!("Assigned {} role cards", assignments.len());
        Ok(assignments)
    }
}
