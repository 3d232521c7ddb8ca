use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::{action::Ability, error::ParseError, role::Role, role_card::RoleCard};

/// Host-platform identity of a player (e.g. a chat user id).
pub type UserId = u64;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Player {
    pub name: String,
    pub user_id: UserId,
    pub alive: bool,
    pub role_card: Option<RoleCard>,
}

impl Player {
    pub fn new(name: &str, user_id: UserId) -> Result<Self, ParseError> {
        if name.is_empty() || !name.chars().all(char::is_alphanumeric) {
            return Err(ParseError::PlayerName(name.to_string()));
        }
        Ok(Self {
            name: name.to_string(),
            user_id,
            alive: true,
            role_card: None,
        })
    }

    pub fn is_named(&self, name: &str) -> bool {
        self.name.to_lowercase() == name.to_lowercase()
    }

    pub fn role(&self) -> Option<&Role> {
        self.role_card.as_ref().and_then(|rc| rc.role.as_ref())
    }

    pub fn flips_as(&self) -> Option<&Role> {
        self.role_card.as_ref().and_then(|rc| rc.flips_as())
    }

    pub fn abilities(&self) -> &[Ability] {
        self.role_card
            .as_ref()
            .map(|rc| rc.abilities.as_slice())
            .unwrap_or_default()
    }
}

impl Display for Player {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl PartialEq for Player {
    fn eq(&self, other: &Self) -> bool {
        self.user_id == other.user_id
    }
}
