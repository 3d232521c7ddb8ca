use std::fmt::Display;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::phase::PhaseKind;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Modifier {
    Factional,
    Lightning,
    Passive,
    Day,
}

impl Display for Modifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Modifier::Factional => write!(f, "FACTIONAL"),
            Modifier::Lightning => write!(f, "LIGHTNING"),
            Modifier::Passive => write!(f, "PASSIVE"),
            Modifier::Day => write!(f, "DAY"),
        }
    }
}

/// Effects that fire synchronously when an action carrying them is submitted.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SideEffect {
    #[serde(rename = "Pew Pew")]
    PewPew,
}

/// Immutable catalog entry for an ability. Remaining uses live on [`Ability`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    pub name: String,
    #[serde(default)]
    pub desc: String,
    #[serde(default)]
    pub modifiers: Vec<Modifier>,
    #[serde(default)]
    pub shots: Option<u32>,
    #[serde(default = "default_targets")]
    pub targets: usize,
    #[serde(default)]
    pub self_targetable: bool,
    #[serde(default)]
    pub side_effects: Vec<SideEffect>,
}

fn default_targets() -> usize {
    1
}

impl Action {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            desc: String::new(),
            modifiers: Vec::new(),
            shots: None,
            targets: default_targets(),
            self_targetable: false,
            side_effects: Vec::new(),
        }
    }

    pub fn has(&self, modifier: Modifier) -> bool {
        self.modifiers.contains(&modifier)
    }

    pub fn is_lightning(&self) -> bool {
        self.has(Modifier::Lightning)
    }

    /// Day allows DAY or LIGHTNING actions, night allows anything not tagged
    /// DAY; PASSIVE actions are never submitted.
    pub fn can_use_in_phase(&self, kind: PhaseKind) -> bool {
        if self.has(Modifier::Passive) {
            return false;
        }
        match kind {
            PhaseKind::Day => self.has(Modifier::Day) || self.has(Modifier::Lightning),
            PhaseKind::Night => !self.has(Modifier::Day),
        }
    }

    pub fn matches_name(&self, name: &str) -> bool {
        self.name.to_lowercase() == name.to_lowercase()
    }
}

/// A player's own copy of an [`Action`], carrying the uses left.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ability {
    pub action: Action,
    pub shots_left: Option<u32>,
}

impl Ability {
    pub fn is_depletable(&self) -> bool {
        self.shots_left.is_some()
    }

    /// Uses up one shot. Returns true once the ability has no uses left.
    pub fn deplete(&mut self) -> bool {
        match self.shots_left.as_mut() {
            Some(shots) => {
                *shots = shots.saturating_sub(1);
                *shots == 0
            }
            None => false,
        }
    }
}

impl From<&Action> for Ability {
    fn from(action: &Action) -> Self {
        Self {
            action: action.clone(),
            shots_left: action.shots,
        }
    }
}

impl Display for Ability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut tags = self
            .action
            .modifiers
            .iter()
            .map(|m| format!("[{m}]"))
            .join("");
        if let Some(shots) = self.shots_left {
            tags.push_str(&format!("[{shots}-SHOT]"));
        }
        let sep = if tags.is_empty() { "" } else { " " };
        write!(f, "{tags}{sep}{}: {}", self.action.name, self.action.desc)
    }
}
