use serde::{Deserialize, Serialize};

use crate::{
    action::{Ability, Action},
    phase::PhaseKind,
    role::Role,
};

/// Setup entry for one slot in the game, shared by every game that uses it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleCardTemplate {
    pub role: Role,
    #[serde(default)]
    pub flips_as: Option<Role>,
    #[serde(default)]
    pub actions: Vec<Action>,
}

impl RoleCardTemplate {
    pub fn describe(&self, player_name: &str) -> String {
        RoleCard::from(self).describe(player_name)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleCard {
    pub role: Option<Role>,
    pub flips_as: Option<Role>,
    pub abilities: Vec<Ability>,
}

impl From<&RoleCardTemplate> for RoleCard {
    fn from(template: &RoleCardTemplate) -> Self {
        Self {
            role: Some(template.role.clone()),
            flips_as: template.flips_as.clone(),
            abilities: template.actions.iter().map(Ability::from).collect(),
        }
    }
}

impl RoleCard {
    /// What is revealed on elimination; falls back to the true role.
    pub fn flips_as(&self) -> Option<&Role> {
        self.flips_as.as_ref().or(self.role.as_ref())
    }

    pub fn ability(&self, name: &str) -> Option<&Ability> {
        self.abilities.iter().find(|a| a.action.matches_name(name))
    }

    pub fn available_abilities(&self, kind: PhaseKind) -> Vec<&Ability> {
        self.abilities
            .iter()
            .filter(|a| a.action.can_use_in_phase(kind))
            .collect()
    }

    /// Uses one shot of the named ability, dropping it from the card once its
    /// uses reach zero. Returns true if the ability was removed.
    pub fn deplete(&mut self, name: &str) -> bool {
        let Some(idx) = self
            .abilities
            .iter()
            .position(|a| a.action.matches_name(name))
        else {
            return false;
        };
        let exhausted = self.abilities[idx].deplete();
        if exhausted {
            let removed = self.abilities.remove(idx);
            log::info!("Ability {} has no uses left", removed.action.name);
        }
        exhausted
    }

    pub fn describe(&self, player_name: &str) -> String {
        let role = self.role.clone().unwrap_or_default();
        let mut body = format!("Welcome, {player_name}! You are a {role}.\n\n");
        if self.abilities.is_empty() {
            body.push_str("You have no abilities; your only power is your voice and your vote.");
        } else {
            let noun = if self.abilities.len() == 1 { "ability" } else { "abilities" };
            body.push_str(&format!("You have the following {noun} at your disposal:\n"));
            let lines: Vec<_> = self.abilities.iter().map(|a| format!("- {a}")).collect();
            body.push_str(&lines.join("\n"));
        }
        if let Some(alignment) = role.alignment {
            body.push_str(&format!("\n\n{}", alignment.win_condition()));
        }
        body
    }

    pub fn format_available_actions(&self, kind: PhaseKind) -> String {
        let available = self.available_abilities(kind);
        if available.is_empty() {
            return "You have no active abilities available this phase.".to_string();
        }
        let lines: Vec<_> = available.iter().map(|a| format!("- {a}")).collect();
        format!(
            "You may use the following actions this phase:\n{}",
            lines.join("\n")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{action::Modifier, role::Alignment};

    fn vigilante() -> RoleCardTemplate {
        RoleCardTemplate {
            role: Role::new(Alignment::Town, "Vigilante"),
            flips_as: None,
            actions: vec![
                Action {
                    shots: Some(1),
                    ..Action::new("Shoot")
                },
                Action {
                    modifiers: vec![Modifier::Day],
                    ..Action::new("Pray")
                },
            ],
        }
    }

    #[test]
    fn test_flips_as_defaults_to_role() {
        let card = RoleCard::from(&vigilante());
        assert_eq!(card.flips_as(), Some(&Role::new(Alignment::Town, "Vigilante")));

        let mut godfather = vigilante();
        godfather.role = Role::new(Alignment::Mafia, "Godfather");
        godfather.flips_as = Some(Role::new(Alignment::Town, "Vanilla"));
        let card = RoleCard::from(&godfather);
        assert_eq!(card.flips_as(), Some(&Role::new(Alignment::Town, "Vanilla")));
    }

    #[test]
    fn test_ability_lookup_is_case_insensitive() {
        let card = RoleCard::from(&vigilante());
        assert!(card.ability("sHoOt").is_some());
        assert!(card.ability("Kill").is_none());
    }

    #[test]
    fn test_cards_from_same_template_are_independent() {
        let template = vigilante();
        let mut first = RoleCard::from(&template);
        let second = RoleCard::from(&template);
        assert!(first.deplete("Shoot"));
        assert!(first.ability("Shoot").is_none());
        assert_eq!(second.ability("Shoot").unwrap().shots_left, Some(1));
    }

    #[test]
    fn test_available_abilities_by_phase() {
        let card = RoleCard::from(&vigilante());
        let day: Vec<_> = card
            .available_abilities(PhaseKind::Day)
            .iter()
            .map(|a| a.action.name.clone())
            .collect();
        let night: Vec<_> = card
            .available_abilities(PhaseKind::Night)
            .iter()
            .map(|a| a.action.name.clone())
            .collect();
        assert_eq!(day, vec!["Pray"]);
        assert_eq!(night, vec!["Shoot"]);
    }

    #[test]
    fn test_describe_includes_win_condition() {
        let text = vigilante().describe("Alice");
        assert!(text.starts_with("Welcome, Alice! You are a Town Vigilante."));
        assert!(text.contains("- [1-SHOT] Shoot"));
        assert!(text.ends_with(Alignment::Town.win_condition()));
    }
}
