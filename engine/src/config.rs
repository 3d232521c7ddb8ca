use serde::{Deserialize, Serialize};
use types::{RoleCardTemplate, UserId};

/// Host-platform channels a session is wired to.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    pub private_category: u64,
    pub vote_channel: u64,
    pub vc_channel: u64,
    #[serde(default)]
    pub vc_allowed_categories: Vec<u64>,
    #[serde(default)]
    pub announce_channel: Option<u64>,
    #[serde(default)]
    pub actions_channel: Option<u64>,
}

impl GameConfig {
    pub fn new(private_category: u64, vote_channel: u64, vc_channel: u64) -> Self {
        Self {
            private_category,
            vote_channel,
            vc_channel,
            vc_allowed_categories: vec![private_category],
            announce_channel: None,
            actions_channel: None,
        }
    }

    /// Categories where vote counts may be requested; the private category
    /// when none are configured.
    pub fn vote_count_categories(&self) -> Vec<u64> {
        if self.vc_allowed_categories.is_empty() {
            vec![self.private_category]
        } else {
            self.vc_allowed_categories.clone()
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rules {
    #[serde(default = "sleep_enabled_default")]
    pub sleep_enabled: bool,
    #[serde(default)]
    pub open_setup: bool,
}

fn sleep_enabled_default() -> bool {
    true
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            sleep_enabled: true,
            open_setup: false,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerEntry {
    pub name: String,
    pub user_id: UserId,
}

/// A full game setup as written by the host in YAML.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSetup {
    pub config: GameConfig,
    #[serde(default)]
    pub rules: Rules,
    #[serde(default)]
    pub players: Vec<PlayerEntry>,
    #[serde(default)]
    pub roles: Vec<RoleCardTemplate>,
}

impl GameSetup {
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::{Alignment, Modifier};

    const SETUP: &str = r#"
config:
  private_category: 1
  vote_channel: 2
  vc_channel: 3
players:
  - name: Alice
    user_id: 100
  - name: Bob
    user_id: 200
roles:
  - role: { alignment: Town, name: Vigilante }
    actions:
      - name: Shoot
        shots: 1
        side_effects: ["Pew Pew"]
        modifiers: [DAY, LIGHTNING]
  - role: { alignment: Mafia, name: Goon }
    flips_as: { alignment: Town, name: Vanilla }
"#;

    #[test]
    fn test_setup_from_yaml() {
        let setup = GameSetup::from_yaml(SETUP).expect("valid setup");
        assert_eq!(setup.rules, Rules::default());
        assert_eq!(setup.players.len(), 2);
        assert_eq!(setup.roles[0].role.alignment, Some(Alignment::Town));
        assert!(setup.roles[0].actions[0].has(Modifier::Lightning));
        assert_eq!(setup.roles[0].actions[0].targets, 1);
        assert_eq!(
            setup.roles[1].flips_as.as_ref().and_then(|r| r.name.as_deref()),
            Some("Vanilla")
        );
    }

    #[test]
    fn test_vote_count_categories_default() {
        let mut config = GameConfig::new(9, 1, 2);
        assert_eq!(config.vote_count_categories(), vec![9]);
        config.vc_allowed_categories.clear();
        assert_eq!(config.vote_count_categories(), vec![9]);
    }
}
