use std::{convert::Infallible, fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Alignment {
    Town,
    Mafia,
    #[serde(rename = "3P")]
    ThirdParty,
}

impl Alignment {
    pub fn win_condition(&self) -> &'static str {
        match self {
            Alignment::Town => "You win when all mafia members have been eliminated, and there is at least one town-aligned member alive.",
            Alignment::Mafia => "You win when the mafia make up half of the remaining players alive, or when nothing can prevent this.",
            Alignment::ThirdParty => "You are neither aligned with the town or mafia, and have your own wincon to fulfil.",
        }
    }

    fn prefix(&self) -> &'static str {
        match self {
            Alignment::Town => "town ",
            Alignment::Mafia => "mafia ",
            Alignment::ThirdParty => "3p ",
        }
    }
}

impl Display for Alignment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Alignment::Town => write!(f, "Town"),
            Alignment::Mafia => write!(f, "Mafia"),
            Alignment::ThirdParty => write!(f, "3P"),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub alignment: Option<Alignment>,
    pub name: Option<String>,
}

impl Role {
    pub fn new(alignment: Alignment, name: &str) -> Self {
        Self {
            alignment: Some(alignment),
            name: Some(name.to_string()),
        }
    }
}

impl Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let alignment = self.alignment.map(|a| a.to_string()).unwrap_or_default();
        let name = self.name.as_deref().unwrap_or_default();
        write!(f, "{}", format!("{alignment} {name}").trim())
    }
}

/// Parses `"Town Cop"`, `"mafia Goon"`, `"3P Survivor"`; text without a known
/// alignment prefix becomes an unaligned role label.
impl FromStr for Role {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.to_lowercase();
        let alignment = [Alignment::Town, Alignment::Mafia, Alignment::ThirdParty]
            .into_iter()
            .find(|a| lowered.starts_with(a.prefix()));
        let name = match alignment {
            Some(a) => &s[a.prefix().len()..],
            None => s,
        };
        Ok(Role {
            alignment,
            name: Some(name.to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_alignment_prefix() {
        let role: Role = "Town Cop".parse().unwrap();
        assert_eq!(role, Role::new(Alignment::Town, "Cop"));

        let role: Role = "mafia Goon".parse().unwrap();
        assert_eq!(role, Role::new(Alignment::Mafia, "Goon"));

        let role: Role = "3p Survivor".parse().unwrap();
        assert_eq!(role, Role::new(Alignment::ThirdParty, "Survivor"));
    }

    #[test]
    fn test_parse_without_prefix() {
        let role: Role = "Jester".parse().unwrap();
        assert_eq!(role.alignment, None);
        assert_eq!(role.to_string(), "Jester");
    }

    #[test]
    fn test_display() {
        assert_eq!(Role::new(Alignment::ThirdParty, "Survivor").to_string(), "3P Survivor");
        assert_eq!(Role::default().to_string(), "");
    }
}
