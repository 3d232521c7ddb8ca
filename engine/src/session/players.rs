use rand::Rng;
use types::{Player, Role, RoleCard, UserId};

use crate::{error::GameError, events::GameEvent};

use super::{GameSession, Invocation};

impl GameSession {
    pub fn add_player(
        &mut self,
        invocation: &Invocation,
        name: &str,
        user_id: UserId,
    ) -> Result<(), GameError> {
        Self::require_mod(invocation, "add players")?;
        self.players.add(name, user_id)?;
        Ok(())
    }

    pub fn substitute_player(
        &mut self,
        invocation: &Invocation,
        old_name: &str,
        new_name: &str,
        new_user_id: UserId,
    ) -> Result<(), GameError> {
        Self::require_mod(invocation, "sub players")?;
        self.players.substitute(old_name, new_name, new_user_id)?;
        Ok(())
    }

    /// Marks a player dead and returns the role they flip as.
    pub fn kill_player(
        &mut self,
        invocation: &Invocation,
        name: &str,
    ) -> Result<Option<Role>, GameError> {
        Self::require_mod(invocation, "kill players")?;
        Ok(self.players.kill(name)?.flips_as().cloned())
    }

    pub fn set_player_alive(
        &mut self,
        invocation: &Invocation,
        name: &str,
        alive: bool,
    ) -> Result<(), GameError> {
        Self::require_mod(invocation, "change player status")?;
        self.players.set_alive(name, alive)?;
        Ok(())
    }

    /// `role` uses the setup shorthand, e.g. `"Town Vanilla"`.
    pub fn set_flips_as(
        &mut self,
        invocation: &Invocation,
        name: &str,
        role: &str,
    ) -> Result<(), GameError> {
        Self::require_mod(invocation, "set flips")?;
        let role = role.parse::<Role>().unwrap_or_default();
        self.players.set_flips_as(name, role)?;
        Ok(())
    }

    pub fn delete_player(&mut self, invocation: &Invocation, name: &str) -> Result<Player, GameError> {
        Self::require_mod(invocation, "delete players")?;
        self.players.delete(name)
    }

    /// Deals the session's role cards at random. A dry run assigns the cards
    /// but sends no notification.
    pub fn assign_roles<R: Rng + ?Sized>(
        &mut self,
        invocation: &Invocation,
        rng: &mut R,
        dry_run: bool,
    ) -> Result<Vec<(String, RoleCard)>, GameError> {
        Self::require_mod(invocation, "assign roles")?;
        let assignments = self.players.assign_roles(&self.roles, rng)?;
        if !dry_run {
            self.emit(GameEvent::RolesAssigned {
                assignments: assignments.clone(),
            });
        }
        Ok(assignments)
    }

    /// Role cards of the setup as a player would receive them. Open to
    /// everyone in an open setup, mods only otherwise.
    pub fn list_roles(&self, invocation: &Invocation) -> Result<Vec<String>, GameError> {
        if !self.rules.open_setup {
            Self::require_mod(invocation, "list roles in a closed setup")?;
        }
        if self.roles.is_empty() {
            return Err(GameError::NotFound("No roles found!".to_string()));
        }
        Ok(self
            .roles
            .iter()
            .map(|template| template.describe("PLAYER"))
            .collect())
    }

    /// Alive players first, then dead ones.
    pub fn list_players(&self) -> (Vec<&Player>, Vec<&Player>) {
        (self.players.alive().collect(), self.players.dead().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::{by, by_mod, session};
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};
    use types::Alignment;

    #[test]
    fn test_player_commands_require_mod() {
        let mut session = session();
        assert!(matches!(
            session.add_player(&by(1, 0), "Erin", 5),
            Err(GameError::PermissionDenied(_))
        ));
        assert!(session.kill_player(&by(1, 0), "Bob").is_err());
        assert_eq!(session.players().len(), 4);
    }

    #[test]
    fn test_kill_reveals_flip() {
        let mut session = session();
        let flipped = session.kill_player(&by_mod(0), "bob").unwrap();
        assert_eq!(flipped, Some(Role::new(Alignment::Town, "Vanilla")));
        assert_eq!(session.kill_player(&by_mod(0), "Carol").unwrap(), None);

        let (alive, dead) = session.list_players();
        assert_eq!(alive.len(), 2);
        assert_eq!(dead.iter().map(|p| p.name.as_str()).collect::<Vec<_>>(), ["Bob", "Carol"]);

        session.set_player_alive(&by_mod(1), "Bob", true).unwrap();
        assert!(session.players().by_name("Bob").unwrap().alive);
    }

    #[test]
    fn test_substitute_keeps_votes_resolvable() {
        let mut session = session();
        session.cast_vote(&by(1, 1), "Carol").unwrap();
        session.substitute_player(&by_mod(2), "Carol", "Erin", 5).unwrap();

        assert_eq!(session.players().slot("Carol").unwrap().name, "Erin");
        assert_eq!(session.players().by_id(5).unwrap().name, "Erin");
        session.cast_vote(&by(5, 3), "Alice").unwrap();
        assert_eq!(session.votes().target_of("Erin"), Some("Alice"));
    }

    #[test]
    fn test_set_flips_as_parses_shorthand() {
        let mut session = session();
        session.set_flips_as(&by_mod(0), "Dave", "mafia Goon").unwrap();
        assert_eq!(
            session.players().by_name("Dave").unwrap().flips_as(),
            Some(&Role::new(Alignment::Mafia, "Goon"))
        );
    }

    #[test]
    fn test_delete_player() {
        let mut session = session();
        let removed = session.delete_player(&by_mod(0), "Dave").unwrap();
        assert_eq!(removed.user_id, 4);
        assert!(matches!(
            session.delete_player(&by_mod(0), "Dave"),
            Err(GameError::NotFound(_))
        ));
    }

    #[test]
    fn test_list_roles_closed_setup() {
        let session = session();
        let err = session.list_roles(&by(1, 0)).unwrap_err();
        assert!(matches!(err, GameError::PermissionDenied(_)));
        assert_eq!(err.to_string(), "Only mods can list roles in a closed setup!");

        let cards = session.list_roles(&by_mod(0)).unwrap();
        assert_eq!(cards.len(), 2);
        assert!(cards[0].starts_with("Welcome, PLAYER! You are a Town Watcher."));
        assert!(cards[1].contains("- Swap"));
    }

    #[test]
    fn test_list_roles_open_setup() {
        let mut session = session();
        session.rules.open_setup = true;
        assert_eq!(session.list_roles(&by(3, 0)).unwrap().len(), 2);

        session.roles.clear();
        assert!(matches!(
            session.list_roles(&by(3, 0)),
            Err(GameError::NotFound(_))
        ));
    }

    #[test]
    fn test_assign_roles_dry_run() {
        let mut session = session();
        session.delete_player(&by_mod(0), "Carol").unwrap();
        session.delete_player(&by_mod(0), "Dave").unwrap();
        let mut rng = StdRng::seed_from_u64(11);

        let assignments = session.assign_roles(&by_mod(1), &mut rng, true).unwrap();
        assert_eq!(assignments.len(), 2);
        assert!(session.take_events().is_empty());

        session.assign_roles(&by_mod(2), &mut rng, false).unwrap();
        assert!(matches!(
            session.take_events().as_slice(),
            [GameEvent::RolesAssigned { .. }]
        ));
    }
}
