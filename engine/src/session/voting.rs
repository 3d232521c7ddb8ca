use crate::{
    error::{GameError, VoteError},
    events::GameEvent,
    history::HistoryQuery,
    tally::TallyView,
    vote::{VoteLedger, NO_ELIMINATION},
};

use super::{GameSession, Invocation};

impl GameSession {
    /// Checks shared by every player-issued vote command. Returns the voter's
    /// display name.
    fn check_voter(&self, invocation: &Invocation) -> Result<String, VoteError> {
        if !self.voting_enabled {
            return Err(VoteError::Disabled);
        }
        if invocation.channel != self.config.vote_channel {
            return Err(VoteError::WrongChannel(self.config.vote_channel));
        }
        self.players
            .by_id(invocation.author)
            .filter(|p| p.alive)
            .map(|p| p.name.clone())
            .ok_or(VoteError::InvalidVoter)
    }

    fn vote_recorded(&mut self, invocation: &Invocation) {
        let tally = self.current_tally().entries;
        self.emit(GameEvent::VoteRecorded {
            phase: self.phase,
            tally,
            at: invocation.at,
        });
    }

    pub fn cast_vote(&mut self, invocation: &Invocation, target: &str) -> Result<(), GameError> {
        let voter = self.check_voter(invocation)?;
        let target = self
            .players
            .by_name(target)
            .filter(|p| p.alive)
            .map(|p| p.name.clone())
            .ok_or(VoteError::InvalidTarget)?;

        self.votes
            .cast(&voter, &target, self.phase, invocation.stamp());
        log::info!("{voter} voted for {target}");
        self.vote_recorded(invocation);
        Ok(())
    }

    pub fn sleep_vote(&mut self, invocation: &Invocation) -> Result<(), GameError> {
        let voter = self.check_voter(invocation)?;
        if !self.rules.sleep_enabled {
            return Err(VoteError::SleepDisabled.into());
        }

        self.votes
            .cast(&voter, NO_ELIMINATION, self.phase, invocation.stamp());
        log::info!("{voter} voted to sleep");
        self.vote_recorded(invocation);
        Ok(())
    }

    /// Takes back the caller's vote. Returns the target it was on, if any.
    pub fn retract_vote(&mut self, invocation: &Invocation) -> Result<Option<String>, GameError> {
        let voter = self.check_voter(invocation)?;
        let previous = self
            .votes
            .retract(&voter, self.phase, invocation.stamp());
        log::info!("{voter} retracted their vote");
        self.vote_recorded(invocation);
        Ok(previous)
    }

    /// Drops the named player's vote, whoever asks. Names of players who have
    /// since left the game are accepted as written.
    pub fn remove_vote(
        &mut self,
        invocation: &Invocation,
        voter: &str,
    ) -> Result<Option<String>, GameError> {
        Self::require_mod(invocation, "remove votes")?;
        let voter = self
            .players
            .by_name(voter)
            .map(|p| p.name.clone())
            .unwrap_or_else(|| voter.to_string());

        let previous = self
            .votes
            .retract(&voter, self.phase, invocation.stamp());
        log::info!("Removed the vote of {voter} ({previous:?})");
        self.vote_recorded(invocation);
        Ok(previous)
    }

    pub fn clear_votes(&mut self, invocation: &Invocation) -> Result<(), GameError> {
        Self::require_mod(invocation, "clear votes")?;
        self.votes.clear(self.phase, invocation.stamp());
        log::info!("Votes cleared in {}", self.phase);
        self.vote_recorded(invocation);
        Ok(())
    }

    pub fn set_voting_enabled(
        &mut self,
        invocation: &Invocation,
        enabled: bool,
    ) -> Result<(), GameError> {
        Self::require_mod(invocation, "enable or disable voting")?;
        self.voting_enabled = enabled;
        log::info!("Voting {}", if enabled { "enabled" } else { "disabled" });
        Ok(())
    }

    pub fn current_tally(&self) -> TallyView {
        TallyView::new(self.phase, &self.votes.ledger, None)
    }

    /// Vote count as it stood at a point in time or after a given message.
    ///
    /// A time before the first snapshot yields an empty count in the current
    /// phase; an unknown message id is an error.
    pub fn historical_tally(&self, query: HistoryQuery) -> Result<TallyView, GameError> {
        match query {
            HistoryQuery::At(time) => Ok(match self.votes.history.at(time) {
                Some(snapshot) => TallyView::new(snapshot.phase, &snapshot.votes, Some(time)),
                None => TallyView::new(self.phase, &VoteLedger::new(), Some(time)),
            }),
            HistoryQuery::Message(message_id) => self
                .votes
                .history
                .by_message(message_id)
                .map(|snapshot| TallyView::new(snapshot.phase, &snapshot.votes, Some(snapshot.time)))
                .ok_or_else(|| {
                    GameError::NotFound(format!("No vote count recorded for message {message_id}"))
                }),
        }
    }

    /// Whether a count requested from `category` may be shown to everyone.
    pub fn tally_is_public(&self, category: u64) -> bool {
        self.config.vote_count_categories().contains(&category)
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::{by, by_mod, session, t, MOD, VOTE_CHANNEL};
    use super::*;
    use crate::config::Rules;
    use types::GamePhase;

    #[test]
    fn test_vote_then_switch() {
        let mut session = session();
        session.cast_vote(&by(2, 1), "alice").unwrap();
        session.cast_vote(&by(2, 2), "Carol").unwrap();

        assert_eq!(session.votes().target_of("Bob"), Some("Carol"));
        assert!(session.votes().voters("Alice").is_empty());
        assert_eq!(session.history().len(), 2);
        assert_eq!(
            session.current_tally().to_string(),
            "Vote Count (Day 1):\nCarol (1): Bob"
        );
    }

    #[test]
    fn test_vote_checks_in_order() {
        let mut session = session();
        session.set_voting_enabled(&by_mod(0), false).unwrap();
        assert!(matches!(
            session.cast_vote(&by(2, 1).with_message(5), "Alice"),
            Err(GameError::Vote(VoteError::Disabled))
        ));

        session.set_voting_enabled(&by_mod(0), true).unwrap();
        let mut wrong_channel = by(2, 1);
        wrong_channel.channel = VOTE_CHANNEL + 1;
        assert!(matches!(
            session.cast_vote(&wrong_channel, "Alice"),
            Err(GameError::Vote(VoteError::WrongChannel(VOTE_CHANNEL)))
        ));
        assert!(matches!(
            session.cast_vote(&by(MOD, 1), "Alice"),
            Err(GameError::Vote(VoteError::InvalidVoter))
        ));
        assert!(matches!(
            session.cast_vote(&by(2, 1), "Zed"),
            Err(GameError::Vote(VoteError::InvalidTarget))
        ));

        session.kill_player(&by_mod(1), "Alice").unwrap();
        assert!(matches!(
            session.cast_vote(&by(2, 2), "Alice"),
            Err(GameError::Vote(VoteError::InvalidTarget))
        ));
        assert!(matches!(
            session.cast_vote(&by(1, 2), "Bob"),
            Err(GameError::Vote(VoteError::InvalidVoter))
        ));

        assert!(session.votes().is_empty());
        assert!(session.history().is_empty());
        assert!(session.take_events().is_empty());
    }

    #[test]
    fn test_sleep_vote_respects_rule() {
        let mut session = session();
        session.sleep_vote(&by(3, 1)).unwrap();
        assert_eq!(session.votes().target_of("Carol"), Some(NO_ELIMINATION));

        let mut no_sleep = super::super::tests::session();
        no_sleep.rules = Rules {
            sleep_enabled: false,
            ..Rules::default()
        };
        assert!(matches!(
            no_sleep.sleep_vote(&by(3, 1)),
            Err(GameError::Vote(VoteError::SleepDisabled))
        ));
    }

    #[test]
    fn test_retract_and_remove() {
        let mut session = session();
        session.cast_vote(&by(2, 1), "Alice").unwrap();
        session.cast_vote(&by(3, 2), "Alice").unwrap();

        assert_eq!(session.retract_vote(&by(2, 3)).unwrap(), Some("Alice".to_string()));
        assert_eq!(session.retract_vote(&by(2, 4)).unwrap(), None);

        assert!(matches!(
            session.remove_vote(&by(1, 5), "Carol"),
            Err(GameError::PermissionDenied(_))
        ));
        assert_eq!(
            session.remove_vote(&by_mod(5), "carol").unwrap(),
            Some("Alice".to_string())
        );
        assert!(session.votes().is_empty());
        assert_eq!(session.history().len(), 5);
    }

    #[test]
    fn test_clear_votes_snapshots_empty_ledger() {
        let mut session = session();
        session.cast_vote(&by(2, 1), "Alice").unwrap();
        session.clear_votes(&by_mod(2)).unwrap();
        assert!(session.votes().is_empty());
        assert!(session.history().latest().unwrap().votes.is_empty());
        assert_eq!(session.current_tally().render(), crate::tally::NO_VOTES);
    }

    #[test]
    fn test_historical_tally() {
        let mut session = session();
        session.cast_vote(&by(2, 10).with_message(100), "Alice").unwrap();
        session.cast_vote(&by(3, 20).with_message(101), "Alice").unwrap();
        session.cast_vote(&by(2, 30).with_message(102), "Dave").unwrap();

        let early = session.historical_tally(HistoryQuery::At(t(5))).unwrap();
        assert!(early.entries.is_empty());
        assert_eq!(early.phase, GamePhase::day(1));

        let mid = session.historical_tally(HistoryQuery::At(t(25))).unwrap();
        assert_eq!(mid.entries[0].target, "Alice");
        assert_eq!(mid.entries[0].count, 2);

        let by_message = session.historical_tally(HistoryQuery::Message(100)).unwrap();
        assert_eq!(by_message.entries[0].voters, vec!["Bob"]);
        assert_eq!(by_message.as_of, Some(t(10)));

        assert!(matches!(
            session.historical_tally(HistoryQuery::Message(7)),
            Err(GameError::NotFound(_))
        ));
    }

    #[test]
    fn test_vote_events() {
        let mut session = session();
        session.cast_vote(&by(2, 1), "Alice").unwrap();
        let events = session.take_events();
        assert_eq!(events.len(), 1);
        match &events[0] {
            GameEvent::VoteRecorded { phase, tally, at } => {
                assert_eq!(*phase, GamePhase::day(1));
                assert_eq!(tally[0].target, "Alice");
                assert_eq!(*at, t(1));
            }
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[test]
    fn test_tally_visibility() {
        let session = session();
        assert!(session.tally_is_public(10));
        assert!(!session.tally_is_public(11));
    }
}
