use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use types::{GamePhase, UserId};

use crate::{
    error::GameError,
    events::GameEvent,
    history::Stamp,
    vote::{VoteBook, NO_ELIMINATION},
};

use super::{GameSession, Invocation};

/// A past vote-channel command, as read back from the host.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum TranscriptEvent {
    Vote { voter: UserId, target: String },
    Sleep { voter: UserId },
    Unvote { voter: UserId },
    NextPhase,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptEntry {
    pub at: DateTime<Utc>,
    #[serde(default)]
    pub message_id: Option<u64>,
    #[serde(flatten)]
    pub event: TranscriptEvent,
}

impl TranscriptEntry {
    fn stamp(&self) -> Stamp {
        Stamp {
            at: self.at,
            message_id: self.message_id,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReplayReport {
    pub applied: usize,
    pub skipped: usize,
    /// Phase the transcript ended in.
    pub phase: GamePhase,
}

impl GameSession {
    fn voter_name(&self, voter: UserId) -> Option<String> {
        self.players.by_id(voter).map(|p| p.name.clone())
    }

    fn target_name(&self, target: &str) -> Option<String> {
        self.players
            .by_name(target)
            .or_else(|| self.players.slot(target))
            .map(|p| p.name.clone())
    }

    /// Rebuilds votes and vote history from a transcript, starting over from
    /// an empty Day 1.
    ///
    /// Events go through the same ledger operations as live commands. Only
    /// structural checks apply: an event whose voter or target cannot be
    /// resolved is skipped. The session's phase and voting flag are kept.
    pub fn restore_votes(
        &mut self,
        invocation: &Invocation,
        transcript: &[TranscriptEntry],
    ) -> Result<ReplayReport, GameError> {
        Self::require_mod(invocation, "restore votes")?;
        let mut book = VoteBook::new();
        let mut report = ReplayReport {
            phase: GamePhase::day(1),
            ..ReplayReport::default()
        };

        for entry in transcript {
            let stamp = entry.stamp();
            let phase = report.phase;
            let applied = match &entry.event {
                TranscriptEvent::Vote { voter, target } => {
                    match (self.voter_name(*voter), self.target_name(target)) {
                        (Some(voter), Some(target)) => {
                            book.cast(&voter, &target, phase, stamp);
                            true
                        }
                        _ => false,
                    }
                }
                TranscriptEvent::Sleep { voter } => match self.voter_name(*voter) {
                    Some(voter) if self.rules.sleep_enabled => {
                        book.cast(&voter, NO_ELIMINATION, phase, stamp);
                        true
                    }
                    _ => false,
                },
                TranscriptEvent::Unvote { voter } => match self.voter_name(*voter) {
                    Some(voter) => {
                        book.retract(&voter, phase, stamp);
                        true
                    }
                    None => false,
                },
                TranscriptEvent::NextPhase => {
                    let next = phase.next();
                    let final_tally = book.close_phase(phase, next, stamp);
                    log::info!(
                        "Replayed end of {phase}: {}",
                        crate::tally::render(&final_tally).replace('\n', "; ")
                    );
                    report.phase = next;
                    true
                }
            };
            if applied {
                report.applied += 1;
            } else {
                log::warn!("Skipping unresolvable transcript event {:?}", entry.event);
                report.skipped += 1;
            }
        }

        self.votes = book;
        log::info!(
            "Restored {} vote events ({} skipped), {} snapshots",
            report.applied,
            report.skipped,
            self.votes.history.len()
        );
        let tally = self.current_tally().entries;
        self.emit(GameEvent::VoteRecorded {
            phase: self.phase,
            tally,
            at: invocation.at,
        });
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::{by, by_mod, session, t};
    use super::*;

    fn entry(secs: i64, message_id: u64, event: TranscriptEvent) -> TranscriptEntry {
        TranscriptEntry {
            at: t(secs),
            message_id: Some(message_id),
            event,
        }
    }

    fn vote(voter: UserId, target: &str) -> TranscriptEvent {
        TranscriptEvent::Vote {
            voter,
            target: target.to_string(),
        }
    }

    fn transcript() -> Vec<TranscriptEntry> {
        vec![
            entry(1, 1, vote(1, "Bob")),
            entry(2, 2, vote(2, "Alice")),
            entry(3, 3, TranscriptEvent::Sleep { voter: 3 }),
            entry(4, 4, vote(1, "Carol")),
            entry(5, 5, TranscriptEvent::Unvote { voter: 2 }),
            entry(6, 6, TranscriptEvent::NextPhase),
            entry(7, 7, TranscriptEvent::NextPhase),
            entry(8, 8, vote(4, "Alice")),
        ]
    }

    #[test]
    fn test_replay_matches_live_history() {
        let mut live = session();
        for entry in transcript() {
            let invocation = by(0, entry.at.timestamp() - t(0).timestamp())
                .with_message(entry.message_id.unwrap());
            match entry.event {
                TranscriptEvent::Vote { voter, target } => {
                    let invocation = Invocation { author: voter, ..invocation };
                    live.cast_vote(&invocation, &target).unwrap();
                }
                TranscriptEvent::Sleep { voter } => {
                    live.sleep_vote(&Invocation { author: voter, ..invocation }).unwrap();
                }
                TranscriptEvent::Unvote { voter } => {
                    live.retract_vote(&Invocation { author: voter, ..invocation }).unwrap();
                }
                TranscriptEvent::NextPhase => {
                    live.advance_phase(&invocation.as_mod()).unwrap();
                }
            }
        }

        let mut replayed = session();
        let report = replayed.restore_votes(&by_mod(100), &transcript()).unwrap();
        assert_eq!(report.applied, 8);
        assert_eq!(report.skipped, 0);
        assert_eq!(report.phase, GamePhase::day(2));
        assert_eq!(replayed.history(), live.history());
        assert_eq!(replayed.votes(), live.votes());
        assert_eq!(replayed.phase(), GamePhase::day(1));
    }

    #[test]
    fn test_replay_skips_unresolvable_events() {
        let mut session = session();
        session.cast_vote(&by(1, 0), "Dave").unwrap();
        let transcript = vec![
            entry(1, 1, vote(42, "Bob")),
            entry(2, 2, vote(1, "Nobody")),
            entry(3, 3, vote(1, "bob")),
        ];
        let report = session.restore_votes(&by_mod(10), &transcript).unwrap();
        assert_eq!(report.applied, 1);
        assert_eq!(report.skipped, 2);
        assert_eq!(session.history().len(), 1);
        assert_eq!(session.votes().target_of("Alice"), Some("Bob"));
    }

    #[test]
    fn test_replay_ignores_live_only_checks() {
        let mut session = session();
        session.set_voting_enabled(&by_mod(0), false).unwrap();
        session.kill_player(&by_mod(0), "Dave").unwrap();
        let transcript = vec![entry(1, 1, vote(4, "Alice"))];

        session.restore_votes(&by_mod(10), &transcript).unwrap();
        assert_eq!(session.votes().target_of("Dave"), Some("Alice"));
        assert!(!session.voting_enabled());
        assert!(session.restore_votes(&by(1, 10), &transcript).is_err());
    }

    #[test]
    fn test_transcript_yaml() {
        let yaml = r#"
- at: 2024-03-01T18:00:01Z
  message_id: 11
  type: Vote
  voter: 1
  target: Bob
- at: 2024-03-01T18:00:02Z
  type: NextPhase
"#;
        let entries: Vec<TranscriptEntry> = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(entries[0], entry(1, 11, vote(1, "Bob")));
        assert_eq!(entries[1].event, TranscriptEvent::NextPhase);
        assert_eq!(entries[1].message_id, None);
    }
}
