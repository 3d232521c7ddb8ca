pub mod actions;
pub mod config;
pub mod error;
pub mod events;
pub mod history;
pub mod registry;
pub mod service;
pub mod session;
pub mod tally;
pub mod vote;

pub use actions::{ActionLedger, PendingAction, Submission};
pub use config::{GameConfig, GameSetup, PlayerEntry, Rules};
pub use error::{ActionError, GameError, VoteError};
pub use events::GameEvent;
pub use history::{HistoryQuery, Stamp, VoteHistory, VoteSnapshot};
pub use registry::PlayerRegistry;
pub use service::GameService;
pub use session::{
    ActionView, GameSession, Invocation, ReplayReport, TranscriptEntry, TranscriptEvent,
};
pub use tally::{TallyEntry, TallyView, NO_VOTES};
pub use vote::{VoteBook, VoteLedger, NO_ELIMINATION};
