use std::{collections::HashMap, sync::Arc, time::Duration};

use chrono::Utc;
use database::{retry_with_backoff, SessionStore};
use rand::Rng;
use tokio::sync::{Mutex, RwLock};
use types::{GamePhase, PhaseKind};

use crate::{
    actions::Submission,
    config::{GameConfig, GameSetup, Rules},
    error::GameError,
    events::GameEvent,
    history::HistoryQuery,
    session::{GameSession, Invocation, ReplayReport, TranscriptEntry},
    tally::TallyView,
};

const DEFAULT_MAX_RETRIES: usize = 3;
const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(50);

/// All hosted sessions, each behind its own lock, written through to a
/// [`SessionStore`] after every successful command.
///
/// Commands on one session run one at a time, save included; different
/// sessions never wait on each other.
pub struct GameService<S: SessionStore> {
    store: S,
    sessions: RwLock<HashMap<u64, Arc<Mutex<GameSession>>>>,
    max_retries: usize,
    retry_delay: Duration,
}

impl<S: SessionStore> GameService<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            sessions: RwLock::new(HashMap::new()),
            max_retries: DEFAULT_MAX_RETRIES,
            retry_delay: DEFAULT_RETRY_DELAY,
        }
    }

    pub fn with_retry(mut self, max_retries: usize, retry_delay: Duration) -> Self {
        self.max_retries = max_retries;
        self.retry_delay = retry_delay;
        self
    }

    /// Builds a service holding every session the store knows about.
    pub async fn restore(store: S) -> Result<Self, GameError> {
        let service = Self::new(store);
        let records = service.store.load_all().await?;
        {
            let mut sessions = service.sessions.write().await;
            for (session_id, record) in records {
                let session = GameSession::from_record(record)?;
                sessions.insert(session_id, Arc::new(Mutex::new(session)));
            }
            log::info!("Restored {} sessions", sessions.len());
        }
        Ok(service)
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub async fn session_ids(&self) -> Vec<u64> {
        let mut ids: Vec<_> = self.sessions.read().await.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    pub async fn contains(&self, session_id: u64) -> bool {
        self.sessions.read().await.contains_key(&session_id)
    }

    /// Registers a new session, or returns the one already under `session_id`.
    pub async fn create_session(
        &self,
        session_id: u64,
        config: GameConfig,
        rules: Rules,
    ) -> Result<Arc<Mutex<GameSession>>, GameError> {
        self.insert_session(session_id, GameSession::new(config, rules))
            .await
    }

    pub async fn create_from_setup(
        &self,
        session_id: u64,
        setup: GameSetup,
    ) -> Result<Arc<Mutex<GameSession>>, GameError> {
        self.insert_session(session_id, GameSession::from_setup(setup)?)
            .await
    }

    async fn insert_session(
        &self,
        session_id: u64,
        session: GameSession,
    ) -> Result<Arc<Mutex<GameSession>>, GameError> {
        let mut sessions = self.sessions.write().await;
        if let Some(existing) = sessions.get(&session_id) {
            log::debug!("Session {session_id} already exists");
            return Ok(existing.clone());
        }
        self.persist(session_id, &session).await?;
        let session = Arc::new(Mutex::new(session));
        sessions.insert(session_id, session.clone());
        log::info!("Created session {session_id}");
        Ok(session)
    }

    /// Looks up a session. Unknown ids are an error, never a fresh session.
    pub async fn session(&self, session_id: u64) -> Result<Arc<Mutex<GameSession>>, GameError> {
        self.sessions
            .read()
            .await
            .get(&session_id)
            .cloned()
            .ok_or_else(|| GameError::NotFound(format!("No game is set up for session {session_id}")))
    }

    async fn persist(&self, session_id: u64, session: &GameSession) -> Result<(), GameError> {
        let record = session.to_record(Utc::now())?;
        let store = &self.store;
        let record = &record;
        retry_with_backoff(
            || Box::pin(async move { store.save(session_id, record).await }),
            self.max_retries,
            self.retry_delay,
        )
        .await?;
        Ok(())
    }

    /// Runs a mutating command and saves the session once it succeeds.
    ///
    /// A failed save is reported as [`GameError::Persistence`]; the command's
    /// effect stays in memory and is saved with the next successful command.
    pub async fn execute<T, F>(&self, session_id: u64, command: F) -> Result<T, GameError>
    where
        F: FnOnce(&mut GameSession) -> Result<T, GameError> + Send,
        T: Send,
    {
        let session = self.session(session_id).await?;
        let mut session = session.lock().await;
        let output = command(&mut *session)?;
        self.persist(session_id, &session).await?;
        Ok(output)
    }

    pub async fn query<T, F>(&self, session_id: u64, query: F) -> Result<T, GameError>
    where
        F: FnOnce(&GameSession) -> T + Send,
    {
        let session = self.session(session_id).await?;
        let session = session.lock().await;
        Ok(query(&*session))
    }

    pub async fn take_events(&self, session_id: u64) -> Result<Vec<GameEvent>, GameError> {
        let session = self.session(session_id).await?;
        let mut session = session.lock().await;
        Ok(session.take_events())
    }

    pub async fn cast_vote(
        &self,
        session_id: u64,
        invocation: &Invocation,
        target: &str,
    ) -> Result<(), GameError> {
        self.execute(session_id, |s| s.cast_vote(invocation, target))
            .await
    }

    pub async fn retract_vote(
        &self,
        session_id: u64,
        invocation: &Invocation,
    ) -> Result<Option<String>, GameError> {
        self.execute(session_id, |s| s.retract_vote(invocation))
            .await
    }

    pub async fn sleep_vote(&self, session_id: u64, invocation: &Invocation) -> Result<(), GameError> {
        self.execute(session_id, |s| s.sleep_vote(invocation)).await
    }

    pub async fn remove_vote(
        &self,
        session_id: u64,
        invocation: &Invocation,
        voter: &str,
    ) -> Result<Option<String>, GameError> {
        self.execute(session_id, |s| s.remove_vote(invocation, voter))
            .await
    }

    pub async fn clear_votes(&self, session_id: u64, invocation: &Invocation) -> Result<(), GameError> {
        self.execute(session_id, |s| s.clear_votes(invocation)).await
    }

    pub async fn set_voting_enabled(
        &self,
        session_id: u64,
        invocation: &Invocation,
        enabled: bool,
    ) -> Result<(), GameError> {
        self.execute(session_id, |s| s.set_voting_enabled(invocation, enabled))
            .await
    }

    pub async fn current_tally(&self, session_id: u64) -> Result<TallyView, GameError> {
        self.query(session_id, |s| s.current_tally()).await
    }

    pub async fn historical_tally(
        &self,
        session_id: u64,
        query: HistoryQuery,
    ) -> Result<TallyView, GameError> {
        self.query(session_id, |s| s.historical_tally(query))
            .await?
    }

    pub async fn submit_action<T, R>(
        &self,
        session_id: u64,
        invocation: &Invocation,
        action_name: &str,
        targets: &[T],
        rng: &mut R,
    ) -> Result<Submission, GameError>
    where
        T: AsRef<str> + Sync,
        R: Rng + Send + ?Sized,
    {
        self.execute(session_id, |s| {
            s.submit_action(invocation, action_name, targets, rng)
        })
        .await
    }

    pub async fn advance_phase(
        &self,
        session_id: u64,
        invocation: &Invocation,
    ) -> Result<GamePhase, GameError> {
        self.execute(session_id, |s| s.advance_phase(invocation))
            .await
    }

    pub async fn set_phase(
        &self,
        session_id: u64,
        invocation: &Invocation,
        kind: PhaseKind,
        num: u32,
    ) -> Result<GamePhase, GameError> {
        self.execute(session_id, |s| s.set_phase(invocation, kind, num))
            .await
    }

    pub async fn restore_votes(
        &self,
        session_id: u64,
        invocation: &Invocation,
        transcript: &[TranscriptEntry],
    ) -> Result<ReplayReport, GameError> {
        self.execute(session_id, |s| s.restore_votes(invocation, transcript))
            .await
    }
}
