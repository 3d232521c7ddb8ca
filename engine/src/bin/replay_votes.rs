use std::{error::Error, fs, path::PathBuf};

use chrono::Utc;
use clap::Parser;
use database::{DatabaseConfig, NoopStore, SessionStore, SqliteSessionStore};
use itertools::Itertools;

use engine::{GameError, GameService, GameSetup, Invocation, TallyView, TranscriptEntry};

/// Rebuilds a game's vote history from a transcript of vote-channel commands.
#[derive(Parser, Debug)]
struct Params {
    /// Game setup YAML (config, rules, players, roles).
    #[arg(short, long)]
    setup: PathBuf,

    /// Transcript YAML, oldest event first.
    #[arg(short, long)]
    transcript: PathBuf,

    /// SQLite URL to persist the session to; falls back to DATABASE_URL.
    #[arg(short, long)]
    database: Option<String>,

    #[arg(long, default_value_t = 1)]
    session: u64,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let args = Params::parse();
    log::info!("args: {args:?}");

    let setup = GameSetup::from_yaml(&fs::read_to_string(&args.setup)?)?;
    let transcript: Vec<TranscriptEntry> =
        serde_yaml::from_str(&fs::read_to_string(&args.transcript)?)?;

    let db_config = DatabaseConfig::from_cli_or_env_or_yaml(args.database, None);
    if db_config.is_in_memory() {
        run(NoopStore, args.session, setup, &transcript).await?;
    } else {
        let store = SqliteSessionStore::new(db_config.create_pool().await?);
        store.run_migrations().await?;
        run(store, args.session, setup, &transcript).await?;
    }
    Ok(())
}

async fn run<S: SessionStore>(
    store: S,
    session_id: u64,
    setup: GameSetup,
    transcript: &[TranscriptEntry],
) -> Result<(), GameError> {
    let service = GameService::restore(store).await?;
    if service.contains(session_id).await {
        log::warn!("Session {session_id} is already stored; replaying onto it and ignoring the setup file");
    }
    service.create_from_setup(session_id, setup).await?;

    let invocation = Invocation::new(0, 0, Utc::now()).as_mod();
    let report = service
        .restore_votes(session_id, &invocation, transcript)
        .await?;
    log::info!(
        "Replayed {} events ({} skipped), transcript ends in {}",
        report.applied,
        report.skipped,
        report.phase
    );

    let (history, votes) = service
        .query(session_id, |s| (s.history().clone(), s.votes().clone()))
        .await?;
    for (last, next) in history.snapshots().iter().tuple_windows() {
        if last.phase != next.phase {
            log::info!("{}", TallyView::new(last.phase, &last.votes, Some(last.time)));
        }
    }

    println!("{}", TallyView::new(report.phase, &votes, None));
    Ok(())
}
