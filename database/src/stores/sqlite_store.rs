use super::SessionStore;
use crate::{DatabaseError, SessionRecord};
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};

const SESSION_COLUMNS: &str = "session_id, config, rules, phase, voting_enabled, votes, vote_history, players, player_slots, action_submissions, roles, updated_at";

pub struct SqliteSessionStore {
    pool: SqlitePool,
}

impl SqliteSessionStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn run_migrations(&self) -> Result<(), DatabaseError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| DatabaseError::Migration(e.to_string()))?;
        tracing::info!("Session store migrations applied");
        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

fn json_column(row: &SqliteRow, column: &str) -> Result<serde_json::Value, DatabaseError> {
    let text: String = row
        .try_get(column)
        .map_err(|e| DatabaseError::Query(e.to_string()))?;
    Ok(serde_json::from_str(&text)?)
}

fn record_from_row(row: &SqliteRow) -> Result<(u64, SessionRecord), DatabaseError> {
    let session_id: i64 = row
        .try_get("session_id")
        .map_err(|e| DatabaseError::Query(e.to_string()))?;
    let voting_enabled: bool = row
        .try_get("voting_enabled")
        .map_err(|e| DatabaseError::Query(e.to_string()))?;
    let updated_at: chrono::DateTime<chrono::Utc> = row
        .try_get("updated_at")
        .map_err(|e| DatabaseError::Query(e.to_string()))?;

    let record = SessionRecord {
        config: json_column(row, "config")?,
        rules: json_column(row, "rules")?,
        phase: json_column(row, "phase")?,
        voting_enabled,
        votes: json_column(row, "votes")?,
        vote_history: json_column(row, "vote_history")?,
        players: json_column(row, "players")?,
        player_slots: json_column(row, "player_slots")?,
        action_submissions: json_column(row, "action_submissions")?,
        roles: json_column(row, "roles")?,
        updated_at,
    };
    Ok((session_id as u64, record))
}

#[async_trait::async_trait]
impl SessionStore for SqliteSessionStore {
    async fn save(&self, session_id: u64, record: &SessionRecord) -> Result<(), DatabaseError> {
        sqlx::query(
            "INSERT INTO sessions (session_id, config, rules, phase, voting_enabled, votes, vote_history, players, player_slots, action_submissions, roles, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
             ON CONFLICT(session_id) DO UPDATE SET
                config = excluded.config,
                rules = excluded.rules,
                phase = excluded.phase,
                voting_enabled = excluded.voting_enabled,
                votes = excluded.votes,
                vote_history = excluded.vote_history,
                players = excluded.players,
                player_slots = excluded.player_slots,
                action_submissions = excluded.action_submissions,
                roles = excluded.roles,
                updated_at = excluded.updated_at",
        )
        .bind(session_id as i64)
        .bind(serde_json::to_string(&record.config)?)
        .bind(serde_json::to_string(&record.rules)?)
        .bind(serde_json::to_string(&record.phase)?)
        .bind(record.voting_enabled)
        .bind(serde_json::to_string(&record.votes)?)
        .bind(serde_json::to_string(&record.vote_history)?)
        .bind(serde_json::to_string(&record.players)?)
        .bind(serde_json::to_string(&record.player_slots)?)
        .bind(serde_json::to_string(&record.action_submissions)?)
        .bind(serde_json::to_string(&record.roles)?)
        .bind(record.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| DatabaseError::Query(e.to_string()))?;

        tracing::debug!("Saved session {session_id}");
        Ok(())
    }

    async fn load(&self, session_id: u64) -> Result<Option<SessionRecord>, DatabaseError> {
        let row = sqlx::query(&format!(
            "SELECT {SESSION_COLUMNS} FROM sessions WHERE session_id = ?"
        ))
        .bind(session_id as i64)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DatabaseError::Query(e.to_string()))?;

        row.as_ref()
            .map(record_from_row)
            .transpose()
            .map(|found| found.map(|(_, record)| record))
    }

    async fn load_all(&self) -> Result<Vec<(u64, SessionRecord)>, DatabaseError> {
        let rows = sqlx::query(&format!(
            "SELECT {SESSION_COLUMNS} FROM sessions ORDER BY session_id"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DatabaseError::Query(e.to_string()))?;

        let records = rows
            .iter()
            .map(record_from_row)
            .collect::<Result<Vec<_>, _>>()?;
        tracing::info!("Loaded {} persisted sessions", records.len());
        Ok(records)
    }
}
