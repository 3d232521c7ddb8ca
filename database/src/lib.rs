pub mod config;
pub mod error;
pub mod models;
pub mod retry;
pub mod stores;


pub use config::DatabaseConfig;
pub use error::DatabaseError;
pub use models::SessionRecord;
pub use retry::retry_with_backoff;
pub use stores::{MemoryStore, SessionStore, SqliteSessionStore};

// NoopStore for when persistence is not needed
pub struct NoopStore;

#[async_trait::async_trait]
impl stores::SessionStore for NoopStore {
    async fn save(
        &self,
        _session_id: u64,
        _record: &models::SessionRecord,
    ) -> Result<(), error::DatabaseError> {
        Ok(())
    }

    async fn load(
        &self,
        _session_id: u64,
    ) -> Result<Option<models::SessionRecord>, error::DatabaseError> {
        Ok(None)
    }

    async fn load_all(&self) -> Result<Vec<(u64, models::SessionRecord)>, error::DatabaseError> {
        Ok(Vec::new())
    }
}
