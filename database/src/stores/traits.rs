use super::super::{DatabaseError, SessionRecord};
use async_trait::async_trait;

#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn save(&self, session_id: u64, record: &SessionRecord) -> Result<(), DatabaseError>;
    async fn load(&self, session_id: u64) -> Result<Option<SessionRecord>, DatabaseError>;
    async fn load_all(&self) -> Result<Vec<(u64, SessionRecord)>, DatabaseError>;
}
