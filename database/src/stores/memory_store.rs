use super::SessionStore;
use crate::{DatabaseError, SessionRecord};
use std::collections::HashMap;
use tokio::sync::Mutex;

/// Keeps records in process memory; survives nothing but a session reload.
#[derive(Default)]
pub struct MemoryStore {
    records: Mutex<HashMap<u64, SessionRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.records.lock().await.len()
    }
}

#[async_trait::async_trait]
impl SessionStore for MemoryStore {
    async fn save(&self, session_id: u64, record: &SessionRecord) -> Result<(), DatabaseError> {
        self.records.lock().await.insert(session_id, record.clone());
        Ok(())
    }

    async fn load(&self, session_id: u64) -> Result<Option<SessionRecord>, DatabaseError> {
        Ok(self.records.lock().await.get(&session_id).cloned())
    }

    async fn load_all(&self) -> Result<Vec<(u64, SessionRecord)>, DatabaseError> {
        let records = self.records.lock().await;
        let mut all: Vec<_> = records.iter().map(|(id, r)| (*id, r.clone())).collect();
        all.sort_by_key(|(id, _)| *id);
        Ok(all)
    }
}
