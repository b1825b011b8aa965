//! Process-local session repository.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::repository::SessionRepository;
use crate::error::ColloquyError;
use crate::types::Content;

/// Keeps histories in a map; contents are lost on restart.
#[derive(Debug, Default)]
pub struct InMemorySessionRepository {
    sessions: RwLock<HashMap<String, Vec<Content>>>,
}

impl InMemorySessionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stored session ids, sorted.
    pub async fn session_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.sessions.read().await.keys().cloned().collect();
        ids.sort();
        ids
    }
}

#[async_trait]
impl SessionRepository for InMemorySessionRepository {
    async fn save(&self, session_id: &str, history: &[Content]) -> Result<(), ColloquyError> {
        self.sessions
            .write()
            .await
            .insert(session_id.to_string(), history.to_vec());
        Ok(())
    }

    async fn load(&self, session_id: &str) -> Result<Option<Vec<Content>>, ColloquyError> {
        Ok(self.sessions.read().await.get(session_id).cloned())
    }

    async fn delete(&self, session_id: &str) -> Result<(), ColloquyError> {
        self.sessions.write().await.remove(session_id);
        Ok(())
    }
}
