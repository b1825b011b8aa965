//! Storage abstraction for session histories.

use async_trait::async_trait;

use crate::error::ColloquyError;
use crate::types::Content;

/// Key → history store.
///
/// Transactional and locking discipline for the backing store belongs to the
/// implementation; callers only rely on the three operations below.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Replace the stored history for `session_id` (upsert).
    async fn save(&self, session_id: &str, history: &[Content]) -> Result<(), ColloquyError>;

    /// Stored history, or `None` when the session has never been saved.
    async fn load(&self, session_id: &str) -> Result<Option<Vec<Content>>, ColloquyError>;

    /// Remove the stored history. Removing an absent session is a no-op.
    async fn delete(&self, session_id: &str) -> Result<(), ColloquyError>;
}
