//! In-memory store: the authoritative-memory variant, also used in tests.

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::errors::domain::DomainError;
use crate::store::{PlayerStats, SessionSnapshot, SnapshotStore, StoreDocument};

#[derive(Default)]
pub struct MemoryStore {
    document: Mutex<StoreDocument>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of snapshots currently held; handy in tests.
    pub fn session_count(&self) -> usize {
        self.document.lock().sessions.len()
    }
}

#[async_trait]
impl SnapshotStore for MemoryStore {
    async fn save(
        &self,
        conversation_id: &str,
        snapshot: &SessionSnapshot,
    ) -> Result<(), DomainError> {
        self.document
            .lock()
            .sessions
            .insert(conversation_id.to_string(), snapshot.clone());
        Ok(())
    }

    async fn remove(&self, conversation_id: &str) -> Result<(), DomainError> {
        self.document.lock().sessions.remove(conversation_id);
        Ok(())
    }

    async fn load_all(&self) -> Result<Vec<(String, SessionSnapshot)>, DomainError> {
        Ok(self
            .document
            .lock()
            .sessions
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect())
    }

    async fn record_win(
        &self,
        player_id: &str,
        words_played: u64,
        rounds_played: u64,
    ) -> Result<(), DomainError> {
        self.document
            .lock()
            .credit_win(player_id, words_played, rounds_played);
        Ok(())
    }

    async fn player_stats(&self, player_id: &str) -> Result<Option<PlayerStats>, DomainError> {
        Ok(self.document.lock().stats.get(player_id).copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn wins_accumulate_additively() {
        let store = MemoryStore::new();
        store.record_win("p1", 12, 3).await.unwrap();
        store.record_win("p1", 8, 2).await.unwrap();

        let stats = store.player_stats("p1").await.unwrap().unwrap();
        assert_eq!(stats.wins, 2);
        assert_eq!(stats.words_played, 20);
        assert_eq!(stats.rounds_played, 5);
        assert!(store.player_stats("p2").await.unwrap().is_none());
    }
}
