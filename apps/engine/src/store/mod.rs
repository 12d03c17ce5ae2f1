//! Durable session snapshots and per-player statistics.
//!
//! The in-memory session is authoritative for a running process; the store
//! exists for crash recovery and statistics. Writers are the game-flow
//! transitions, already serialized per conversation, and a failed write never
//! rolls back in-memory state.

pub mod json_file;
pub mod memory;

use std::collections::HashSet;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::domain::difficulty::Mode;
use crate::domain::state::{PlayerId, Session, SessionState};
use crate::errors::domain::DomainError;

pub use json_file::JsonFileStore;
pub use memory::MemoryStore;

/// JSON-serializable mirror of a `Session`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub conversation_id: String,
    pub state: SessionState,
    pub mode: Mode,
    pub players: Vec<PlayerId>,
    pub turn_index: usize,
    pub round: u32,
    pub words: Vec<String>,
    pub chain_letter: Option<char>,
    pub min_word_length: usize,
    pub turn_deadline_units: f64,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<&Session> for SessionSnapshot {
    fn from(session: &Session) -> Self {
        Self {
            conversation_id: session.conversation_id.clone(),
            state: session.state,
            mode: session.mode,
            players: session.players.clone(),
            turn_index: session.turn_index,
            round: session.round,
            words: session.words.clone(),
            chain_letter: session.chain_letter,
            min_word_length: session.min_word_length,
            turn_deadline_units: session.turn_deadline_units,
            created_at: session.created_at,
        }
    }
}

impl SessionSnapshot {
    /// Rebuild the in-memory form. Used by recovery and tests.
    pub fn into_session(self) -> Session {
        let used_words: HashSet<String> = self.words.iter().cloned().collect();
        Session {
            conversation_id: self.conversation_id,
            state: self.state,
            mode: self.mode,
            players: self.players,
            turn_index: self.turn_index,
            round: self.round,
            words: self.words,
            used_words,
            chain_letter: self.chain_letter,
            min_word_length: self.min_word_length,
            turn_deadline_units: self.turn_deadline_units,
            created_at: self.created_at,
            turn_epoch: 0,
        }
    }
}

/// Aggregate per-player statistics, additively updated on each win.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerStats {
    pub wins: u64,
    pub words_played: u64,
    pub rounds_played: u64,
}

#[async_trait]
pub trait SnapshotStore: Send + Sync {
    async fn save(&self, conversation_id: &str, snapshot: &SessionSnapshot)
        -> Result<(), DomainError>;
    async fn remove(&self, conversation_id: &str) -> Result<(), DomainError>;
    async fn load_all(&self) -> Result<Vec<(String, SessionSnapshot)>, DomainError>;
    /// Credit a win: `wins += 1` and the session's word/round totals.
    async fn record_win(
        &self,
        player_id: &str,
        words_played: u64,
        rounds_played: u64,
    ) -> Result<(), DomainError>;
    async fn player_stats(&self, player_id: &str) -> Result<Option<PlayerStats>, DomainError>;
}

/// The full persisted document: sessions keyed by conversation, stats keyed
/// by player.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct StoreDocument {
    pub sessions: std::collections::HashMap<String, SessionSnapshot>,
    pub stats: std::collections::HashMap<String, PlayerStats>,
}

impl StoreDocument {
    pub fn credit_win(&mut self, player_id: &str, words_played: u64, rounds_played: u64) {
        let entry = self.stats.entry(player_id.to_string()).or_default();
        entry.wins += 1;
        entry.words_played += words_played;
        entry.rounds_played += rounds_played;
    }
}
