//! Per-conversation session state.
//!
//! `Session` is a plain mutable container; all mutation is serialized by the
//! per-conversation lock owned by the registry. `turn_epoch` increments on
//! every turn boundary so that timer callbacks scheduled for an earlier turn
//! observe the mismatch and become no-ops.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::domain::difficulty::{Mode, TurnParams};

pub type ConversationId = String;
pub type PlayerId = String;

/// Lifecycle phases; transitions are monotone and `Finished` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    Lobby,
    Active,
    Finished,
}

#[derive(Debug, Clone)]
pub struct Session {
    pub conversation_id: ConversationId,
    pub state: SessionState,
    pub mode: Mode,
    /// Roster in turn order; no duplicates.
    pub players: Vec<PlayerId>,
    /// Index into `players` of whoever must act now.
    pub turn_index: usize,
    /// 0-based; increments each time `turn_index` wraps to 0 on acceptance.
    pub round: u32,
    /// Accepted words in play order, for the end-of-game summary.
    pub words: Vec<String>,
    /// Case-normalized membership set; grows monotonically.
    pub used_words: HashSet<String>,
    /// Required first letter for the current turn. Assigned when the lobby
    /// resolves; thereafter always the last letter of the previous word.
    pub chain_letter: Option<char>,
    pub min_word_length: usize,
    pub turn_deadline_units: f64,
    pub created_at: OffsetDateTime,
    /// Bumped on every turn boundary; guards stale timers.
    pub turn_epoch: u64,
}

impl Session {
    pub fn new_lobby(
        conversation_id: impl Into<ConversationId>,
        starter_id: impl Into<PlayerId>,
        mode: Mode,
        params: TurnParams,
        created_at: OffsetDateTime,
    ) -> Self {
        Self {
            conversation_id: conversation_id.into(),
            state: SessionState::Lobby,
            mode,
            players: vec![starter_id.into()],
            turn_index: 0,
            round: 0,
            words: Vec::new(),
            used_words: HashSet::new(),
            chain_letter: None,
            min_word_length: params.min_word_length,
            turn_deadline_units: params.turn_deadline_units,
            created_at,
            turn_epoch: 0,
        }
    }

    pub fn current_player(&self) -> Option<&PlayerId> {
        self.players.get(self.turn_index)
    }

    /// Advance the turn pointer. Returns true when it wrapped to 0, which is
    /// the round boundary.
    pub fn advance_turn(&mut self) -> bool {
        if self.players.is_empty() {
            self.turn_index = 0;
            return false;
        }
        self.turn_index = (self.turn_index + 1) % self.players.len();
        self.turn_index == 0
    }

    /// Re-establish `turn_index < players.len()` after a roster mutation.
    /// Wrapping here does not advance the round; nobody played.
    pub fn clamp_turn_index(&mut self) {
        if self.turn_index >= self.players.len() {
            self.turn_index = 0;
        }
    }

    pub fn apply_params(&mut self, params: TurnParams) {
        self.min_word_length = params.min_word_length;
        self.turn_deadline_units = params.turn_deadline_units;
    }

    /// Record an accepted word: membership set, ordered log and chain letter.
    pub fn record_word(&mut self, word: &str) {
        self.used_words.insert(word.to_string());
        self.words.push(word.to_string());
        self.chain_letter = word.chars().last();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::difficulty::params_for;

    fn session(players: &[&str]) -> Session {
        let mut s = Session::new_lobby(
            "conv",
            players[0],
            Mode::Medium,
            params_for(Mode::Medium, 0),
            OffsetDateTime::UNIX_EPOCH,
        );
        for p in &players[1..] {
            s.players.push(p.to_string());
        }
        s
    }

    #[test]
    fn advance_turn_wraps_and_reports_round_boundary() {
        let mut s = session(&["p1", "p2", "p3"]);
        assert!(!s.advance_turn());
        assert!(!s.advance_turn());
        assert!(s.advance_turn());
        assert_eq!(s.turn_index, 0);
    }

    #[test]
    fn clamp_wraps_without_a_round_boundary() {
        let mut s = session(&["p1", "p2", "p3"]);
        s.turn_index = 2;
        s.players.remove(2);
        s.clamp_turn_index();
        assert_eq!(s.turn_index, 0);
    }

    #[test]
    fn record_word_tracks_membership_order_and_chain_letter() {
        let mut s = session(&["p1", "p2"]);
        s.record_word("cat");
        s.record_word("tiger");
        assert_eq!(s.words, vec!["cat", "tiger"]);
        assert!(s.used_words.contains("cat"));
        assert_eq!(s.chain_letter, Some('r'));
    }
}
