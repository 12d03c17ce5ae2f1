//! Game flow orchestration service.
//!
//! Bridges the pure domain (session state, word rules, difficulty policy)
//! with the external collaborators: dictionary validation, notification
//! delivery, snapshot persistence and the per-session timer supervisor.
//! Every mutating transition runs under the session's exclusive lock;
//! notification and persistence I/O happen after it is released.

mod lobby;
mod player_actions;
mod round_lifecycle;

use std::sync::Arc;

use serde::Serialize;
use tracing::warn;

use crate::domain::difficulty::Mode;
use crate::domain::state::{PlayerId, SessionState};
use crate::domain::words::RejectReason;
use crate::notify::Notification;
use crate::state::AppState;
use crate::store::SessionSnapshot;

/// Result of routing a plain-text message through the submission pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The word was accepted and the turn advanced.
    Accepted,
    /// The word was turned down; the sender was told why. No state change.
    Rejected(RejectReason),
    /// Expected channel noise (no game, not the sender's turn, stale turn);
    /// dropped without a reply.
    Ignored,
}

/// Answer to a status query.
#[derive(Debug, Clone, Serialize)]
pub struct StatusReport {
    pub state: SessionState,
    pub mode: Mode,
    pub players: Vec<PlayerId>,
    pub current_player: Option<PlayerId>,
    pub round: u32,
    pub words_played: usize,
    pub min_word_length: usize,
}

/// Game flow service; cheap to clone, shared with every timer task.
#[derive(Clone)]
pub struct GameFlowService {
    state: Arc<AppState>,
}

impl GameFlowService {
    pub fn new(state: Arc<AppState>) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &Arc<AppState> {
        &self.state
    }

    /// Deliver a notification, logging delivery failures. Delivery is
    /// best-effort and never affects game state.
    pub(crate) async fn notify(&self, conversation_id: &str, note: Notification) {
        if let Err(err) = self.state.sink.send(conversation_id, note).await {
            warn!(conversation_id, error = %err, "failed to deliver notification");
        }
    }

    /// Persist a snapshot, logging failures. In-memory state stays
    /// authoritative when the write fails.
    pub(crate) async fn persist(&self, conversation_id: &str, snapshot: &SessionSnapshot) {
        if let Err(err) = self.state.store.save(conversation_id, snapshot).await {
            warn!(conversation_id, error = %err, "snapshot write failed");
        }
    }
}
