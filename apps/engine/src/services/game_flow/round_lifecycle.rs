//! Elimination, win condition, status, reset and crash recovery.

use tracing::{debug, info, warn};

use super::{GameFlowService, StatusReport};
use crate::domain::state::SessionState;
use crate::error::AppError;
use crate::errors::domain::{DomainError, NotFoundKind};
use crate::notify::messages;
use crate::notify::Notification;
use crate::store::SessionSnapshot;

struct WinRecord {
    winner: String,
    rounds_played: u32,
    words_played: u64,
}

impl GameFlowService {
    /// Turn timeout callback. Eliminates the player on turn unless the turn
    /// already ended (the epoch check loses gracefully to a just-accepted
    /// word).
    pub(crate) async fn handle_turn_timeout(&self, conversation_id: &str, epoch: u64) {
        let Some(handle) = self.state().registry.get(conversation_id) else {
            return;
        };

        let mut notes: Vec<Notification> = Vec::new();
        let mut win: Option<WinRecord> = None;
        let mut snapshot: Option<SessionSnapshot> = None;
        let mut defunct = false;
        {
            let mut session = handle.session.lock().await;
            if session.state != SessionState::Active || session.turn_epoch != epoch {
                debug!(conversation_id, epoch, "stale turn timeout ignored");
                return;
            }
            if session.players.is_empty() {
                // Should be unreachable; clamp instead of wedging the game.
                warn!(conversation_id, "timeout fired on an empty roster");
                handle.cancel_timers();
                session.state = SessionState::Finished;
                defunct = true;
            } else {
                let on_turn = session.turn_index;
                let eliminated = session.players.remove(on_turn);
                session.turn_epoch += 1;
                info!(conversation_id, player = %eliminated, "player eliminated on timeout");
                notes.push(messages::player_eliminated(&eliminated));

                if session.players.len() == 1 {
                    session.state = SessionState::Finished;
                    handle.cancel_timers();
                    let winner = session.players[0].clone();
                    let rounds_played = session.round + 1;
                    notes.push(messages::win_summary(&winner, rounds_played, &session.words));
                    win = Some(WinRecord {
                        winner,
                        rounds_played,
                        words_played: session.words.len() as u64,
                    });
                } else {
                    // The roster shifted under the pointer; whoever now holds
                    // turn_index plays next. The chain letter is unchanged
                    // because no word was played, and the round's difficulty
                    // stands.
                    session.clamp_turn_index();
                    if let Some(prompt) = self.start_turn(conversation_id, &handle, &session) {
                        notes.push(prompt);
                    }
                    snapshot = Some(SessionSnapshot::from(&*session));
                }
            }
        }

        for note in notes {
            self.notify(conversation_id, note).await;
        }

        if let Some(win) = win {
            info!(
                conversation_id,
                winner = %win.winner,
                rounds = win.rounds_played,
                words = win.words_played,
                "game finished"
            );
            if let Err(err) = self
                .state()
                .store
                .record_win(&win.winner, win.words_played, u64::from(win.rounds_played))
                .await
            {
                warn!(conversation_id, error = %err, "failed to record winner statistics");
            }
            self.discard_session(conversation_id).await;
        } else if defunct {
            self.discard_session(conversation_id).await;
        } else if let Some(snapshot) = snapshot {
            self.persist(conversation_id, &snapshot).await;
        }
    }

    /// Current state of the conversation's game.
    pub async fn status(&self, conversation_id: &str) -> Result<StatusReport, AppError> {
        let handle = self.state().registry.get(conversation_id).ok_or_else(|| {
            DomainError::not_found(NotFoundKind::Game, "no word chain game running")
        })?;
        let session = handle.session.lock().await;
        Ok(StatusReport {
            state: session.state,
            mode: session.mode,
            players: session.players.clone(),
            current_player: match session.state {
                SessionState::Active => session.current_player().cloned(),
                _ => None,
            },
            round: session.round,
            words_played: session.words.len(),
            min_word_length: session.min_word_length,
        })
    }

    /// Administrative reset: drop the conversation's session regardless of
    /// state. Returns whether anything was removed.
    pub async fn reset(&self, conversation_id: &str) -> Result<bool, AppError> {
        if self.state().registry.get(conversation_id).is_none() {
            return Ok(false);
        }
        info!(conversation_id, "administrative reset");
        self.discard_session(conversation_id).await;
        self.notify(conversation_id, messages::game_reset()).await;
        Ok(true)
    }

    /// Startup recovery: timers do not survive a restart, so persisted
    /// sessions cannot be resumed fairly. Each one is announced as cancelled
    /// and cleared from the store. Returns how many were cleared.
    pub async fn recover(&self) -> Result<usize, AppError> {
        let entries = self.state().store.load_all().await.map_err(AppError::from)?;
        let mut cleared = 0usize;
        for (conversation_id, snapshot) in entries {
            if snapshot.state != SessionState::Finished {
                self.notify(&conversation_id, messages::cancelled_after_restart())
                    .await;
            }
            if let Err(err) = self.state().store.remove(&conversation_id).await {
                warn!(conversation_id, error = %err, "failed to clear stale snapshot");
            }
            cleared += 1;
        }
        if cleared > 0 {
            info!(cleared, "cleared stale sessions on startup");
        }
        Ok(cleared)
    }

    /// Drop a session everywhere: timers, registry slot and stored snapshot.
    pub(crate) async fn discard_session(&self, conversation_id: &str) {
        if let Some(handle) = self.state().registry.remove(conversation_id) {
            handle.cancel_timers();
        }
        if let Err(err) = self.state().store.remove(conversation_id).await {
            warn!(conversation_id, error = %err, "failed to remove stored snapshot");
        }
    }
}
