//! Turn and lobby timer scheduling.
//!
//! Each armed batch (lobby reminder + deadline, or turn warnings + timeout)
//! belongs to the session handle's current `CancellationToken` and carries
//! the `turn_epoch` it was armed for. Arming a new batch cancels the old one,
//! and every callback re-checks session state (and epoch) under the lock
//! before acting, so a timer that loses the race to a just-accepted word is
//! a no-op.

use std::sync::Arc;

use tokio::time::sleep;
use tracing::{debug, warn};

use crate::domain::state::{Session, SessionState};
use crate::notify::messages;
use crate::notify::Notification;
use crate::services::game_flow::GameFlowService;
use crate::services::registry::SessionHandle;

impl GameFlowService {
    /// Arm the recruitment timers: the periodic reminder and the one-shot
    /// lobby deadline.
    pub(crate) fn arm_lobby_timers(&self, conversation_id: &str, handle: &Arc<SessionHandle>) {
        let token = handle.begin_timer_batch();
        let config = &self.state().config;
        let remind_every = config.scaled(config.lobby_reminder_units);
        let wait = config.scaled(config.lobby_wait_units);

        let service = self.clone();
        let conv = conversation_id.to_string();
        let reminder_token = token.clone();
        handle.track_timer(tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = reminder_token.cancelled() => return,
                    _ = sleep(remind_every) => {
                        if !service.lobby_reminder(&conv).await {
                            return;
                        }
                    }
                }
            }
        }));

        let service = self.clone();
        let conv = conversation_id.to_string();
        handle.track_timer(tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {}
                _ = sleep(wait) => service.resolve_lobby(&conv).await,
            }
        }));
    }

    /// Start the current player's turn: cancel the previous batch, arm the
    /// pre-deadline warnings and the timeout, and return the turn prompt for
    /// the caller to deliver once the session lock is released.
    ///
    /// Must be called with the session lock held so the armed epoch matches
    /// the state being announced.
    pub(crate) fn start_turn(
        &self,
        conversation_id: &str,
        handle: &Arc<SessionHandle>,
        session: &Session,
    ) -> Option<Notification> {
        let token = handle.begin_timer_batch();
        let config = &self.state().config;
        let epoch = session.turn_epoch;
        let deadline_units = session.turn_deadline_units;

        let player = match session.current_player() {
            Some(player) => player.clone(),
            None => {
                // Roster invariant broken; don't arm anything against it.
                warn!(conversation_id, "no current player while arming turn timers");
                return None;
            }
        };

        for &offset in &config.warning_offset_units {
            if deadline_units > offset {
                let fire_in = config.scaled(deadline_units - offset);
                let service = self.clone();
                let conv = conversation_id.to_string();
                let warned = player.clone();
                let warn_token = token.clone();
                handle.track_timer(tokio::spawn(async move {
                    tokio::select! {
                        _ = warn_token.cancelled() => {}
                        _ = sleep(fire_in) => {
                            service.turn_warning(&conv, epoch, &warned, offset).await;
                        }
                    }
                }));
            }
        }

        let deadline = config.scaled(deadline_units);
        let service = self.clone();
        let conv = conversation_id.to_string();
        handle.track_timer(tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {}
                _ = sleep(deadline) => service.handle_turn_timeout(&conv, epoch).await,
            }
        }));

        Some(messages::turn_prompt(
            &player,
            session.round,
            session.chain_letter,
            session.min_word_length,
            deadline_units,
        ))
    }

    /// Emit a countdown warning unless the turn it was armed for has ended.
    async fn turn_warning(
        &self,
        conversation_id: &str,
        epoch: u64,
        player: &str,
        remaining_units: f64,
    ) {
        let Some(handle) = self.state().registry.get(conversation_id) else {
            return;
        };
        {
            let session = handle.session.lock().await;
            if session.state != SessionState::Active || session.turn_epoch != epoch {
                debug!(conversation_id, epoch, "stale turn warning dropped");
                return;
            }
        }
        self.notify(
            conversation_id,
            messages::turn_warning(&player.to_string(), remaining_units),
        )
        .await;
    }
}
