//! Recruitment: starting a lobby, joining, leaving, and lobby resolution.

use time::OffsetDateTime;
use tracing::{debug, info, warn};

use super::GameFlowService;
use crate::domain::difficulty::{params_for, Mode};
use crate::domain::state::{Session, SessionState};
use crate::errors::domain::{ConflictKind, DomainError, NotFoundKind};
use crate::error::AppError;
use crate::notify::messages;
use crate::notify::Notification;
use crate::store::SessionSnapshot;
use crate::utils::letters::random_letter;

impl GameFlowService {
    /// Open a recruitment lobby with the starter auto-enrolled as player 0.
    ///
    /// Fails with a `GameAlreadyActive` conflict when the conversation
    /// already has a live session.
    pub async fn start(
        &self,
        conversation_id: &str,
        starter_id: &str,
        mode: Mode,
    ) -> Result<(), AppError> {
        let session = Session::new_lobby(
            conversation_id,
            starter_id,
            mode,
            params_for(mode, 0),
            OffsetDateTime::now_utc(),
        );
        let snapshot = SessionSnapshot::from(&session);
        let handle = self
            .state()
            .registry
            .create(conversation_id.to_string(), session)?;

        info!(conversation_id, starter_id, %mode, "word chain lobby opened");

        self.arm_lobby_timers(conversation_id, &handle);
        self.persist(conversation_id, &snapshot).await;

        let config = &self.state().config;
        self.notify(
            conversation_id,
            messages::lobby_open(
                &starter_id.to_string(),
                mode,
                config.lobby_wait_units,
                config.max_players,
            ),
        )
        .await;
        Ok(())
    }

    /// Add a player to the roster. Only valid while the lobby is recruiting.
    pub async fn join(&self, conversation_id: &str, player_id: &str) -> Result<usize, AppError> {
        let handle = self.state().registry.get(conversation_id).ok_or_else(|| {
            DomainError::not_found(NotFoundKind::Game, "no word chain game to join")
        })?;

        let (player_count, snapshot) = {
            let mut session = handle.session.lock().await;
            if session.state != SessionState::Lobby {
                return Err(DomainError::validation("the game has already started").into());
            }
            if session.players.iter().any(|p| p == player_id) {
                return Err(DomainError::conflict(
                    ConflictKind::AlreadyJoined,
                    "you already joined the game",
                )
                .into());
            }
            if session.players.len() >= self.state().config.max_players {
                return Err(DomainError::validation(format!(
                    "player limit reached ({})",
                    self.state().config.max_players
                ))
                .into());
            }
            session.players.push(player_id.to_string());
            (session.players.len(), SessionSnapshot::from(&*session))
        };

        debug!(conversation_id, player_id, player_count, "player joined lobby");
        self.persist(conversation_id, &snapshot).await;
        self.notify(
            conversation_id,
            messages::player_joined(&player_id.to_string(), player_count),
        )
        .await;
        Ok(player_count)
    }

    /// Remove a player from the lobby roster; cancels the game if the roster
    /// empties.
    pub async fn leave(&self, conversation_id: &str, player_id: &str) -> Result<(), AppError> {
        let handle = self.state().registry.get(conversation_id).ok_or_else(|| {
            DomainError::not_found(NotFoundKind::Game, "no word chain game to leave")
        })?;

        enum After {
            Cancelled,
            Remaining(usize, SessionSnapshot),
        }

        let after = {
            let mut session = handle.session.lock().await;
            if session.state != SessionState::Lobby {
                return Err(
                    DomainError::validation("the game has already started, you cannot leave now")
                        .into(),
                );
            }
            let position = session
                .players
                .iter()
                .position(|p| p == player_id)
                .ok_or_else(|| {
                    DomainError::not_found(NotFoundKind::Player, "you are not in the lobby")
                })?;
            session.players.remove(position);
            session.clamp_turn_index();
            if session.players.is_empty() {
                handle.cancel_timers();
                After::Cancelled
            } else {
                After::Remaining(session.players.len(), SessionSnapshot::from(&*session))
            }
        };

        match after {
            After::Cancelled => {
                info!(conversation_id, "lobby emptied, cancelling game");
                self.discard_session(conversation_id).await;
                self.notify(conversation_id, messages::cancelled_roster_empty())
                    .await;
            }
            After::Remaining(player_count, snapshot) => {
                debug!(conversation_id, player_id, player_count, "player left lobby");
                self.persist(conversation_id, &snapshot).await;
                self.notify(
                    conversation_id,
                    messages::player_left(&player_id.to_string(), player_count),
                )
                .await;
            }
        }
        Ok(())
    }

    /// Periodic recruitment reminder. Returns false once the session has
    /// left the lobby so the ticker stops itself.
    pub(crate) async fn lobby_reminder(&self, conversation_id: &str) -> bool {
        let Some(handle) = self.state().registry.get(conversation_id) else {
            return false;
        };
        let player_count = {
            let session = handle.session.lock().await;
            if session.state != SessionState::Lobby {
                return false;
            }
            session.players.len()
        };
        self.notify(conversation_id, messages::lobby_reminder(player_count))
            .await;
        true
    }

    /// Lobby deadline: cancel with too few players, otherwise go Active with
    /// a shared random starting letter and player 0 on turn.
    pub(crate) async fn resolve_lobby(&self, conversation_id: &str) {
        let Some(handle) = self.state().registry.get(conversation_id) else {
            return;
        };

        enum Outcome {
            Cancel,
            Started {
                notes: Vec<Notification>,
                snapshot: SessionSnapshot,
            },
        }

        let outcome = {
            let mut session = handle.session.lock().await;
            if session.state != SessionState::Lobby {
                return;
            }
            if session.players.len() < self.state().config.min_players {
                handle.cancel_timers();
                Outcome::Cancel
            } else {
                session.state = SessionState::Active;
                session.chain_letter = Some(random_letter());
                session.turn_index = 0;
                session.turn_epoch += 1;
                let params = params_for(session.mode, session.round);
                session.apply_params(params);

                let mut notes = vec![messages::game_starting(
                    &session.players,
                    session.chain_letter.unwrap_or('?'),
                )];
                // start_turn also cancels the lobby reminder/deadline batch.
                if let Some(prompt) = self.start_turn(conversation_id, &handle, &session) {
                    notes.push(prompt);
                }
                info!(
                    conversation_id,
                    players = session.players.len(),
                    "lobby resolved, game is active"
                );
                Outcome::Started {
                    notes,
                    snapshot: SessionSnapshot::from(&*session),
                }
            }
        };

        match outcome {
            Outcome::Cancel => {
                warn!(conversation_id, "lobby deadline with too few players, cancelling");
                self.discard_session(conversation_id).await;
                self.notify(conversation_id, messages::cancelled_not_enough_players())
                    .await;
            }
            Outcome::Started { notes, snapshot } => {
                self.persist(conversation_id, &snapshot).await;
                for note in notes {
                    self.notify(conversation_id, note).await;
                }
            }
        }
    }
}
