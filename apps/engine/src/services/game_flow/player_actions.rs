//! Word submission pipeline.

use tracing::{debug, info, warn};

use super::{GameFlowService, SubmitOutcome};
use crate::domain::difficulty::params_for;
use crate::domain::state::SessionState;
use crate::domain::words::{check_word, RejectReason};
use crate::error::AppError;
use crate::notify::messages;
use crate::store::SessionSnapshot;

impl GameFlowService {
    /// Route a plain-text message from a conversation through the
    /// word-acceptance pipeline.
    ///
    /// Out-of-turn input is expected noise in a shared channel and is
    /// silently ignored. Lexical rejections are reported to the sender
    /// without mutating state. The dictionary lookup runs without the
    /// session lock; the result is discarded if the turn moved on in the
    /// meantime, and a lookup failure rejects the word fail-closed.
    pub async fn submit_word(
        &self,
        conversation_id: &str,
        sender_id: &str,
        text: &str,
    ) -> Result<SubmitOutcome, AppError> {
        let Some(handle) = self.state().registry.get(conversation_id) else {
            return Ok(SubmitOutcome::Ignored);
        };
        let word = text.trim().to_lowercase();

        // Phase 1: lexical checks under the session lock.
        let epoch = {
            let session = handle.session.lock().await;
            if session.state != SessionState::Active {
                return Ok(SubmitOutcome::Ignored);
            }
            if session.current_player().map(String::as_str) != Some(sender_id) {
                debug!(conversation_id, sender_id, "ignoring out-of-turn message");
                return Ok(SubmitOutcome::Ignored);
            }
            if let Err(reason) = check_word(
                &word,
                &session.used_words,
                session.min_word_length,
                session.chain_letter,
            ) {
                drop(session);
                self.notify(
                    conversation_id,
                    messages::word_rejected(&sender_id.to_string(), reason),
                )
                .await;
                return Ok(SubmitOutcome::Rejected(reason));
            }
            session.turn_epoch
        };

        // Phase 2: dictionary validation, outside the lock. This is the only
        // externally-bounded wait in a transition.
        let verdict = self.state().dictionary.lookup(&word).await;

        // Phase 3: re-acquire and re-validate before applying the result.
        let (snapshot, notes) = {
            let mut session = handle.session.lock().await;
            if session.state != SessionState::Active || session.turn_epoch != epoch {
                debug!(conversation_id, "turn moved on during dictionary lookup");
                return Ok(SubmitOutcome::Ignored);
            }

            let reason = match verdict {
                Ok(true) => None,
                Ok(false) => Some(RejectReason::NotAWord),
                Err(err) => {
                    warn!(conversation_id, word, error = %err, "dictionary lookup failed, rejecting fail-closed");
                    Some(RejectReason::Unverifiable)
                }
            };
            if let Some(reason) = reason {
                drop(session);
                self.notify(
                    conversation_id,
                    messages::word_rejected(&sender_id.to_string(), reason),
                )
                .await;
                return Ok(SubmitOutcome::Rejected(reason));
            }

            // Accepted: record the word, advance the turn, rescale difficulty.
            session.record_word(&word);
            session.turn_epoch += 1;
            if session.advance_turn() {
                session.round += 1;
                let params = params_for(session.mode, session.round);
                session.apply_params(params);
            }

            info!(
                conversation_id,
                player = sender_id,
                word,
                round = session.round,
                "word accepted"
            );

            let mut notes = vec![messages::word_accepted(&sender_id.to_string(), &word)];
            if let Some(prompt) = self.start_turn(conversation_id, &handle, &session) {
                notes.push(prompt);
            }
            (SessionSnapshot::from(&*session), notes)
        };

        self.persist(conversation_id, &snapshot).await;
        for note in notes {
            self.notify(conversation_id, note).await;
        }
        Ok(SubmitOutcome::Accepted)
    }
}
