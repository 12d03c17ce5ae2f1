//! Shared helpers for unit and integration tests: deterministic collaborator
//! doubles and a state builder with millisecond-scale timing.

pub mod doubles;
pub mod state_builder;

pub use doubles::{ChannelSink, NoteRx, StaticDictionary};
pub use state_builder::TestStateBuilder;

use std::time::Duration;

use crate::notify::Notification;
use crate::services::GameFlowService;

/// Pin the required first letter of the current turn. The shared starting
/// letter is random; scenario tests pin it so fixed word lists line up.
pub async fn set_chain_letter(service: &GameFlowService, conversation_id: &str, letter: char) {
    let handle = service
        .state()
        .registry
        .get(conversation_id)
        .expect("no session for conversation");
    handle.session.lock().await.chain_letter = Some(letter);
}

/// Receive the next notification, failing the test after a bounded wait.
pub async fn next_note(rx: &mut NoteRx) -> (String, Notification) {
    tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .expect("timed out waiting for a notification")
        .expect("notification channel closed")
}

/// Receive notifications until one contains `needle`; panics after a bounded
/// wait. Intermediate notifications are discarded.
pub async fn note_containing(rx: &mut NoteRx, needle: &str) -> (String, Notification) {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
    loop {
        let remaining = deadline
            .checked_duration_since(tokio::time::Instant::now())
            .unwrap_or_else(|| panic!("no notification containing '{needle}' arrived"));
        let (conv, note) = tokio::time::timeout(remaining, rx.recv())
            .await
            .unwrap_or_else(|_| panic!("timed out waiting for a note containing '{needle}'"))
            .expect("notification channel closed");
        if note.text.contains(needle) {
            return (conv, note);
        }
    }
}

/// Drain everything currently buffered without waiting.
pub fn drain_notes(rx: &mut NoteRx) -> Vec<(String, Notification)> {
    let mut out = Vec::new();
    while let Ok(item) = rx.try_recv() {
        out.push(item);
    }
    out
}
