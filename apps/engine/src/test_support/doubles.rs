//! Deterministic in-process doubles for the external collaborators.

use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::dictionary::Dictionary;
use crate::errors::domain::{DomainError, InfraErrorKind};
use crate::notify::{Notification, NotificationSink};

/// Dictionary backed by a fixed word list, with an optional artificial delay
/// (for exercising the lookup race) and a fail switch (for fail-closed
/// behavior).
pub struct StaticDictionary {
    words: HashSet<String>,
    fail: bool,
    delay: Option<Duration>,
}

impl StaticDictionary {
    pub fn new(words: &[&str]) -> Self {
        Self {
            words: words.iter().map(|w| w.to_lowercase()).collect(),
            fail: false,
            delay: None,
        }
    }

    pub fn failing() -> Self {
        Self {
            words: HashSet::new(),
            fail: true,
            delay: None,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

#[async_trait]
impl Dictionary for StaticDictionary {
    async fn lookup(&self, word: &str) -> Result<bool, DomainError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail {
            return Err(DomainError::infra(
                InfraErrorKind::DictionaryUnavailable,
                "static dictionary configured to fail",
            ));
        }
        Ok(self.words.contains(word))
    }
}

pub type NoteRx = mpsc::UnboundedReceiver<(String, Notification)>;

/// Sink that forwards every notification to an unbounded channel so tests can
/// assert on the emitted stream.
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<(String, Notification)>,
}

impl ChannelSink {
    pub fn new() -> (Self, NoteRx) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

#[async_trait]
impl NotificationSink for ChannelSink {
    async fn send(&self, conversation_id: &str, note: Notification) -> Result<(), DomainError> {
        self.tx
            .send((conversation_id.to_string(), note))
            .map_err(|_| {
                DomainError::infra(InfraErrorKind::Other("sink".into()), "note channel closed")
            })
    }
}
