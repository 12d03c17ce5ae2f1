//! Outbound notification contract.
//!
//! The engine never talks to a chat platform directly; it hands formatted
//! notifications to a `NotificationSink` supplied by the embedding
//! application. Delivery failures are logged by the engine and never affect
//! game state.

pub mod messages;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::state::PlayerId;
use crate::errors::domain::DomainError;

/// One message bound for a conversation, with the players to mention.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub text: String,
    pub mentions: Vec<PlayerId>,
}

impl Notification {
    pub fn broadcast(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            mentions: Vec::new(),
        }
    }

    pub fn mention(text: impl Into<String>, player: impl Into<PlayerId>) -> Self {
        Self {
            text: text.into(),
            mentions: vec![player.into()],
        }
    }

    pub fn mention_all(text: impl Into<String>, players: &[PlayerId]) -> Self {
        Self {
            text: text.into(),
            mentions: players.to_vec(),
        }
    }
}

#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn send(&self, conversation_id: &str, note: Notification) -> Result<(), DomainError>;
}
