//! Conversation-to-session registry.
//!
//! Enforces at most one live session per conversation. Each entry owns the
//! session's exclusive lock and its timer supervisor, so every timer dies
//! with the session instead of lingering in a global map.

use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::domain::state::{ConversationId, Session};
use crate::errors::domain::{ConflictKind, DomainError};

/// One live session plus the infrastructure guarding it.
pub struct SessionHandle {
    /// Exclusive access for every mutating transition.
    pub session: tokio::sync::Mutex<Session>,
    timers: parking_lot::Mutex<TimerBatch>,
}

struct TimerBatch {
    token: CancellationToken,
    tasks: Vec<JoinHandle<()>>,
}

impl TimerBatch {
    fn new() -> Self {
        Self {
            token: CancellationToken::new(),
            tasks: Vec::new(),
        }
    }

    fn cancel(&mut self) {
        self.token.cancel();
        // Dropping the handles detaches the tasks; the token stops them at
        // their next select point without interrupting an in-flight no-op.
        self.tasks.clear();
    }
}

impl SessionHandle {
    fn new(session: Session) -> Self {
        Self {
            session: tokio::sync::Mutex::new(session),
            timers: parking_lot::Mutex::new(TimerBatch::new()),
        }
    }

    /// Cancel whatever timers are armed and start a fresh batch. Returns the
    /// token the new batch's tasks must select on.
    pub fn begin_timer_batch(&self) -> CancellationToken {
        let mut timers = self.timers.lock();
        timers.cancel();
        *timers = TimerBatch::new();
        timers.token.clone()
    }

    /// Track a spawned timer task in the current batch.
    pub fn track_timer(&self, task: JoinHandle<()>) {
        self.timers.lock().tasks.push(task);
    }

    /// Cancel all armed timers without starting a new batch.
    pub fn cancel_timers(&self) {
        self.timers.lock().cancel();
    }
}

impl std::fmt::Debug for SessionHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionHandle").finish_non_exhaustive()
    }
}

impl Drop for SessionHandle {
    fn drop(&mut self) {
        self.timers.lock().cancel();
    }
}

#[derive(Default)]
pub struct SessionRegistry {
    sessions: DashMap<ConversationId, Arc<SessionHandle>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self {
            sessions: DashMap::new(),
        }
    }

    /// Insert a fresh session, failing if the conversation already has one.
    pub fn create(
        &self,
        conversation_id: ConversationId,
        session: Session,
    ) -> Result<Arc<SessionHandle>, DomainError> {
        match self.sessions.entry(conversation_id) {
            Entry::Occupied(_) => Err(DomainError::conflict(
                ConflictKind::GameAlreadyActive,
                "a word chain game is already running in this conversation",
            )),
            Entry::Vacant(slot) => {
                let handle = Arc::new(SessionHandle::new(session));
                slot.insert(handle.clone());
                Ok(handle)
            }
        }
    }

    pub fn get(&self, conversation_id: &str) -> Option<Arc<SessionHandle>> {
        self.sessions.get(conversation_id).map(|h| h.clone())
    }

    /// Remove and return the handle; the caller is responsible for having
    /// cancelled its timers (the handle also cancels on drop).
    pub fn remove(&self, conversation_id: &str) -> Option<Arc<SessionHandle>> {
        self.sessions.remove(conversation_id).map(|(_, h)| h)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
