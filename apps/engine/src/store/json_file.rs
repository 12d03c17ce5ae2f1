//! Single-document JSON store with atomic replacement.
//!
//! Each mutation rewrites the whole document to a sibling temp file and
//! renames it over the target, so readers never observe a torn write. An
//! internal mutex serializes read-modify-write cycles across conversations.

use std::path::PathBuf;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::errors::domain::{DomainError, InfraErrorKind};
use crate::store::{PlayerStats, SessionSnapshot, SnapshotStore, StoreDocument};

pub struct JsonFileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    async fn read_document(&self) -> Result<StoreDocument, DomainError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|err| {
                DomainError::infra(
                    InfraErrorKind::DataCorruption,
                    format!("snapshot document at {} is unreadable: {err}", self.path.display()),
                )
            }),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(StoreDocument::default()),
            Err(err) => Err(DomainError::infra(
                InfraErrorKind::StoreUnavailable,
                format!("failed to read {}: {err}", self.path.display()),
            )),
        }
    }

    async fn write_document(&self, document: &StoreDocument) -> Result<(), DomainError> {
        let bytes = serde_json::to_vec_pretty(document).map_err(|err| {
            DomainError::infra(
                InfraErrorKind::Other("serialize".into()),
                format!("failed to serialize snapshot document: {err}"),
            )
        })?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, &bytes).await.map_err(|err| {
            DomainError::infra(
                InfraErrorKind::StoreUnavailable,
                format!("failed to write {}: {err}", tmp.display()),
            )
        })?;
        tokio::fs::rename(&tmp, &self.path).await.map_err(|err| {
            DomainError::infra(
                InfraErrorKind::StoreUnavailable,
                format!("failed to replace {}: {err}", self.path.display()),
            )
        })
    }
}

#[async_trait]
impl SnapshotStore for JsonFileStore {
    async fn save(
        &self,
        conversation_id: &str,
        snapshot: &SessionSnapshot,
    ) -> Result<(), DomainError> {
        let _guard = self.lock.lock().await;
        let mut document = self.read_document().await?;
        document
            .sessions
            .insert(conversation_id.to_string(), snapshot.clone());
        self.write_document(&document).await
    }

    async fn remove(&self, conversation_id: &str) -> Result<(), DomainError> {
        let _guard = self.lock.lock().await;
        let mut document = self.read_document().await?;
        if document.sessions.remove(conversation_id).is_some() {
            self.write_document(&document).await?;
        }
        Ok(())
    }

    async fn load_all(&self) -> Result<Vec<(String, SessionSnapshot)>, DomainError> {
        let _guard = self.lock.lock().await;
        let document = self.read_document().await?;
        Ok(document.sessions.into_iter().collect())
    }

    async fn record_win(
        &self,
        player_id: &str,
        words_played: u64,
        rounds_played: u64,
    ) -> Result<(), DomainError> {
        let _guard = self.lock.lock().await;
        let mut document = self.read_document().await?;
        document.credit_win(player_id, words_played, rounds_played);
        self.write_document(&document).await
    }

    async fn player_stats(&self, player_id: &str) -> Result<Option<PlayerStats>, DomainError> {
        let _guard = self.lock.lock().await;
        let document = self.read_document().await?;
        Ok(document.stats.get(player_id).copied())
    }
}
