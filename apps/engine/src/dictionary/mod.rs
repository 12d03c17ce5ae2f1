//! External dictionary validation.
//!
//! The engine asks a dictionary whether a lowercased word is real. Lookups
//! are the only externally-bounded suspension point in the engine; they run
//! under a request timeout and never while a session lock is held. Errors
//! propagate so the caller can fail closed.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache;
use reqwest::StatusCode;
use tracing::debug;

use crate::config::EngineConfig;
use crate::errors::domain::{DomainError, InfraErrorKind};

#[async_trait]
pub trait Dictionary: Send + Sync {
    /// `Ok(true)` for a known word, `Ok(false)` for a confirmed non-word,
    /// `Err` when the lookup itself failed.
    async fn lookup(&self, word: &str) -> Result<bool, DomainError>;
}

/// Client for dictionaryapi.dev-style services: 200 means the word exists,
/// 404 means it does not.
pub struct HttpDictionary {
    client: reqwest::Client,
    base_url: String,
}

impl HttpDictionary {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, DomainError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| {
                DomainError::infra(
                    InfraErrorKind::DictionaryUnavailable,
                    format!("failed to build dictionary client: {err}"),
                )
            })?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }
}

#[async_trait]
impl Dictionary for HttpDictionary {
    async fn lookup(&self, word: &str) -> Result<bool, DomainError> {
        let url = format!("{}/{}", self.base_url.trim_end_matches('/'), word);
        let response = self.client.get(&url).send().await.map_err(|err| {
            let kind = if err.is_timeout() {
                InfraErrorKind::Timeout
            } else {
                InfraErrorKind::DictionaryUnavailable
            };
            DomainError::infra(kind, format!("dictionary lookup for '{word}' failed: {err}"))
        })?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(false),
            status if status.is_success() => Ok(true),
            status => Err(DomainError::infra(
                InfraErrorKind::DictionaryUnavailable,
                format!("dictionary returned {status} for '{word}'"),
            )),
        }
    }
}

/// Caches both positive and negative verdicts to bound lookup latency and
/// load on the upstream service. Errors are never cached.
pub struct CachedDictionary {
    inner: Arc<dyn Dictionary>,
    cache: Cache<String, bool>,
}

impl CachedDictionary {
    pub fn new(inner: Arc<dyn Dictionary>, capacity: u64) -> Self {
        Self {
            inner,
            cache: Cache::new(capacity),
        }
    }
}

#[async_trait]
impl Dictionary for CachedDictionary {
    async fn lookup(&self, word: &str) -> Result<bool, DomainError> {
        if let Some(verdict) = self.cache.get(word).await {
            debug!(word, verdict, "dictionary cache hit");
            return Ok(verdict);
        }
        let verdict = self.inner.lookup(word).await?;
        self.cache.insert(word.to_string(), verdict).await;
        Ok(verdict)
    }
}

/// Build the production dictionary stack from config: HTTP client wrapped in
/// a verdict cache.
pub fn from_config(config: &EngineConfig) -> Result<Arc<dyn Dictionary>, DomainError> {
    let http = HttpDictionary::new(config.dictionary_url.clone(), config.dictionary_timeout)?;
    Ok(Arc::new(CachedDictionary::new(
        Arc::new(http),
        config.dictionary_cache_capacity,
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingDictionary {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Dictionary for CountingDictionary {
        async fn lookup(&self, word: &str) -> Result<bool, DomainError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(word.len() > 2)
        }
    }

    #[tokio::test]
    async fn cache_serves_repeat_lookups_without_recomputing() {
        let inner = Arc::new(CountingDictionary {
            calls: AtomicUsize::new(0),
        });
        let cached = CachedDictionary::new(inner.clone(), 16);

        assert!(cached.lookup("cat").await.unwrap());
        assert!(cached.lookup("cat").await.unwrap());
        assert!(!cached.lookup("at").await.unwrap());
        assert!(!cached.lookup("at").await.unwrap());

        assert_eq!(inner.calls.load(Ordering::SeqCst), 2);
    }
}
