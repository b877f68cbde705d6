use serde::{de::DeserializeOwned, Serialize};
use sha2::{Digest, Sha256};
use std::fmt::Display;
use std::sync::Arc;
use std::time::Duration;

use crate::error::AppResult;

use super::memory::MemoryStore;

/// Backing store for cached upstream responses
///
/// Values are opaque JSON strings. Entries expire by age only; there is no
/// access-based eviction.
#[async_trait::async_trait]
pub trait CacheStore: Send + Sync {
    async fn get(&self, key: &str) -> AppResult<Option<String>>;

    /// Last write wins
    async fn set(&self, key: &str, value: String, ttl: Duration);

    /// Store name for logging and debugging
    fn name(&self) -> &'static str;
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    /// Recording search, keyed by every parameter that shapes the result
    Recordings {
        query: String,
        limit: u32,
        offset: u32,
    },
    /// Front cover URL for a release group
    CoverArt(String),
}

fn digest(raw: &str) -> String {
    hex::encode(Sha256::digest(raw.as_bytes()))
}

impl Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CacheKey::Recordings {
                query,
                limit,
                offset,
            } => {
                let raw = format!("{}|{}|{}", limit, offset, query.trim().to_lowercase());
                write!(f, "mbz:recs:{}", digest(&raw))
            }
            CacheKey::CoverArt(release_group_id) => {
                write!(f, "caa:rg:{}", digest(release_group_id.trim()))
            }
        }
    }
}

/// Typed JSON access to a [`CacheStore`]
///
/// Cache trouble is never fatal: failed reads and undecodable payloads are
/// logged and reported as misses.
#[derive(Clone)]
pub struct Cache {
    store: Arc<dyn CacheStore>,
    ttl: Duration,
}

impl Cache {
    pub fn new(store: Arc<dyn CacheStore>, ttl: Duration) -> Self {
        Self { store, ttl }
    }

    /// Process-local cache, used when no Redis URL is configured
    pub fn in_memory(ttl: Duration) -> Self {
        Self::new(Arc::new(MemoryStore::new()), ttl)
    }

    /// Default time-to-live for entries written through this cache
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Retrieves and decodes a value, or `None` on miss
    pub async fn get_from_cache<T: DeserializeOwned>(&self, key: &CacheKey) -> Option<T> {
        let key = key.to_string();
        let json = match self.store.get(&key).await {
            Ok(Some(json)) => json,
            Ok(None) => {
                tracing::debug!(key = %key, store = self.store.name(), "Cache miss");
                return None;
            }
            Err(e) => {
                tracing::warn!(error = %e, key = %key, "Cache read failed, treating as miss");
                return None;
            }
        };

        match serde_json::from_str(&json) {
            Ok(value) => {
                tracing::debug!(key = %key, store = self.store.name(), "Cache hit");
                Some(value)
            }
            Err(e) => {
                tracing::warn!(error = %e, key = %key, "Cache deserialization error");
                None
            }
        }
    }

    /// Serializes and stores a value with the given TTL
    pub async fn store<T: Serialize>(&self, key: &CacheKey, value: &T, ttl: Duration) {
        let json = match serde_json::to_string(value) {
            Ok(j) => j,
            Err(e) => {
                tracing::error!(error = %e, "Cache serialization error");
                return;
            }
        };

        self.store.set(&key.to_string(), json, ttl).await;
    }
}
