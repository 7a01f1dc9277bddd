//! In-process backing cache with LRU eviction.

use std::num::NonZeroUsize;
use std::sync::Arc;

use async_trait::async_trait;
use lru::LruCache;
use tether_types::HasSessionConfig;
use tether_types::config_defaults as defaults;
use tokio::sync::RwLock;
use tracing::{debug, trace};

use crate::backing::BackingCache;
use crate::error::Result;
use crate::key::SessionKey;
use crate::session::Session;

/// Backing cache that lives in the current process.
///
/// This cache provides:
/// - Bounded capacity with LRU eviction of the least recently used key
/// - Snapshot iteration that tolerates concurrent writers
/// - Thread-safe access via RwLock
///
/// Clones share the same storage, so one instance can be handed to the
/// registry while tests or the host keep another.
pub struct LocalCache {
    inner: Arc<RwLock<LruCache<SessionKey, Session>>>,
    capacity: usize,
}

impl LocalCache {
    /// Create a cache holding at most `max_sessions` entries.
    pub fn new(max_sessions: usize) -> Self {
        let cap = NonZeroUsize::new(max_sessions).unwrap_or(NonZeroUsize::MIN);
        Self {
            inner: Arc::new(RwLock::new(LruCache::new(cap))),
            capacity: cap.get(),
        }
    }

    /// Create a cache sized from a configuration provider.
    pub fn from_session_config<C: HasSessionConfig>(config: &C) -> Self {
        Self::new(config.max_sessions())
    }

    /// Get cache statistics.
    pub async fn stats(&self) -> CacheStats {
        let inner = self.inner.read().await;
        CacheStats {
            size: inner.len(),
            capacity: self.capacity,
        }
    }

    /// Check whether `key` is present without updating LRU order.
    pub async fn contains(&self, key: &SessionKey) -> bool {
        self.inner.read().await.contains(key)
    }
}

impl Default for LocalCache {
    fn default() -> Self {
        Self::new(defaults::MAX_SESSIONS)
    }
}

impl Clone for LocalCache {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            capacity: self.capacity,
        }
    }
}

#[async_trait]
impl BackingCache for LocalCache {
    async fn get(&self, key: &SessionKey) -> Result<Option<Session>> {
        let mut inner = self.inner.write().await;
        let found = inner.get(key).cloned();
        trace!(key = %key, hit = found.is_some(), "Local cache lookup");
        Ok(found)
    }

    async fn put(&self, key: SessionKey, session: Session) -> Result<()> {
        let mut inner = self.inner.write().await;

        if inner.len() >= self.capacity
            && !inner.contains(&key)
            && let Some((evicted, _)) = inner.peek_lru()
        {
            debug!(key = %evicted, "Evicting LRU session to make room");
        }

        inner.put(key, session);
        trace!(cache_size = inner.len(), "Session stored in local cache");
        Ok(())
    }

    async fn remove(&self, key: &SessionKey) -> Result<Option<Session>> {
        Ok(self.inner.write().await.pop(key))
    }

    async fn entries(&self) -> Result<Vec<(SessionKey, Session)>> {
        let inner = self.inner.read().await;
        Ok(inner
            .iter()
            .map(|(key, session)| (key.clone(), session.clone()))
            .collect())
    }

    async fn len(&self) -> Result<usize> {
        Ok(self.inner.read().await.len())
    }
}

/// Cache statistics.
#[derive(Debug, Clone)]
pub struct CacheStats {
    /// Current number of cached sessions.
    pub size: usize,

    /// Maximum capacity.
    pub capacity: usize,
}
