//! Backing cache capability.
//!
//! The registry never owns session storage. It talks to a shared key-value
//! store through [`BackingCache`], which may be an in-process map
//! ([`LocalCache`](crate::LocalCache)) or a client for a distributed cache.
//! Replication and persistence are the implementation's concern.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::Result;
use crate::key::SessionKey;
use crate::session::Session;

/// Key-value store of sessions shared across processes.
///
/// Implementations must be safe for concurrent `get`/`put`/`remove`/`entries`
/// from many callers. `entries` may return a weakly consistent snapshot;
/// entries added or removed while it runs may or may not be included.
#[async_trait]
pub trait BackingCache: Send + Sync {
    /// Read the session stored under `key`.
    async fn get(&self, key: &SessionKey) -> Result<Option<Session>>;

    /// Insert or overwrite the session stored under `key`.
    async fn put(&self, key: SessionKey, session: Session) -> Result<()>;

    /// Remove the entry for `key`, returning what was stored.
    ///
    /// Removing an absent key is not an error.
    async fn remove(&self, key: &SessionKey) -> Result<Option<Session>>;

    /// Snapshot of all entries currently visible.
    async fn entries(&self) -> Result<Vec<(SessionKey, Session)>>;

    /// Number of entries currently visible.
    async fn len(&self) -> Result<usize>;

    /// Whether the cache holds no entries.
    async fn is_empty(&self) -> Result<bool> {
        Ok(self.len().await? == 0)
    }
}

/// Shared handle to a backing cache.
pub type SharedBackingCache = Arc<dyn BackingCache>;
