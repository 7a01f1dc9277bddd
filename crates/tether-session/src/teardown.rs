//! Write-back of sessions when their connection ends.

use async_trait::async_trait;
use tracing::{debug, trace, warn};

use crate::backing::SharedBackingCache;
use crate::connection::Connection;
use crate::error::Result;
use crate::events::ConnectionListener;

/// Persists a connection's managed session into the backing cache when the
/// connection is destroyed.
///
/// This is the only path that writes sessions into the cache. Until then a
/// session lives only in the memory of the connection that created it.
#[derive(Clone)]
pub struct TeardownListener {
    cache: SharedBackingCache,
}

impl TeardownListener {
    pub fn new(cache: SharedBackingCache) -> Self {
        Self { cache }
    }

    /// Write the connection's session back under its own key.
    ///
    /// Returns `false` without touching the cache when the connection holds
    /// a session from another provider.
    pub async fn write_back(&self, connection: &Connection) -> Result<bool> {
        let Some(session) = connection.session().managed() else {
            trace!(connection = %connection.id(), "Connection holds no managed session");
            return Ok(false);
        };

        let key = session.key();
        self.cache.put(key.clone(), session.clone()).await?;
        debug!(connection = %connection.id(), key = %key, "Session written back");
        Ok(true)
    }
}

#[async_trait]
impl ConnectionListener for TeardownListener {
    async fn on_connection_destroyed(&self, connection: &Connection) {
        if let Err(e) = self.write_back(connection).await {
            warn!(
                connection = %connection.id(),
                error = %e,
                "Failed to write back session on teardown"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backing::BackingCache;
    use crate::cache::LocalCache;
    use crate::connection::ConnectionSession;
    use crate::session::Session;
    use std::sync::Arc;
    use std::time::Duration;

    #[tokio::test]
    async fn test_managed_session_written_under_own_key() {
        let cache = LocalCache::new(10);
        let listener = TeardownListener::new(Arc::new(cache.clone()));
        let session = Session::with_id("u1", "app", Duration::from_secs(60));

        let written = listener
            .write_back(&Connection::new(session.clone()))
            .await
            .unwrap();

        assert!(written);
        assert_eq!(cache.get(&session.key()).await.unwrap(), Some(session));
    }

    #[tokio::test]
    async fn test_foreign_session_ignored() {
        let cache = LocalCache::new(10);
        let listener = TeardownListener::new(Arc::new(cache.clone()));
        let conn = Connection::new(ConnectionSession::Foreign {
            id: "x".into(),
            identifier: "app".into(),
        });

        listener.on_connection_destroyed(&conn).await;

        assert_eq!(cache.len().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_write_back_overwrites() {
        let cache = LocalCache::new(10);
        let listener = TeardownListener::new(Arc::new(cache.clone()));
        let stale = Session::with_id("u1", "app", Duration::from_secs(60))
            .with_last_accessed_at(chrono::Utc::now() - chrono::Duration::hours(2));
        cache.put(stale.key(), stale).await.unwrap();

        let fresh = Session::with_id("u1", "app", Duration::from_secs(60));
        listener
            .on_connection_destroyed(&Connection::new(fresh.clone()))
            .await;

        assert_eq!(cache.len().await.unwrap(), 1);
        let stored = cache.get(&fresh.key()).await.unwrap().unwrap();
        assert!(!stored.is_expired());
    }
}
