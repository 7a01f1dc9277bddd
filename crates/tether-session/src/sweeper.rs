//! Periodic eviction of expired sessions.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tracing::{debug, trace, warn};

use crate::backing::SharedBackingCache;
use crate::key::SessionKey;
use crate::scheduler::PeriodicTask;

/// Scans the backing cache and removes expired sessions.
///
/// Removals are dispatched as detached tasks and never awaited, so a slow
/// or failing removal cannot stall the scan. A failed removal leaves the
/// entry in place, where the next pass finds it expired again.
///
/// Removal is by key alone. A write-back that refreshes the same key after
/// the scan has read it but before its removal runs is deleted as well.
#[derive(Clone)]
pub struct ExpirySweeper {
    cache: SharedBackingCache,
}

/// Outcome of one sweep pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// Entries examined.
    pub scanned: usize,
    /// Entries found expired and scheduled for removal.
    pub expired: usize,
}

impl ExpirySweeper {
    pub fn new(cache: SharedBackingCache) -> Self {
        Self { cache }
    }

    /// Run one full pass over the cache.
    ///
    /// Must be called from within a Tokio runtime.
    pub async fn sweep(&self) -> SweepReport {
        let entries = match self.cache.entries().await {
            Ok(entries) => entries,
            Err(e) => {
                warn!(error = %e, "Session sweep could not read the backing cache");
                return SweepReport::default();
            }
        };

        let now = Utc::now();
        let mut report = SweepReport {
            scanned: entries.len(),
            expired: 0,
        };

        for (key, session) in entries {
            if session.is_expired_at(now) {
                debug!(session = %session, "Expiring session");
                self.remove_detached(key);
                report.expired += 1;
            }
        }

        if report.expired > 0 {
            debug!(
                scanned = report.scanned,
                expired = report.expired,
                "Swept expired sessions"
            );
        } else {
            trace!(scanned = report.scanned, "Session sweep found nothing to expire");
        }

        report
    }

    fn remove_detached(&self, key: SessionKey) {
        let cache = Arc::clone(&self.cache);
        tokio::spawn(async move {
            if let Err(e) = cache.remove(&key).await {
                debug!(key = %key, error = %e, "Session removal failed, next sweep will retry");
            }
        });
    }
}

#[async_trait]
impl PeriodicTask for ExpirySweeper {
    async fn run(&self) {
        self.sweep().await;
    }

    fn name(&self) -> &str {
        "session-expiry-sweep"
    }
}
