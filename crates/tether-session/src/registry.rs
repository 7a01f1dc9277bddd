//! Session registry: lookup, lazy creation and lifecycle wiring.

use std::sync::Arc;

use parking_lot::Mutex;
use tether_types::{EventKind, ListenerId};
use tracing::{debug, info, trace, warn};

use crate::backing::SharedBackingCache;
use crate::config::RegistryConfig;
use crate::error::{Error, Result};
use crate::events::SharedEventDispatch;
use crate::key::SessionKey;
use crate::scheduler::{ScheduledTask, SharedScheduler};
use crate::session::Session;
use crate::sweeper::ExpirySweeper;
use crate::teardown::TeardownListener;

/// Where the registry is in its lifecycle.
#[derive(Debug, Default)]
enum Lifecycle {
    #[default]
    Created,
    Running {
        listener: ListenerId,
        sweep: ScheduledTask,
    },
    Disposed {
        /// Still running unless cancelled on dispose.
        sweep: ScheduledTask,
    },
}

/// Resolves client sessions against a shared backing cache.
///
/// Lookups read the cache and, on a miss, hand out a brand new session
/// without writing it. Sessions reach the cache only when their connection
/// is torn down (see [`TeardownListener`]); expired entries are removed by
/// the periodic [`ExpirySweeper`].
///
/// Call [`initialize`](Self::initialize) once before use and
/// [`dispose`](Self::dispose) on shutdown.
pub struct SessionRegistry {
    cache: SharedBackingCache,
    scheduler: SharedScheduler,
    events: SharedEventDispatch,
    config: RegistryConfig,
    sweeper: ExpirySweeper,
    state: Mutex<Lifecycle>,
}

impl SessionRegistry {
    /// Start building a registry.
    pub fn builder() -> SessionRegistryBuilder {
        SessionRegistryBuilder::default()
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// The sweeper used by the scheduled task, for running a pass on demand.
    pub fn sweeper(&self) -> &ExpirySweeper {
        &self.sweeper
    }

    /// Resolve the session stored under `(session_id, identifier)`.
    ///
    /// On a hit the stored session is returned as-is. On a miss a new
    /// session is created with a freshly generated id and the given
    /// identifier; `session_id` is discarded and nothing is written.
    pub async fn lookup(&self, session_id: &str, identifier: &str) -> Result<Session> {
        let key = SessionKey::new(session_id, identifier);
        if let Some(session) = self.cache.get(&key).await? {
            trace!(key = %key, "Session found in backing cache");
            return Ok(session);
        }

        let session = Session::new(identifier, self.config.session_timeout);
        debug!(session = %session, "Created new session");
        Ok(session)
    }

    /// Register for connection teardown and schedule the expiry sweep.
    pub fn initialize(&self) -> Result<()> {
        let mut state = self.state.lock();
        if !matches!(*state, Lifecycle::Created) {
            return Err(Error::Lifecycle(
                "session registry already initialized".into(),
            ));
        }

        let listener = self
            .events
            .register(
                EventKind::ConnectionDestroyed,
                Arc::new(TeardownListener::new(Arc::clone(&self.cache))),
            )
            .map_err(|e| Error::Lifecycle(format!("failed to register teardown listener: {e}")))?;

        let sweep = match self.scheduler.schedule_at_fixed_rate(
            Arc::new(self.sweeper.clone()),
            self.config.sweep_initial_delay,
            self.config.sweep_period,
        ) {
            Ok(sweep) => sweep,
            Err(e) => {
                // Leave nothing half-registered
                if let Err(remove_err) = self.events.remove(listener) {
                    warn!(
                        listener = %listener,
                        error = %remove_err,
                        "Failed to unregister teardown listener after scheduling failed"
                    );
                }
                return Err(e);
            }
        };

        *state = Lifecycle::Running { listener, sweep };
        info!(
            initial_delay_secs = self.config.sweep_initial_delay.as_secs(),
            period_secs = self.config.sweep_period.as_secs(),
            "Session registry initialized"
        );
        Ok(())
    }

    /// Unregister from connection teardown notifications.
    ///
    /// The scheduled sweep keeps running unless
    /// [`RegistryConfig::cancel_sweep_on_dispose`] is set; it stops when the
    /// runtime shuts down.
    pub fn dispose(&self) -> Result<()> {
        let mut state = self.state.lock();
        match std::mem::take(&mut *state) {
            Lifecycle::Running { listener, sweep } => {
                if let Err(e) = self.events.remove(listener) {
                    *state = Lifecycle::Running { listener, sweep };
                    return Err(Error::Lifecycle(format!(
                        "failed to unregister teardown listener: {e}"
                    )));
                }
                if self.config.cancel_sweep_on_dispose {
                    sweep.cancel();
                    debug!("Cancelled session sweep");
                }
                *state = Lifecycle::Disposed { sweep };
                info!("Session registry disposed");
                Ok(())
            }
            Lifecycle::Created => Err(Error::Lifecycle(
                "session registry was never initialized".into(),
            )),
            disposed @ Lifecycle::Disposed { .. } => {
                *state = disposed;
                Err(Error::Lifecycle("session registry already disposed".into()))
            }
        }
    }

    /// Whether a sweep is scheduled and has not stopped.
    pub fn is_sweep_active(&self) -> bool {
        match &*self.state.lock() {
            Lifecycle::Created => false,
            Lifecycle::Running { sweep, .. } | Lifecycle::Disposed { sweep } => {
                !sweep.is_finished()
            }
        }
    }
}

impl std::fmt::Debug for SessionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionRegistry")
            .field("config", &self.config)
            .field("state", &*self.state.lock())
            .finish_non_exhaustive()
    }
}

/// Builder for [`SessionRegistry`].
///
/// The cache, scheduler and event dispatcher are all required.
#[derive(Default)]
pub struct SessionRegistryBuilder {
    cache: Option<SharedBackingCache>,
    scheduler: Option<SharedScheduler>,
    events: Option<SharedEventDispatch>,
    config: RegistryConfig,
}

impl SessionRegistryBuilder {
    pub fn cache(mut self, cache: SharedBackingCache) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn scheduler(mut self, scheduler: SharedScheduler) -> Self {
        self.scheduler = Some(scheduler);
        self
    }

    pub fn events(mut self, events: SharedEventDispatch) -> Self {
        self.events = Some(events);
        self
    }

    pub fn config(mut self, config: RegistryConfig) -> Self {
        self.config = config;
        self
    }

    /// Build the registry, failing if a collaborator is missing.
    pub fn build(self) -> Result<SessionRegistry> {
        let cache = self.cache.ok_or(Error::MissingDependency("backing cache"))?;
        let scheduler = self.scheduler.ok_or(Error::MissingDependency("scheduler"))?;
        let events = self.events.ok_or(Error::MissingDependency("event dispatch"))?;

        Ok(SessionRegistry {
            sweeper: ExpirySweeper::new(Arc::clone(&cache)),
            cache,
            scheduler,
            events,
            config: self.config,
            state: Mutex::new(Lifecycle::Created),
        })
    }
}
