//! Configuration traits for decoupled config passing between crates.
//!
//! These traits allow components to depend on configuration capabilities without
//! requiring direct knowledge of the full configuration structure.

use std::time::Duration;

/// Base trait for all configuration types.
///
/// Implementations should be cheaply cloneable and thread-safe.
pub trait ConfigProvider: Clone + Send + Sync + 'static {}

/// Session registry configuration.
///
/// Provides settings for session expiry, the local cache bound and the
/// scheduling of the expiry sweep.
pub trait HasSessionConfig: ConfigProvider {
    /// Maximum number of sessions held by an in-process backing cache.
    fn max_sessions(&self) -> usize;

    /// Idle time after which a session counts as expired.
    fn session_timeout(&self) -> Duration;

    /// Delay before the first sweep pass.
    fn sweep_initial_delay(&self) -> Duration {
        defaults::sweep_initial_delay()
    }

    /// Interval between sweep passes.
    fn sweep_period(&self) -> Duration {
        defaults::sweep_period()
    }

    /// Whether disposing the registry also cancels the scheduled sweep.
    fn cancel_sweep_on_dispose(&self) -> bool {
        false
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Default values
// ─────────────────────────────────────────────────────────────────────────────

/// Default session configuration values.
pub mod defaults {
    use std::time::Duration;

    pub const MAX_SESSIONS: usize = 10_000;
    pub const SESSION_TIMEOUT_SECS: u64 = 3600;
    pub const SWEEP_INITIAL_DELAY_SECS: u64 = 60;
    /// Fifteen minutes between sweeps.
    pub const SWEEP_PERIOD_SECS: u64 = 900;
    /// Upper bound for the sweep delay and period, one year.
    pub const MAX_SWEEP_SECS: u64 = 365 * 24 * 60 * 60;

    pub fn session_timeout() -> Duration {
        Duration::from_secs(SESSION_TIMEOUT_SECS)
    }

    pub fn sweep_initial_delay() -> Duration {
        Duration::from_secs(SWEEP_INITIAL_DELAY_SECS)
    }

    pub fn sweep_period() -> Duration {
        Duration::from_secs(SWEEP_PERIOD_SECS)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Standalone provider
// ─────────────────────────────────────────────────────────────────────────────

/// Standalone session configuration.
#[derive(Debug, Clone)]
pub struct SessionConfigProvider {
    pub max_sessions: usize,
    pub session_timeout: Duration,
    pub sweep_initial_delay: Duration,
    pub sweep_period: Duration,
    pub cancel_sweep_on_dispose: bool,
}

impl Default for SessionConfigProvider {
    fn default() -> Self {
        Self {
            max_sessions: defaults::MAX_SESSIONS,
            session_timeout: defaults::session_timeout(),
            sweep_initial_delay: defaults::sweep_initial_delay(),
            sweep_period: defaults::sweep_period(),
            cancel_sweep_on_dispose: false,
        }
    }
}

impl ConfigProvider for SessionConfigProvider {}

impl HasSessionConfig for SessionConfigProvider {
    fn max_sessions(&self) -> usize {
        self.max_sessions
    }

    fn session_timeout(&self) -> Duration {
        self.session_timeout
    }

    fn sweep_initial_delay(&self) -> Duration {
        self.sweep_initial_delay
    }

    fn sweep_period(&self) -> Duration {
        self.sweep_period
    }

    fn cancel_sweep_on_dispose(&self) -> bool {
        self.cancel_sweep_on_dispose
    }
}
