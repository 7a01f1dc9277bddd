//! Configuration types.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tether_types::config_defaults as defaults;

use crate::{ConfigError, Result};

/// Root configuration document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TetherConfig {
    /// Session registry settings.
    pub session: SessionConfig,
}

impl TetherConfig {
    /// Create a configuration with all defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and validate a TOML document.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        let config: TetherConfig = toml::from_str(toml_str)?;
        config.session.validate()?;
        Ok(config)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Session Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Session registry configuration.
///
/// ```toml
/// [session]
/// max_sessions = 10000
/// session_timeout_secs = 3600
/// sweep_initial_delay_secs = 60
/// sweep_period_secs = 900
/// cancel_sweep_on_dispose = false
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Capacity of the in-process backing cache.
    pub max_sessions: usize,
    /// Idle seconds after which a session is expired.
    pub session_timeout_secs: u64,
    /// Seconds before the first sweep pass.
    pub sweep_initial_delay_secs: u64,
    /// Seconds between sweep passes.
    pub sweep_period_secs: u64,
    /// Cancel the periodic sweep when the registry is disposed.
    pub cancel_sweep_on_dispose: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_sessions: defaults::MAX_SESSIONS,
            session_timeout_secs: defaults::SESSION_TIMEOUT_SECS,
            sweep_initial_delay_secs: defaults::SWEEP_INITIAL_DELAY_SECS,
            sweep_period_secs: defaults::SWEEP_PERIOD_SECS,
            cancel_sweep_on_dispose: false,
        }
    }
}

impl SessionConfig {
    /// Reject values that would make the registry unusable.
    pub fn validate(&self) -> Result<()> {
        let zero = |field: &str| ConfigError::Invalid {
            field: format!("session.{field}"),
            reason: "must be greater than zero".to_string(),
        };
        if self.max_sessions == 0 {
            return Err(zero("max_sessions"));
        }
        if self.session_timeout_secs == 0 {
            return Err(zero("session_timeout_secs"));
        }
        // tokio intervals panic on a zero period
        if self.sweep_period_secs == 0 {
            return Err(zero("sweep_period_secs"));
        }
        let too_long = |field: &str| ConfigError::Invalid {
            field: format!("session.{field}"),
            reason: format!("must not exceed {} seconds", defaults::MAX_SWEEP_SECS),
        };
        if self.sweep_initial_delay_secs > defaults::MAX_SWEEP_SECS {
            return Err(too_long("sweep_initial_delay_secs"));
        }
        if self.sweep_period_secs > defaults::MAX_SWEEP_SECS {
            return Err(too_long("sweep_period_secs"));
        }
        Ok(())
    }
}

impl tether_types::ConfigProvider for SessionConfig {}

impl tether_types::HasSessionConfig for SessionConfig {
    fn max_sessions(&self) -> usize {
        self.max_sessions
    }

    fn session_timeout(&self) -> Duration {
        Duration::from_secs(self.session_timeout_secs)
    }

    fn sweep_initial_delay(&self) -> Duration {
        Duration::from_secs(self.sweep_initial_delay_secs)
    }

    fn sweep_period(&self) -> Duration {
        Duration::from_secs(self.sweep_period_secs)
    }

    fn cancel_sweep_on_dispose(&self) -> bool {
        self.cancel_sweep_on_dispose
    }
}
