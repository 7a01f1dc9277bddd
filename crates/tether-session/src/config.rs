//! Configuration for the session registry.

use std::time::Duration;

use tether_types::HasSessionConfig;
use tether_types::config_defaults as defaults;

/// Configuration for the session registry.
#[derive(Debug, Clone)]
pub struct RegistryConfig {
    /// Idle timeout given to sessions created on a lookup miss.
    pub session_timeout: Duration,

    /// Delay before the first sweep pass.
    pub sweep_initial_delay: Duration,

    /// Interval between sweep passes.
    pub sweep_period: Duration,

    /// Whether `dispose` also cancels the scheduled sweep.
    ///
    /// Off by default: the sweep keeps running until the scheduler itself
    /// shuts down.
    pub cancel_sweep_on_dispose: bool,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            session_timeout: defaults::session_timeout(),
            sweep_initial_delay: defaults::sweep_initial_delay(),
            sweep_period: defaults::sweep_period(),
            cancel_sweep_on_dispose: false,
        }
    }
}

impl RegistryConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a configuration from any session config provider.
    pub fn from_session_config<C: HasSessionConfig>(config: &C) -> Self {
        Self {
            session_timeout: config.session_timeout(),
            sweep_initial_delay: config.sweep_initial_delay(),
            sweep_period: config.sweep_period(),
            cancel_sweep_on_dispose: config.cancel_sweep_on_dispose(),
        }
    }

    /// Set the idle timeout for new sessions.
    pub fn with_session_timeout(mut self, timeout: Duration) -> Self {
        self.session_timeout = timeout;
        self
    }

    /// Set the delay before the first sweep.
    pub fn with_sweep_initial_delay(mut self, delay: Duration) -> Self {
        self.sweep_initial_delay = delay;
        self
    }

    /// Set the sweep interval.
    pub fn with_sweep_period(mut self, period: Duration) -> Self {
        self.sweep_period = period;
        self
    }

    /// Cancel the sweep when the registry is disposed.
    pub fn with_cancel_sweep_on_dispose(mut self, enabled: bool) -> Self {
        self.cancel_sweep_on_dispose = enabled;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tether_types::SessionConfigProvider;

    #[test]
    fn test_defaults_match_shared_defaults() {
        let config = RegistryConfig::new();
        assert_eq!(config.sweep_initial_delay, Duration::from_secs(60));
        assert_eq!(config.sweep_period, Duration::from_secs(900));
        assert_eq!(config.session_timeout, Duration::from_secs(3600));
        assert!(!config.cancel_sweep_on_dispose);
    }

    #[test]
    fn test_from_session_config() {
        let provider = SessionConfigProvider {
            session_timeout: Duration::from_secs(5),
            sweep_period: Duration::from_secs(7),
            cancel_sweep_on_dispose: true,
            ..Default::default()
        };
        let config = RegistryConfig::from_session_config(&provider);
        assert_eq!(config.session_timeout, Duration::from_secs(5));
        assert_eq!(config.sweep_period, Duration::from_secs(7));
        assert!(config.cancel_sweep_on_dispose);
    }
}
