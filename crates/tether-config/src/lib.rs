//! Configuration system for the Tether session registry.
//!
//! Provides TOML-based configuration with a single `[session]` section.
//! Every field is optional and falls back to the defaults in
//! [`tether_types::config_defaults`].

pub mod discovery;
pub mod error;
pub mod types;

pub use discovery::{load_config, load_config_file};
pub use error::{ConfigError, Result};
pub use types::{SessionConfig, TetherConfig};
