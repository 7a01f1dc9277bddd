//! Shared types for the Tether session registry.

pub mod config;
pub mod events;

pub use config::{
    ConfigProvider, HasSessionConfig, SessionConfigProvider, defaults as config_defaults,
};
pub use events::{EventKind, ListenerId};
