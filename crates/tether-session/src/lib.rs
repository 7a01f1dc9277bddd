//! Cache-backed session registry.
//!
//! This crate resolves client sessions against a shared backing cache:
//! - Lookups return the cached session, or a brand new one on a miss
//! - New sessions are written to the cache only when their connection ends
//! - A periodic sweep evicts expired sessions from the cache
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use tether_session::{
//!     Connection, EventDispatch, EventRegistry, LocalCache, RegistryConfig, SessionRegistry,
//!     TokioScheduler,
//! };
//!
//! let events = Arc::new(EventRegistry::new());
//! let registry = SessionRegistry::builder()
//!     .cache(Arc::new(LocalCache::default()))
//!     .scheduler(Arc::new(TokioScheduler::new()))
//!     .events(events.clone())
//!     .config(RegistryConfig::default())
//!     .build()?;
//! registry.initialize()?;
//!
//! let session = registry.lookup("client-supplied-id", "my-app").await?;
//! let connection = Connection::new(session);
//! // ... connection ends
//! events.notify_connection_destroyed(&connection).await;
//! ```

mod backing;
mod cache;
mod config;
mod connection;
mod error;
mod events;
mod key;
mod registry;
mod scheduler;
mod session;
mod sweeper;
mod teardown;

pub use backing::{BackingCache, SharedBackingCache};
pub use cache::{CacheStats, LocalCache};
pub use config::RegistryConfig;
pub use connection::{Connection, ConnectionId, ConnectionSession};
pub use error::{Error, Result};
pub use events::{ConnectionListener, EventDispatch, EventRegistry, SharedEventDispatch};
pub use key::SessionKey;
pub use registry::{SessionRegistry, SessionRegistryBuilder};
pub use scheduler::{PeriodicTask, ScheduledTask, Scheduler, SharedScheduler, TokioScheduler};
pub use session::Session;
pub use sweeper::{ExpirySweeper, SweepReport};
pub use teardown::TeardownListener;
