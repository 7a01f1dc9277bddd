//! Error types for session registry operations.

/// Error type for session registry operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A required collaborator was not supplied when building the registry.
    #[error("Missing required dependency: {0}")]
    MissingDependency(&'static str),

    /// Registering or unregistering with the event source failed, or the
    /// registry was driven through its lifecycle out of order.
    #[error("Lifecycle error: {0}")]
    Lifecycle(String),

    /// Error from the backing cache.
    #[error("Backing cache error: {0}")]
    Cache(String),

    /// The periodic task could not be scheduled.
    #[error("Scheduler error: {0}")]
    Scheduler(String),
}

/// Result type for session registry operations.
pub type Result<T> = std::result::Result<T, Error>;
