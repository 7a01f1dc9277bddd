//! Client connections as seen by the teardown path.

use uuid::Uuid;

use crate::session::Session;

/// Unique identifier for a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    /// Create a new random connection ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The session attached to a connection.
///
/// Only `Managed` sessions were produced by this registry and are written
/// back on teardown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionSession {
    /// Created or resolved by the session registry.
    Managed(Session),
    /// Owned by some other session provider.
    Foreign { id: String, identifier: String },
}

impl ConnectionSession {
    /// The managed session, if this is one.
    pub fn managed(&self) -> Option<&Session> {
        match self {
            ConnectionSession::Managed(session) => Some(session),
            ConnectionSession::Foreign { .. } => None,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            ConnectionSession::Managed(session) => session.id(),
            ConnectionSession::Foreign { id, .. } => id,
        }
    }

    pub fn identifier(&self) -> &str {
        match self {
            ConnectionSession::Managed(session) => session.identifier(),
            ConnectionSession::Foreign { identifier, .. } => identifier,
        }
    }
}

impl From<Session> for ConnectionSession {
    fn from(session: Session) -> Self {
        ConnectionSession::Managed(session)
    }
}

/// A client connection carrying its current session.
#[derive(Debug, Clone)]
pub struct Connection {
    id: ConnectionId,
    session: ConnectionSession,
}

impl Connection {
    /// Create a connection holding `session`.
    pub fn new(session: impl Into<ConnectionSession>) -> Self {
        Self {
            id: ConnectionId::new(),
            session: session.into(),
        }
    }

    pub fn id(&self) -> ConnectionId {
        self.id
    }

    pub fn session(&self) -> &ConnectionSession {
        &self.session
    }

    /// Mutable access, e.g. to record activity on a managed session.
    pub fn session_mut(&mut self) -> &mut ConnectionSession {
        &mut self.session
    }

    /// Replace the connection's session.
    pub fn set_session(&mut self, session: impl Into<ConnectionSession>) {
        self.session = session.into();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_managed_accessors() {
        let session = Session::with_id("u1", "app", Duration::from_secs(60));
        let conn = Connection::new(session.clone());

        assert_eq!(conn.session().managed(), Some(&session));
        assert_eq!(conn.session().id(), "u1");
        assert_eq!(conn.session().identifier(), "app");
    }

    #[test]
    fn test_foreign_is_not_managed() {
        let conn = Connection::new(ConnectionSession::Foreign {
            id: "x".to_string(),
            identifier: "legacy".to_string(),
        });
        assert!(conn.session().managed().is_none());
        assert_eq!(conn.session().identifier(), "legacy");
    }

    #[test]
    fn test_set_session_replaces() {
        let mut conn = Connection::new(ConnectionSession::Foreign {
            id: "x".to_string(),
            identifier: "legacy".to_string(),
        });
        conn.set_session(Session::with_id("u2", "app", Duration::from_secs(60)));
        assert_eq!(conn.session().id(), "u2");
        assert!(conn.session().managed().is_some());
    }

    #[test]
    fn test_connection_ids_unique() {
        let a = Connection::new(Session::new("app", Duration::from_secs(1)));
        let b = Connection::new(Session::new("app", Duration::from_secs(1)));
        assert_ne!(a.id(), b.id());
    }
}
