//! Server-side session state and its expiry predicate.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::key::SessionKey;

/// Server-side state for one client.
///
/// The session id is generated when the session is created and never taken
/// from the caller. Expiry is derived from the last recorded activity and
/// the idle timeout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    id: String,
    identifier: String,
    created_at: DateTime<Utc>,
    last_accessed_at: DateTime<Utc>,
    timeout: Duration,
}

impl Session {
    /// Create a session with a freshly generated id.
    pub fn new(identifier: impl Into<String>, timeout: Duration) -> Self {
        Self::with_id(Uuid::new_v4().to_string(), identifier, timeout)
    }

    /// Create a session with a known id, e.g. when rebuilding one that was
    /// stored elsewhere.
    pub fn with_id(id: impl Into<String>, identifier: impl Into<String>, timeout: Duration) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            identifier: identifier.into(),
            created_at: now,
            last_accessed_at: now,
            timeout,
        }
    }

    /// Override the last activity timestamp.
    pub fn with_last_accessed_at(mut self, ts: DateTime<Utc>) -> Self {
        self.last_accessed_at = ts;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn last_accessed_at(&self) -> DateTime<Utc> {
        self.last_accessed_at
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Record activity, resetting the idle timer.
    pub fn touch(&mut self) {
        self.last_accessed_at = Utc::now();
    }

    /// Whether the session has been idle longer than its timeout.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// Whether the session is expired as of `now`.
    ///
    /// A last-access time in the future of `now` (clock skew between
    /// nodes) never counts as expired.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        match (now - self.last_accessed_at).to_std() {
            Ok(idle) => idle > self.timeout,
            Err(_) => false,
        }
    }

    /// The key this session is stored under.
    ///
    /// Built from the session's own id, not from whatever id a caller
    /// looked it up with.
    pub fn key(&self) -> SessionKey {
        SessionKey::new(self.id.clone(), self.identifier.clone())
    }
}

impl std::fmt::Display for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Session{{id={}, identifier={}}}", self.id, self.identifier)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOUR: Duration = Duration::from_secs(3600);

    #[test]
    fn test_new_generates_unique_ids() {
        let a = Session::new("app", HOUR);
        let b = Session::new("app", HOUR);
        assert_ne!(a.id(), b.id());
        assert!(Uuid::parse_str(a.id()).is_ok());
        assert_eq!(a.identifier(), "app");
    }

    #[test]
    fn test_key_uses_own_id() {
        let session = Session::with_id("u1", "app", HOUR);
        assert_eq!(session.key(), SessionKey::new("u1", "app"));
    }

    #[test]
    fn test_fresh_session_not_expired() {
        let session = Session::new("app", HOUR);
        assert!(!session.is_expired());
    }

    #[test]
    fn test_idle_past_timeout_is_expired() {
        let session = Session::new("app", Duration::from_secs(60))
            .with_last_accessed_at(Utc::now() - chrono::Duration::minutes(5));
        assert!(session.is_expired());
    }

    #[test]
    fn test_expiry_boundary() {
        let start = Utc::now();
        let session = Session::new("app", Duration::from_secs(60)).with_last_accessed_at(start);

        assert!(!session.is_expired_at(start + chrono::Duration::seconds(60)));
        assert!(session.is_expired_at(start + chrono::Duration::seconds(61)));
    }

    #[test]
    fn test_future_access_time_not_expired() {
        let now = Utc::now();
        let session = Session::new("app", Duration::from_secs(1))
            .with_last_accessed_at(now + chrono::Duration::minutes(10));
        assert!(!session.is_expired_at(now));
    }

    #[test]
    fn test_touch_resets_idle_timer() {
        let mut session = Session::new("app", Duration::from_secs(60))
            .with_last_accessed_at(Utc::now() - chrono::Duration::minutes(5));
        assert!(session.is_expired());

        session.touch();
        assert!(!session.is_expired());
    }

    #[test]
    fn test_display() {
        let session = Session::with_id("u1", "app", HOUR);
        assert_eq!(session.to_string(), "Session{id=u1, identifier=app}");
    }

    #[test]
    fn test_serde_preserves_state() {
        let session = Session::with_id("u1", "app", HOUR);
        let json = serde_json::to_string(&session).unwrap();
        let back: Session = serde_json::from_str(&json).unwrap();
        assert_eq!(back, session);
    }
}
