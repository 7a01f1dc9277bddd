//! Composite cache key for sessions.

use serde::{Deserialize, Serialize};

/// Identity under which a session is stored in the backing cache.
///
/// A pair of session id and client identifier, compared and hashed by value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionKey {
    session_id: String,
    identifier: String,
}

impl SessionKey {
    /// Create a key from a session id and client identifier.
    pub fn new(session_id: impl Into<String>, identifier: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            identifier: identifier.into(),
        }
    }

    /// The session id half of the key.
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// The client identifier half of the key.
    pub fn identifier(&self) -> &str {
        &self.identifier
    }
}

impl std::fmt::Display for SessionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{}", self.session_id, self.identifier)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_equality_is_by_value() {
        assert_eq!(SessionKey::new("s1", "app"), SessionKey::new("s1", "app"));
        assert_ne!(SessionKey::new("s1", "app"), SessionKey::new("s1", "other"));
        assert_ne!(SessionKey::new("s1", "app"), SessionKey::new("s2", "app"));
    }

    #[test]
    fn test_hash_collapses_equal_keys() {
        let mut set = HashSet::new();
        set.insert(SessionKey::new("s1", "app"));
        set.insert(SessionKey::new("s1".to_string(), "app".to_string()));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_empty_parts_are_valid() {
        let key = SessionKey::new("", "");
        assert_eq!(key.session_id(), "");
        assert_eq!(key.to_string(), "@");
    }

    #[test]
    fn test_serialized_form() {
        let json = serde_json::to_value(SessionKey::new("s1", "app")).unwrap();
        assert_eq!(json["session_id"], "s1");
        assert_eq!(json["identifier"], "app");
    }
}
