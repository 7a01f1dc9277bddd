//! Connection lifecycle notifications.
//!
//! Hosts own an [`EventDispatch`] and call
//! [`notify_connection_destroyed`](EventDispatch::notify_connection_destroyed)
//! whenever a connection ends. Listeners are awaited one after another, in
//! registration order, before the notification returns.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use tether_types::{EventKind, ListenerId};
use tracing::{debug, trace};

use crate::connection::Connection;
use crate::error::{Error, Result};

/// Receives connection teardown notifications.
#[async_trait]
pub trait ConnectionListener: Send + Sync {
    async fn on_connection_destroyed(&self, connection: &Connection);
}

/// Registration point for lifecycle listeners.
#[async_trait]
pub trait EventDispatch: Send + Sync {
    /// Subscribe `listener` to events of `kind`.
    fn register(
        &self,
        kind: EventKind,
        listener: Arc<dyn ConnectionListener>,
    ) -> Result<ListenerId>;

    /// Unsubscribe a previously registered listener.
    fn remove(&self, id: ListenerId) -> Result<()>;

    /// Deliver a connection teardown to every subscribed listener.
    async fn notify_connection_destroyed(&self, connection: &Connection);
}

/// Shared handle to an event dispatcher.
pub type SharedEventDispatch = Arc<dyn EventDispatch>;

struct Registration {
    id: ListenerId,
    kind: EventKind,
    listener: Arc<dyn ConnectionListener>,
}

/// In-process observer list.
#[derive(Default)]
pub struct EventRegistry {
    listeners: RwLock<Vec<Registration>>,
}

impl EventRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of registered listeners.
    pub fn len(&self) -> usize {
        self.listeners.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of listeners for a specific event kind.
    pub fn count_for_event(&self, kind: EventKind) -> usize {
        self.listeners
            .read()
            .iter()
            .filter(|r| r.kind == kind)
            .count()
    }
}

#[async_trait]
impl EventDispatch for EventRegistry {
    fn register(
        &self,
        kind: EventKind,
        listener: Arc<dyn ConnectionListener>,
    ) -> Result<ListenerId> {
        let id = ListenerId::new();
        self.listeners.write().push(Registration { id, kind, listener });
        debug!(listener = %id, event = %kind, "Listener registered");
        Ok(id)
    }

    fn remove(&self, id: ListenerId) -> Result<()> {
        let mut listeners = self.listeners.write();
        let before = listeners.len();
        listeners.retain(|r| r.id != id);
        if listeners.len() == before {
            return Err(Error::Lifecycle(format!("listener {id} is not registered")));
        }
        debug!(listener = %id, "Listener removed");
        Ok(())
    }

    async fn notify_connection_destroyed(&self, connection: &Connection) {
        // Snapshot so listeners can (un)register without deadlocking
        let targets: Vec<Arc<dyn ConnectionListener>> = self
            .listeners
            .read()
            .iter()
            .filter(|r| r.kind == EventKind::ConnectionDestroyed)
            .map(|r| Arc::clone(&r.listener))
            .collect();

        trace!(
            connection = %connection.id(),
            listeners = targets.len(),
            "Dispatching connection teardown"
        );

        for listener in targets {
            listener.on_connection_destroyed(connection).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Session;
    use parking_lot::Mutex;
    use std::time::Duration;

    #[derive(Default)]
    struct Recorder {
        seen: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl ConnectionListener for Recorder {
        async fn on_connection_destroyed(&self, connection: &Connection) {
            self.seen.lock().push(connection.session().id().to_string());
        }
    }

    fn connection(id: &str) -> Connection {
        Connection::new(Session::with_id(id, "app", Duration::from_secs(60)))
    }

    #[tokio::test]
    async fn test_register_and_notify() {
        let registry = EventRegistry::new();
        let recorder = Arc::new(Recorder::default());
        registry
            .register(EventKind::ConnectionDestroyed, recorder.clone())
            .unwrap();

        registry.notify_connection_destroyed(&connection("u1")).await;
        registry.notify_connection_destroyed(&connection("u2")).await;

        assert_eq!(*recorder.seen.lock(), vec!["u1", "u2"]);
        assert_eq!(registry.count_for_event(EventKind::ConnectionDestroyed), 1);
    }

    #[tokio::test]
    async fn test_removed_listener_not_notified() {
        let registry = EventRegistry::new();
        let recorder = Arc::new(Recorder::default());
        let id = registry
            .register(EventKind::ConnectionDestroyed, recorder.clone())
            .unwrap();

        registry.remove(id).unwrap();
        registry.notify_connection_destroyed(&connection("u1")).await;

        assert!(recorder.seen.lock().is_empty());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_remove_unknown_listener_fails() {
        let registry = EventRegistry::new();
        let result = registry.remove(ListenerId::new());
        assert!(matches!(result, Err(Error::Lifecycle(_))));
    }

    #[tokio::test]
    async fn test_all_listeners_notified_in_order() {
        struct Tagged(&'static str, Arc<Mutex<Vec<&'static str>>>);

        #[async_trait]
        impl ConnectionListener for Tagged {
            async fn on_connection_destroyed(&self, _connection: &Connection) {
                self.1.lock().push(self.0);
            }
        }

        let order = Arc::new(Mutex::new(Vec::new()));
        let registry = EventRegistry::new();
        for tag in ["first", "second", "third"] {
            registry
                .register(
                    EventKind::ConnectionDestroyed,
                    Arc::new(Tagged(tag, order.clone())),
                )
                .unwrap();
        }

        registry.notify_connection_destroyed(&connection("u1")).await;
        assert_eq!(*order.lock(), vec!["first", "second", "third"]);
    }
}
