use std::{
    collections::HashMap,
    sync::{Arc, RwLock},
};

use crate::messaging::port::ChatSession;

/// Read-only view of the sessions a host keeps alive.
pub trait SessionRegistry: Send + Sync {
    fn lookup(&self, name: &str) -> Option<Arc<dyn ChatSession>>;

    /// Snapshot of every registered session, connected or not. Order is unspecified.
    fn sessions(&self) -> Vec<Arc<dyn ChatSession>>;

    /// Any connected session accepted by `filter`.
    ///
    /// Which one wins when several qualify is unspecified.
    fn find_connected(
        &self,
        filter: &dyn Fn(&dyn ChatSession) -> bool,
    ) -> Option<Arc<dyn ChatSession>> {
        self.sessions()
            .into_iter()
            .find(|s| s.is_connected() && filter(s.as_ref()))
    }
}

/// In-memory registry keyed by session name.
///
/// The host inserts and removes sessions as bots come and go; the relay only reads.
#[derive(Default)]
pub struct SessionMap {
    sessions: RwLock<HashMap<String, Arc<dyn ChatSession>>>,
}

impl SessionMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `session` under `name`, returning the session it replaced.
    pub fn insert(
        &self,
        name: impl Into<String>,
        session: Arc<dyn ChatSession>,
    ) -> Option<Arc<dyn ChatSession>> {
        self.write().insert(name.into(), session)
    }

    pub fn remove(&self, name: &str) -> Option<Arc<dyn ChatSession>> {
        self.write().remove(name)
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    // A panic while holding the lock cannot leave the map half-updated, so poisoning is ignored.
    fn read(&self) -> std::sync::RwLockReadGuard<'_, HashMap<String, Arc<dyn ChatSession>>> {
        self.sessions.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, HashMap<String, Arc<dyn ChatSession>>> {
        self.sessions.write().unwrap_or_else(|e| e.into_inner())
    }
}

impl SessionRegistry for SessionMap {
    fn lookup(&self, name: &str) -> Option<Arc<dyn ChatSession>> {
        self.read().get(name).cloned()
    }

    fn sessions(&self) -> Vec<Arc<dyn ChatSession>> {
        self.read().values().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RecipientId;
    use crate::test_support::FakeSession;

    #[test]
    fn lookup_returns_registered_session() {
        let map = SessionMap::new();
        let a = FakeSession::connected(1);
        map.insert("a", a.clone());

        let found = map.lookup("a").expect("session a");
        assert_eq!(found.identity(), RecipientId(1));
        assert!(map.lookup("b").is_none());
    }

    #[test]
    fn insert_replaces_and_remove_drops() {
        let map = SessionMap::new();
        map.insert("a", FakeSession::connected(1));
        let old = map.insert("a", FakeSession::connected(2));
        assert_eq!(old.map(|s| s.identity()), Some(RecipientId(1)));
        assert_eq!(map.len(), 1);

        map.remove("a");
        assert!(map.is_empty());
    }

    #[test]
    fn find_connected_skips_disconnected_and_filtered() {
        let map = SessionMap::new();
        map.insert("offline", FakeSession::disconnected(1));
        map.insert("self", FakeSession::connected(2));
        map.insert("other", FakeSession::connected(3));

        let found = map
            .find_connected(&|s| s.identity() != RecipientId(2))
            .expect("connected session");
        assert_eq!(found.identity(), RecipientId(3));

        assert!(map
            .find_connected(&|s| s.identity() == RecipientId(1))
            .is_none());
    }

    #[test]
    fn find_connected_on_empty_registry() {
        let map = SessionMap::new();
        assert!(map.find_connected(&|_| true).is_none());
    }
}
