//! Storage backends for live sessions.
//!
//! The manager owns its store behind a single lock, so implementations do not
//! need interior synchronization. Implement [`SessionStore`] to swap the
//! in-memory map for another backend without touching identifier validation.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use crate::error::{Error, Result};
use crate::session::SharedSession;

/// Trait for session storage backends.
pub trait SessionStore: Send + 'static {
    /// Look up a session by identifier.
    fn get(&self, id: &str) -> Result<Option<SharedSession>>;

    /// Insert a new session.
    ///
    /// Must fail with [`Error::IdentifierInUse`] rather than overwrite an
    /// existing entry.
    fn put(&mut self, id: &str, session: SharedSession) -> Result<()>;

    /// Remove a session, returning it if it existed.
    fn delete(&mut self, id: &str) -> Result<Option<SharedSession>>;

    /// Snapshot of every stored session.
    fn scan(&self) -> Result<Vec<(String, SharedSession)>>;

    /// Number of stored sessions.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// In-memory session store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    sessions: HashMap<String, SharedSession>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemoryStore {
    fn get(&self, id: &str) -> Result<Option<SharedSession>> {
        Ok(self.sessions.get(id).cloned())
    }

    fn put(&mut self, id: &str, session: SharedSession) -> Result<()> {
        match self.sessions.entry(id.to_string()) {
            Entry::Occupied(_) => Err(Error::IdentifierInUse),
            Entry::Vacant(slot) => {
                slot.insert(session);
                Ok(())
            }
        }
    }

    fn delete(&mut self, id: &str) -> Result<Option<SharedSession>> {
        Ok(self.sessions.remove(id))
    }

    fn scan(&self) -> Result<Vec<(String, SharedSession)>> {
        Ok(self
            .sessions
            .iter()
            .map(|(id, session)| (id.clone(), session.clone()))
            .collect())
    }

    fn len(&self) -> usize {
        self.sessions.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SessionConfig;
    use crate::session::Session;

    fn session(id: &str) -> SharedSession {
        Session::new(id, SessionConfig::default().cookie_settings()).into_shared()
    }

    #[test]
    fn test_put_and_get() {
        let mut store = MemoryStore::new();
        assert!(store.is_empty());

        store.put("a", session("a")).unwrap();
        let found = store.get("a").unwrap().unwrap();
        assert_eq!(found.read().id(), "a");
        assert!(store.get("b").unwrap().is_none());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_put_never_overwrites() {
        let mut store = MemoryStore::new();
        let original = session("a");
        original.write().set("k", "v");
        store.put("a", original).unwrap();

        let err = store.put("a", session("a")).unwrap_err();
        assert!(matches!(err, Error::IdentifierInUse));

        let kept = store.get("a").unwrap().unwrap();
        assert_eq!(kept.read().get("k"), Some("v"));
    }

    #[test]
    fn test_delete_is_idempotent() {
        let mut store = MemoryStore::new();
        store.put("a", session("a")).unwrap();

        assert!(store.delete("a").unwrap().is_some());
        assert!(store.delete("a").unwrap().is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_scan() {
        let mut store = MemoryStore::new();
        store.put("a", session("a")).unwrap();
        store.put("b", session("b")).unwrap();

        let mut ids: Vec<String> = store.scan().unwrap().into_iter().map(|(id, _)| id).collect();
        ids.sort();
        assert_eq!(ids, vec!["a", "b"]);
    }
}
