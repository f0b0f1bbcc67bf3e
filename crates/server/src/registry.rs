//! Session registry - maps session ids to live sessions
//!
//! The registry is the only state shared between sessions. It holds, for
//! each live session, the sending half of that session's cancellation
//! channel. A session owns a [`SessionLease`]; dropping the lease removes
//! the entry, so the id is freed on every exit path.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use derive_more::{Display, Error};
use tokio::sync::watch;

/// Longest accepted client-chosen session id, in bytes
pub const MAX_SESSION_ID_LEN: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum RegistryError {
    #[display("session id '{id}' is already in use")]
    Duplicate { id: String },
    #[display("invalid session id: {reason}")]
    InvalidId { reason: &'static str },
}

struct Entry {
    token: u64,
    cancel: watch::Sender<bool>,
}

#[derive(Default)]
struct RegistryInner {
    sessions: Mutex<HashMap<String, Entry>>,
    next_token: AtomicU64,
    next_anon: AtomicU64,
}

/// Shared, cloneable handle to the session table
#[derive(Clone, Default)]
pub struct SessionRegistry {
    inner: Arc<RegistryInner>,
}

impl std::fmt::Debug for SessionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionRegistry")
            .field("sessions", &self.len())
            .finish()
    }
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn sessions(&self) -> MutexGuard<'_, HashMap<String, Entry>> {
        // Entries stay consistent even if a holder panicked mid-update.
        self.inner
            .sessions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Check a client-chosen id before registering it
    pub fn validate_id(id: &str) -> Result<(), RegistryError> {
        if id.len() > MAX_SESSION_ID_LEN {
            return Err(RegistryError::InvalidId {
                reason: "longer than 64 bytes",
            });
        }
        if id.chars().any(char::is_control) {
            return Err(RegistryError::InvalidId {
                reason: "contains control characters",
            });
        }
        Ok(())
    }

    /// Insert `id` if absent and hand out its lease
    pub fn register(&self, id: impl Into<String>) -> Result<SessionLease, RegistryError> {
        let id = id.into();
        let mut sessions = self.sessions();
        if sessions.contains_key(&id) {
            return Err(RegistryError::Duplicate { id });
        }

        let token = self.inner.next_token.fetch_add(1, Ordering::Relaxed);
        let (cancel, cancel_rx) = watch::channel(false);
        sessions.insert(id.clone(), Entry { token, cancel });

        Ok(SessionLease {
            id,
            token,
            cancel_rx,
            registry: self.clone(),
        })
    }

    /// Register under a fresh `anon-<n>` id
    pub fn register_anonymous(&self) -> SessionLease {
        loop {
            let n = self.inner.next_anon.fetch_add(1, Ordering::Relaxed) + 1;
            // A client may already have claimed this name explicitly.
            if let Ok(lease) = self.register(format!("anon-{n}")) {
                return lease;
            }
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.sessions().contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.sessions().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Ids of all live sessions, sorted
    pub fn ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.sessions().keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Signal one session to stop; returns false if no such session
    pub fn cancel(&self, id: &str) -> bool {
        match self.sessions().get(id) {
            Some(entry) => {
                entry.cancel.send_replace(true);
                true
            }
            None => false,
        }
    }

    /// Signal every live session to stop; returns how many were signalled
    pub fn cancel_all(&self) -> usize {
        let sessions = self.sessions();
        for entry in sessions.values() {
            entry.cancel.send_replace(true);
        }
        sessions.len()
    }

    /// Drop the entry for `id`
    ///
    /// The session's cancellation channel closes, which also stops it.
    pub fn remove(&self, id: &str) -> bool {
        self.sessions().remove(id).is_some()
    }

    fn release(&self, id: &str, token: u64) {
        let mut sessions = self.sessions();
        // Only remove our own entry, never a later session reusing the id.
        if sessions.get(id).is_some_and(|e| e.token == token) {
            sessions.remove(id);
        }
    }
}

/// Ownership of one registry entry
#[derive(Debug)]
pub struct SessionLease {
    id: String,
    token: u64,
    cancel_rx: watch::Receiver<bool>,
    registry: SessionRegistry,
}

impl SessionLease {
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Receiver that flips to `true` (or closes) when the session must stop
    pub fn cancel_signal(&self) -> watch::Receiver<bool> {
        self.cancel_rx.clone()
    }
}

impl Drop for SessionLease {
    fn drop(&mut self) {
        self.registry.release(&self.id, self.token);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_rejects_duplicates() {
        let registry = SessionRegistry::new();
        let lease = registry.register("alice").unwrap();
        assert_eq!(lease.id(), "alice");
        assert!(registry.contains("alice"));

        let err = registry.register("alice").unwrap_err();
        assert_eq!(
            err,
            RegistryError::Duplicate {
                id: "alice".to_string()
            }
        );
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_dropping_lease_frees_id() {
        let registry = SessionRegistry::new();
        {
            let _lease = registry.register("bob").unwrap();
            assert!(registry.contains("bob"));
        }
        assert!(!registry.contains("bob"));
        tokio_test::assert_ok!(registry.register("bob"));
    }

    #[test]
    fn test_stale_lease_does_not_remove_new_entry() {
        let registry = SessionRegistry::new();
        let old = registry.register("carol").unwrap();
        assert!(registry.remove("carol"));
        let _new = registry.register("carol").unwrap();

        drop(old);
        assert!(registry.contains("carol"));
    }

    #[test]
    fn test_anonymous_ids_are_unique() {
        let registry = SessionRegistry::new();
        let taken = registry.register("anon-1").unwrap();
        let a = registry.register_anonymous();
        let b = registry.register_anonymous();
        assert_ne!(a.id(), taken.id());
        assert_ne!(a.id(), b.id());
        assert!(a.id().starts_with("anon-"));
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn test_cancel_flips_signal() {
        let registry = SessionRegistry::new();
        let lease = registry.register("dave").unwrap();
        let rx = lease.cancel_signal();
        assert!(!*rx.borrow());

        assert!(registry.cancel("dave"));
        assert!(*rx.borrow());
        assert!(!registry.cancel("nobody"));
    }

    #[test]
    fn test_cancel_all_reaches_every_session() {
        let registry = SessionRegistry::new();
        let leases: Vec<_> = (0..3).map(|_| registry.register_anonymous()).collect();
        assert_eq!(registry.cancel_all(), 3);
        assert!(leases.iter().all(|l| *l.cancel_signal().borrow()));
    }

    #[test]
    fn test_validate_id() {
        assert!(SessionRegistry::validate_id("player-1").is_ok());
        assert!(SessionRegistry::validate_id(&"x".repeat(64)).is_ok());
        assert!(SessionRegistry::validate_id(&"x".repeat(65)).is_err());
        assert!(SessionRegistry::validate_id("bad\nid").is_err());
    }

    #[test]
    fn test_ids_sorted() {
        let registry = SessionRegistry::new();
        let _b = registry.register("b").unwrap();
        let _a = registry.register("a").unwrap();
        assert_eq!(registry.ids(), vec!["a".to_string(), "b".to_string()]);
    }
}
