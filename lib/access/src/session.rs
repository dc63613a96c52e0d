//! Process-wide session state.
//!
//! There is exactly one [`SessionStore`] per process. It is created at start
//! up and handed to the [`TokenManager`](crate::TokenManager), which is the
//! only writer. Views and the navigation guard hold [`SessionHandle`]s, which
//! read the same shared state and can subscribe to changes but cannot write.
//!
//! Observers run synchronously inside the write that triggered them, so a
//! change is visible to every subscriber before `set_identity` or `clear`
//! returns.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use crate::identity::Identity;

/// Snapshot of the session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    current_identity: Option<Identity>,
}

impl SessionState {
    /// The signed-in identity, if any.
    #[must_use]
    pub fn current_identity(&self) -> Option<&Identity> {
        self.current_identity.as_ref()
    }

    /// Returns true if someone is signed in.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.current_identity.is_some()
    }
}

/// Identifies an observer registered with [`SessionHandle::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

type Observer = Arc<dyn Fn(&SessionState) + Send + Sync>;

struct Shared {
    state: RwLock<SessionState>,
    observers: RwLock<Vec<(ObserverId, Observer)>>,
    next_observer: AtomicU64,
}

impl Shared {
    fn snapshot(&self) -> SessionState {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn replace(&self, identity: Option<Identity>) -> bool {
        {
            let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
            if state.current_identity == identity {
                return false;
            }
            state.current_identity = identity;
        }
        self.notify();
        true
    }

    fn notify(&self) {
        // No lock is held while observers run; they may read the store.
        let observers: Vec<Observer> = self
            .observers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(_, observer)| Arc::clone(observer))
            .collect();
        let state = self.snapshot();
        for observer in observers {
            observer(&state);
        }
    }
}

/// Owner of the process-wide session state.
///
/// Not `Clone`: whoever holds the store is the single writer.
pub struct SessionStore {
    shared: Arc<Shared>,
}

impl SessionStore {
    /// Creates the store in the anonymous state.
    #[must_use]
    pub fn new() -> Self {
        Self {
            shared: Arc::new(Shared {
                state: RwLock::new(SessionState::default()),
                observers: RwLock::new(Vec::new()),
                next_observer: AtomicU64::new(0),
            }),
        }
    }

    /// Returns a read-only handle onto the shared state.
    #[must_use]
    pub fn handle(&self) -> SessionHandle {
        SessionHandle {
            shared: Arc::clone(&self.shared),
        }
    }

    /// Records the signed-in identity.
    ///
    /// Returns true if the state changed (and observers were notified).
    pub fn set_identity(&self, identity: Identity) -> bool {
        self.shared.replace(Some(identity))
    }

    /// Returns the session to the anonymous state.
    ///
    /// Returns true if the state changed (and observers were notified).
    pub fn clear(&self) -> bool {
        self.shared.replace(None)
    }

    /// The current signed-in identity, if any.
    #[must_use]
    pub fn current(&self) -> Option<Identity> {
        self.shared.snapshot().current_identity
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionStore")
            .field("state", &self.shared.snapshot())
            .finish_non_exhaustive()
    }
}

/// Read-only view of the session shared by views and the guard.
#[derive(Clone)]
pub struct SessionHandle {
    shared: Arc<Shared>,
}

impl SessionHandle {
    /// The current signed-in identity, if any.
    #[must_use]
    pub fn current(&self) -> Option<Identity> {
        self.shared.snapshot().current_identity
    }

    /// Returns true if someone is signed in.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.with_state(SessionState::is_authenticated)
    }

    /// Runs `f` against the current state without cloning it.
    pub fn with_state<R>(&self, f: impl FnOnce(&SessionState) -> R) -> R {
        let state = self.shared.state.read().unwrap_or_else(PoisonError::into_inner);
        f(&state)
    }

    /// Registers an observer that runs after every change of the state.
    pub fn subscribe(&self, observer: impl Fn(&SessionState) + Send + Sync + 'static) -> ObserverId {
        let id = ObserverId(self.shared.next_observer.fetch_add(1, Ordering::Relaxed));
        self.shared
            .observers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push((id, Arc::new(observer)));
        id
    }

    /// Removes an observer. Returns false if it was not registered.
    pub fn unsubscribe(&self, id: ObserverId) -> bool {
        let mut observers = self
            .shared
            .observers
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let before = observers.len();
        observers.retain(|(existing, _)| *existing != id);
        observers.len() != before
    }
}

impl fmt::Debug for SessionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionHandle")
            .field("state", &self.shared.snapshot())
            .finish_non_exhaustive()
    }
}
