//! Token lifecycle: load, login, logout.
//!
//! The manager is the only writer of the [`SessionStore`]. Every failure on
//! its way (unreadable storage, malformed token) is logged and collapses into
//! the anonymous session, so none of its operations return an error.

use tracing::{debug, info, warn};

use crate::codec;
use crate::identity::Identity;
use crate::session::{SessionHandle, SessionStore};
use crate::storage::TokenStorage;

/// Bridges the persisted token slot and the session store.
#[derive(Debug)]
pub struct TokenManager<S> {
    storage: S,
    store: SessionStore,
}

impl<S: TokenStorage> TokenManager<S> {
    /// Takes ownership of the session store; from here on the manager is its
    /// only writer.
    #[must_use]
    pub fn new(storage: S, store: SessionStore) -> Self {
        Self { storage, store }
    }

    /// Returns a read-only handle onto the session.
    #[must_use]
    pub fn session(&self) -> SessionHandle {
        self.store.handle()
    }

    /// Returns the storage backend.
    #[must_use]
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Restores the session from the persisted token.
    ///
    /// Must complete before the navigation guard is first consulted. With no
    /// persisted token (or unreadable storage) the session is left untouched.
    pub fn initialize(&self) -> Option<Identity> {
        match self.storage.load() {
            Ok(Some(token)) => self.populate(&token),
            Ok(None) => {
                debug!("No persisted token, starting anonymous");
                None
            }
            Err(report) => {
                warn!(error = %report, "Token storage unreadable, starting anonymous");
                None
            }
        }
    }

    /// Persists a freshly issued token and signs its holder in.
    ///
    /// A token that cannot be persisted is treated as absent: the session is
    /// cleared and nobody is signed in.
    pub fn login(&self, token: &str) -> Option<Identity> {
        if let Err(report) = self.storage.store(token) {
            warn!(error = %report, "Failed to persist token, staying signed out");
            self.store.clear();
            return None;
        }
        let identity = self.populate(token)?;
        info!(email = identity.email(), role = identity.role(), "Signed in");
        Some(identity)
    }

    /// Forgets the persisted token and signs out.
    pub fn logout(&self) {
        if let Err(report) = self.storage.remove() {
            warn!(error = %report, "Failed to remove persisted token");
        }
        if self.store.clear() {
            info!("Signed out");
        }
    }

    /// Returns the persisted token, if any.
    #[must_use]
    pub fn token(&self) -> Option<String> {
        if !self.store.handle().is_authenticated() {
            return None;
        }
        match self.storage.load() {
            Ok(token) => token,
            Err(report) => {
                warn!(error = %report, "Token storage unreadable");
                None
            }
        }
    }

    /// Returns the `Authorization` header value for API calls.
    #[must_use]
    pub fn authorization_header(&self) -> Option<String> {
        self.token().map(|token| format!("Bearer {token}"))
    }

    fn populate(&self, token: &str) -> Option<Identity> {
        match codec::decode(token) {
            Ok(claims) => {
                debug!(
                    email = claims.subject(),
                    role = claims.role(),
                    expires_at = ?claims.expires_at(),
                    "Decoded persisted token"
                );
                let identity = Identity::from(claims);
                self.store.set_identity(identity.clone());
                Some(identity)
            }
            Err(report) => {
                warn!(error = %report, "Discarding malformed token");
                if let Err(report) = self.storage.remove() {
                    warn!(error = %report, "Failed to remove malformed token");
                }
                self.store.clear();
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::tests::token_for;
    use crate::error::{Result, StorageError};
    use crate::storage::{FileTokenStorage, MemoryTokenStorage};
    use serde_json::json;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Storage whose backend is missing altogether.
    struct NoStorage;

    impl TokenStorage for NoStorage {
        fn load(&self) -> Result<Option<String>, StorageError> {
            Err(StorageError::Unavailable {
                reason: "no backend".to_string(),
            }
            .into())
        }

        fn store(&self, _token: &str) -> Result<(), StorageError> {
            self.load().map(|_| ())
        }

        fn remove(&self) -> Result<(), StorageError> {
            self.load().map(|_| ())
        }
    }

    /// Storage that can be read but rejects every change.
    struct ReadOnlyStorage(MemoryTokenStorage);

    impl ReadOnlyStorage {
        fn with_token(token: String) -> Self {
            Self(MemoryTokenStorage::with_token(token))
        }
    }

    impl TokenStorage for ReadOnlyStorage {
        fn load(&self) -> Result<Option<String>, StorageError> {
            self.0.load()
        }

        fn store(&self, _token: &str) -> Result<(), StorageError> {
            Err(StorageError::Failed {
                operation: "write",
                reason: "quota exceeded".to_string(),
            }
            .into())
        }

        fn remove(&self) -> Result<(), StorageError> {
            Err(StorageError::Failed {
                operation: "remove",
                reason: "read-only".to_string(),
            }
            .into())
        }
    }

    fn admin_token() -> String {
        token_for(&json!({"sub": "a@b.com", "role": "admin", "full_name": "A"}))
    }

    fn manager(storage: MemoryTokenStorage) -> TokenManager<MemoryTokenStorage> {
        TokenManager::new(storage, SessionStore::new())
    }

    fn count_notifications(handle: &SessionHandle) -> Arc<AtomicUsize> {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        handle.subscribe(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        calls
    }

    #[test]
    fn initialize_without_token_does_not_touch_session() {
        let manager = manager(MemoryTokenStorage::new());
        let calls = count_notifications(&manager.session());

        assert!(manager.initialize().is_none());
        assert!(manager.initialize().is_none());

        assert!(!manager.session().is_authenticated());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn initialize_populates_identity_from_persisted_token() {
        let manager = manager(MemoryTokenStorage::with_token(admin_token()));

        let identity = manager.initialize().expect("identity");
        assert_eq!(identity.email(), "a@b.com");
        assert_eq!(identity.role(), "admin");
        assert_eq!(identity.display_name(), Some("A"));
        assert_eq!(manager.session().current(), Some(identity));
    }

    #[test]
    fn initialize_discards_malformed_token() {
        let storage = MemoryTokenStorage::with_token("definitely-not-a-token");
        let manager = manager(storage.clone());

        assert!(manager.initialize().is_none());
        assert_eq!(storage.peek(), None);
        assert!(!manager.session().is_authenticated());
    }

    #[test]
    fn initialize_with_unavailable_storage_starts_anonymous() {
        let manager = TokenManager::new(NoStorage, SessionStore::new());
        assert!(manager.initialize().is_none());
        assert!(!manager.session().is_authenticated());
    }

    #[test]
    fn login_persists_and_populates() {
        let storage = MemoryTokenStorage::new();
        let manager = manager(storage.clone());

        let identity = manager.login(&admin_token()).expect("identity");
        assert_eq!(identity.role(), "admin");
        assert_eq!(storage.peek(), Some(admin_token()));
        assert!(manager.session().is_authenticated());
    }

    #[test]
    fn login_with_malformed_token_clears_everything() {
        let storage = MemoryTokenStorage::new();
        let manager = manager(storage.clone());
        manager.login(&admin_token()).expect("identity");

        assert!(manager.login("garbage").is_none());
        assert_eq!(storage.peek(), None);
        assert!(!manager.session().is_authenticated());
    }

    #[test]
    fn login_without_storage_stays_anonymous() {
        let manager = TokenManager::new(NoStorage, SessionStore::new());
        assert!(manager.login(&admin_token()).is_none());
        assert!(!manager.session().is_authenticated());
        assert!(manager.token().is_none());
        assert!(manager.authorization_header().is_none());
    }

    #[test]
    fn failed_persist_signs_out_previous_identity() {
        let storage = ReadOnlyStorage::with_token(admin_token());
        let manager = TokenManager::new(storage, SessionStore::new());
        manager.initialize().expect("identity");

        let other = token_for(&json!({"sub": "u@b.com", "role": "user"}));
        assert!(manager.login(&other).is_none());
        assert!(!manager.session().is_authenticated());
    }

    #[test]
    fn logout_removes_token_and_clears_session() {
        let storage = MemoryTokenStorage::with_token(admin_token());
        let manager = manager(storage.clone());
        manager.initialize().expect("identity");

        manager.logout();
        assert_eq!(storage.peek(), None);
        assert!(!manager.session().is_authenticated());
        assert!(manager.token().is_none());
    }

    #[test]
    fn logout_with_unavailable_storage_still_clears_session() {
        let manager = TokenManager::new(ReadOnlyStorage::with_token(admin_token()), SessionStore::new());
        manager.initialize().expect("identity");
        manager.logout();
        assert!(!manager.session().is_authenticated());
    }

    #[test]
    fn identity_present_iff_last_decode_succeeded() {
        let manager = manager(MemoryTokenStorage::new());
        let session = manager.session();

        manager.login(&admin_token());
        assert!(session.is_authenticated());

        manager.login("a.b");
        assert!(!session.is_authenticated());

        manager.login(&token_for(&json!({"sub": "u@b.com", "role": "user"})));
        assert_eq!(
            session.current().map(|i| i.role().to_string()),
            Some("user".to_string())
        );

        manager.logout();
        assert!(!session.is_authenticated());
    }

    #[test]
    fn authorization_header_uses_bearer_scheme() {
        let manager = manager(MemoryTokenStorage::new());
        assert!(manager.authorization_header().is_none());

        manager.login(&admin_token());
        assert_eq!(
            manager.authorization_header(),
            Some(format!("Bearer {}", admin_token()))
        );
    }

    #[test]
    fn file_backed_session_survives_restart() {
        let dir = tempfile::tempdir().expect("tempdir");

        let first = TokenManager::new(
            FileTokenStorage::in_dir(dir.path(), "userToken"),
            SessionStore::new(),
        );
        first.login(&admin_token()).expect("identity");

        let second = TokenManager::new(
            FileTokenStorage::in_dir(dir.path(), "userToken"),
            SessionStore::new(),
        );
        let restored = second.initialize().expect("restored identity");
        assert_eq!(restored.email(), "a@b.com");
    }
}
