//! Browser `localStorage` token slot.
//!
//! Requires a browser environment. Elsewhere every operation reports
//! [`StorageError::Unavailable`], which the token manager treats as
//! "no token present".

use reservoir_watch_access::{Result, StorageError, TokenStorage};

/// Token slot backed by `window.localStorage`.
#[derive(Debug, Clone)]
pub struct BrowserTokenStorage {
    key: String,
}

impl BrowserTokenStorage {
    /// Creates a slot stored under `key`.
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }

    /// Returns the storage key.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl TokenStorage for BrowserTokenStorage {
    fn load(&self) -> Result<Option<String>, StorageError> {
        #[cfg(feature = "csr")]
        {
            let token = local_storage()?
                .get_item(&self.key)
                .map_err(|e| failed("read", e))?;
            Ok(token)
        }
        #[cfg(not(feature = "csr"))]
        {
            Err(unavailable().into())
        }
    }

    fn store(&self, token: &str) -> Result<(), StorageError> {
        #[cfg(feature = "csr")]
        {
            local_storage()?
                .set_item(&self.key, token)
                .map_err(|e| failed("write", e))?;
            Ok(())
        }
        #[cfg(not(feature = "csr"))]
        {
            let _ = token;
            Err(unavailable().into())
        }
    }

    fn remove(&self) -> Result<(), StorageError> {
        #[cfg(feature = "csr")]
        {
            local_storage()?
                .remove_item(&self.key)
                .map_err(|e| failed("remove", e))?;
            Ok(())
        }
        #[cfg(not(feature = "csr"))]
        {
            Err(unavailable().into())
        }
    }
}

#[cfg(feature = "csr")]
fn local_storage() -> std::result::Result<web_sys::Storage, StorageError> {
    let window = web_sys::window().ok_or_else(|| StorageError::Unavailable {
        reason: "no browser window".to_string(),
    })?;
    match window.local_storage() {
        Ok(Some(storage)) => Ok(storage),
        Ok(None) => Err(StorageError::Unavailable {
            reason: "localStorage is disabled".to_string(),
        }),
        Err(e) => Err(StorageError::Unavailable {
            reason: format!("{e:?}"),
        }),
    }
}

#[cfg(feature = "csr")]
fn failed(operation: &'static str, error: impl std::fmt::Debug) -> StorageError {
    StorageError::Failed {
        operation,
        reason: format!("{error:?}"),
    }
}

#[cfg(not(feature = "csr"))]
fn unavailable() -> StorageError {
    StorageError::Unavailable {
        reason: "not running in a browser".to_string(),
    }
}

#[cfg(all(test, not(feature = "csr")))]
mod tests {
    use super::*;
    use reservoir_watch_access::{SessionStore, TokenManager};

    #[test]
    fn outside_browser_storage_is_unavailable() {
        let storage = BrowserTokenStorage::new("userToken");
        assert_eq!(storage.key(), "userToken");

        let report = storage.load().expect_err("no browser");
        assert!(matches!(
            report.current_context(),
            StorageError::Unavailable { .. }
        ));
        assert!(storage.store("t").is_err());
        assert!(storage.remove().is_err());
    }

    #[test]
    fn manager_starts_anonymous_without_browser() {
        let manager = TokenManager::new(BrowserTokenStorage::new("userToken"), SessionStore::new());
        assert!(manager.initialize().is_none());
        assert!(!manager.session().is_authenticated());
    }
}
