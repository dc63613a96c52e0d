//! Persistent token slot.
//!
//! The token lives in a single key-value slot (`userToken` by default). In
//! the browser that slot is `localStorage`; the web crate provides that
//! backend. This module defines the seam plus two backends that work
//! anywhere: an in-memory slot and a file-backed slot.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use crate::error::{Result, StorageError};

/// A single persistent slot holding the bearer token.
///
/// Implementations report a missing backend as
/// [`StorageError::Unavailable`]; callers treat every error on `load` as
/// "no token present".
pub trait TokenStorage {
    /// Reads the persisted token, if any.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the backend is unavailable or the read fails.
    fn load(&self) -> Result<Option<String>, StorageError>;

    /// Persists `token`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the backend is unavailable or the write fails.
    fn store(&self, token: &str) -> Result<(), StorageError>;

    /// Removes the persisted token. Removing an absent token succeeds.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the backend is unavailable or the removal fails.
    fn remove(&self) -> Result<(), StorageError>;
}

/// In-memory slot. Clones share the same slot.
#[derive(Debug, Clone, Default)]
pub struct MemoryTokenStorage {
    slot: Arc<Mutex<Option<String>>>,
}

impl MemoryTokenStorage {
    /// Creates an empty slot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a slot that already holds `token`.
    #[must_use]
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Some(token.into()))),
        }
    }

    /// Returns the slot's current content without going through the trait.
    #[must_use]
    pub fn peek(&self) -> Option<String> {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl TokenStorage for MemoryTokenStorage {
    fn load(&self) -> Result<Option<String>, StorageError> {
        Ok(self.peek())
    }

    fn store(&self, token: &str) -> Result<(), StorageError> {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = Some(token.to_string());
        Ok(())
    }

    fn remove(&self) -> Result<(), StorageError> {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        Ok(())
    }
}

/// File-backed slot for hosts without browser storage.
///
/// The token is kept in a single file named after the storage key.
#[derive(Debug, Clone)]
pub struct FileTokenStorage {
    path: PathBuf,
}

impl FileTokenStorage {
    /// Uses the file at `path` as the slot.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Uses `<dir>/<key>` as the slot.
    #[must_use]
    pub fn in_dir(dir: impl AsRef<Path>, key: &str) -> Self {
        Self::new(dir.as_ref().join(key))
    }

    /// Returns the file backing the slot.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TokenStorage for FileTokenStorage {
    fn load(&self) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(&self.path) {
            Ok(content) => {
                let token = content.trim();
                Ok((!token.is_empty()).then(|| token.to_string()))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::Failed {
                operation: "read",
                reason: format!("{}: {e}", self.path.display()),
            }
            .into()),
        }
    }

    fn store(&self, token: &str) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| StorageError::Unavailable {
                reason: format!("{}: {e}", parent.display()),
            })?;
        }
        fs::write(&self.path, token).map_err(|e| StorageError::Failed {
            operation: "write",
            reason: format!("{}: {e}", self.path.display()),
        })?;
        Ok(())
    }

    fn remove(&self) -> Result<(), StorageError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::Failed {
                operation: "remove",
                reason: format!("{}: {e}", self.path.display()),
            }
            .into()),
        }
    }
}
