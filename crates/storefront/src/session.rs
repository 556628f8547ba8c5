//! Bearer-token session storage.
//!
//! A session is authenticated by a single bearer token issued at login. The
//! token is the only client-side state that survives a restart; everything
//! else (cart, checkout snapshot, toasts) is memory-only and lost with the
//! store. Token validity is decided entirely by the backend rejecting
//! requests; there is no expiry checking or refresh here.

use std::path::PathBuf;
use std::sync::Mutex;

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

/// Errors from persisting or clearing the session token.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session storage error: {0}")]
    Io(#[from] std::io::Error),
}

/// Storage for the session bearer token.
///
/// The trait seam lets the engine run against a file-backed store in the
/// CLI and an in-memory store in tests.
pub trait TokenStore: Send + Sync {
    /// The current token, if one is stored.
    fn token(&self) -> Option<SecretString>;

    /// Store a token, replacing any existing one.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] if the token cannot be persisted.
    fn set_token(&self, token: SecretString) -> Result<(), SessionError>;

    /// Remove the stored token.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] if the stored token cannot be removed.
    fn clear(&self) -> Result<(), SessionError>;

    /// Whether a non-empty token is present.
    fn is_authenticated(&self) -> bool {
        self.token()
            .is_some_and(|token| !token.expose_secret().is_empty())
    }
}

/// File-backed token store.
///
/// Persists the token as the sole content of a fixed file, the desktop
/// analogue of a browser's local-storage key.
#[derive(Debug)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    /// Create a store persisting to `path`.
    #[must_use]
    pub const fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl TokenStore for FileTokenStore {
    fn token(&self) -> Option<SecretString> {
        let contents = std::fs::read_to_string(&self.path).ok()?;
        let token = contents.trim();
        if token.is_empty() {
            return None;
        }
        Some(SecretString::from(token.to_owned()))
    }

    fn set_token(&self, token: SecretString) -> Result<(), SessionError> {
        std::fs::write(&self.path, token.expose_secret())?;
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-memory token store for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    slot: Mutex<Option<SecretString>>,
}

impl MemoryTokenStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-loaded with a token.
    #[must_use]
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            slot: Mutex::new(Some(SecretString::from(token.into()))),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn token(&self) -> Option<SecretString> {
        self.slot.lock().expect("token lock poisoned").clone()
    }

    fn set_token(&self, token: SecretString) -> Result<(), SessionError> {
        *self.slot.lock().expect("token lock poisoned") = Some(token);
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        *self.slot.lock().expect("token lock poisoned") = None;
        Ok(())
    }
}
