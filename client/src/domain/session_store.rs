//! Durable persistence of the current session.
//!
//! The session is stored as JSON under a single well-known key so that a
//! restart restores it. Storage failures surface as [`SessionError::Storage`];
//! unreadable values surface as [`SessionError::CorruptSession`] and are left in
//! place for the caller to decide what to do.

use std::sync::Arc;

use crate::domain::Session;
use crate::domain::ports::{KeyValueStore, KeyValueStoreError, define_port_error};

/// Key under which the session JSON lives.
pub const SESSION_STORAGE_KEY: &str = "taskforgeUser";

define_port_error! {
    /// Failures while establishing, restoring, or clearing a session.
    pub enum SessionError {
        /// The token handed to `login` is not a well-formed bearer token.
        MalformedToken { message: String } => "malformed bearer token: {message}",
        /// The persisted value cannot be parsed back into a session.
        CorruptSession { message: String } => "stored session is unreadable: {message}",
        /// The storage backend failed.
        Storage { message: String } => "session storage failed: {message}",
    }
}

impl From<KeyValueStoreError> for SessionError {
    fn from(value: KeyValueStoreError) -> Self {
        Self::storage(value.to_string())
    }
}

/// Reads and writes the session under [`SESSION_STORAGE_KEY`].
#[derive(Clone)]
pub struct SessionStore {
    backend: Arc<dyn KeyValueStore>,
}

impl SessionStore {
    /// Wrap a key-value backend.
    pub fn new(backend: Arc<dyn KeyValueStore>) -> Self {
        Self { backend }
    }

    /// Persist `session`, replacing any previous one.
    pub fn save(&self, session: &Session) -> Result<(), SessionError> {
        let json = serde_json::to_string(session)
            .map_err(|err| SessionError::storage(err.to_string()))?;
        self.backend.set(SESSION_STORAGE_KEY, &json)?;
        Ok(())
    }

    /// Load the persisted session.
    ///
    /// Returns `Ok(None)` when nothing is stored. A stored value that is not
    /// valid JSON, or whose token is not well formed, is reported as
    /// [`SessionError::CorruptSession`].
    pub fn load(&self) -> Result<Option<Session>, SessionError> {
        let Some(raw) = self.backend.get(SESSION_STORAGE_KEY)? else {
            return Ok(None);
        };
        serde_json::from_str::<Session>(&raw)
            .map(Some)
            .map_err(|err| SessionError::corrupt_session(err.to_string()))
    }

    /// Remove the persisted session. Succeeds when nothing is stored.
    pub fn clear(&self) -> Result<(), SessionError> {
        self.backend.remove(SESSION_STORAGE_KEY)?;
        Ok(())
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("key", &SESSION_STORAGE_KEY)
            .finish_non_exhaustive()
    }
}
