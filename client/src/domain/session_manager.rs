//! Single owner of the authentication state.
//!
//! The manager starts in [`SessionState::Loading`] and only reports a definite
//! answer after [`SessionManager::initialize`] has consulted storage. Every
//! transition is written through to storage before memory changes, so a failed
//! write leaves both sides as they were.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::domain::ports::{Navigator, Route};
use crate::domain::{Role, Session, SessionError, SessionState, SessionStore};

/// Why a protected view cannot proceed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDenied {
    /// Storage has not been consulted yet.
    NotReady,
    /// No user is signed in.
    SignedOut,
}

/// Owns the in-memory session and keeps it in step with storage.
pub struct SessionManager {
    store: SessionStore,
    navigator: Arc<dyn Navigator>,
    state: SessionState,
}

impl SessionManager {
    /// Create a manager in the `Loading` state.
    pub fn new(store: SessionStore, navigator: Arc<dyn Navigator>) -> Self {
        Self {
            store,
            navigator,
            state: SessionState::Loading,
        }
    }

    /// Restore the persisted session, if any.
    ///
    /// An unreadable stored value is logged and treated as no session; it is
    /// not removed. Storage read failures are treated the same way so that
    /// start-up always ends in a definite state.
    pub fn initialize(&mut self) -> &SessionState {
        self.state = match self.store.load() {
            Ok(Some(session)) => {
                info!(
                    role = session.role().map(Role::as_str),
                    "restored persisted session"
                );
                SessionState::Authenticated(session)
            }
            Ok(None) => {
                debug!("no persisted session");
                SessionState::Unauthenticated
            }
            Err(err) => {
                warn!(error = %err, "ignoring unreadable persisted session");
                SessionState::Unauthenticated
            }
        };
        &self.state
    }

    /// Establish a session from a raw bearer token and go to the task list.
    ///
    /// # Errors
    ///
    /// [`SessionError::MalformedToken`] when the token is not a three-segment
    /// token with a decodable JSON payload, and [`SessionError::Storage`] when
    /// it cannot be persisted. In both cases the current state is unchanged
    /// and no navigation happens.
    pub fn login(&mut self, token: &str) -> Result<Session, SessionError> {
        let session = Session::from_token(token)
            .map_err(|err| SessionError::malformed_token(err.to_string()))?;
        self.store.save(&session)?;
        info!(
            role = session.role().map(Role::as_str),
            "session established"
        );
        self.state = SessionState::Authenticated(session.clone());
        self.navigator.navigate(Route::Tasks);
        Ok(session)
    }

    /// Drop the session and go to the login view.
    ///
    /// Logging out without a session still navigates.
    ///
    /// # Errors
    ///
    /// [`SessionError::Storage`] when the persisted session cannot be removed.
    /// The in-memory session is then kept so both sides stay consistent.
    pub fn logout(&mut self) -> Result<(), SessionError> {
        self.store.clear()?;
        if self.state.session().is_some() {
            info!("session cleared");
        }
        self.state = SessionState::Unauthenticated;
        self.navigator.navigate(Route::Login);
        Ok(())
    }

    /// The active session, if any.
    pub fn current_session(&self) -> Option<&Session> {
        self.state.session()
    }

    /// The full tri-state view of authentication.
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Gate for protected views.
    ///
    /// Returns the session when one is active. When storage has been read and
    /// nobody is signed in, the user is sent to the login view.
    ///
    /// # Errors
    ///
    /// [`AccessDenied::NotReady`] before [`Self::initialize`] and
    /// [`AccessDenied::SignedOut`] when there is no session.
    pub fn require_session(&self) -> Result<&Session, AccessDenied> {
        match &self.state {
            SessionState::Loading => Err(AccessDenied::NotReady),
            SessionState::Unauthenticated => {
                self.navigator.navigate(Route::Login);
                Err(AccessDenied::SignedOut)
            }
            SessionState::Authenticated(session) => Ok(session),
        }
    }
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("store", &self.store)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}
