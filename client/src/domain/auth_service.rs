//! Sign-in and password reset use cases.
//!
//! Successful sign-in hands the server's token to the [`SessionManager`]; any
//! failure is reduced to a user-facing [`Error`] whose message comes from the
//! server when it supplied one.

use std::sync::Arc;

use serde_json::json;
use tracing::{info, warn};

use crate::domain::ports::{AuthApi, AuthApiError, Navigator, Route};
use crate::domain::{Error, LoginCredentials, PasswordReset, Session, SessionError, SessionManager};

const LOGIN_FAILED: &str = "Login failed";
const LOGIN_NETWORK_ERROR: &str = "Network error";
const RESET_FAILED: &str = "Something went wrong.";
const RESET_NETWORK_ERROR: &str = "Network error. Please try again.";

/// Authentication use cases backed by an [`AuthApi`].
pub struct AuthenticationService<A: ?Sized> {
    api: Arc<A>,
    navigator: Arc<dyn Navigator>,
}

impl<A> AuthenticationService<A>
where
    A: AuthApi + ?Sized,
{
    /// Build the service.
    pub fn new(api: Arc<A>, navigator: Arc<dyn Navigator>) -> Self {
        Self { api, navigator }
    }

    /// Exchange credentials for a session.
    ///
    /// On success the session is persisted and the user is sent to the task
    /// list by the manager.
    pub async fn sign_in(
        &self,
        manager: &mut SessionManager,
        credentials: &LoginCredentials,
    ) -> Result<Session, Error> {
        let token = self
            .api
            .login(credentials)
            .await
            .map_err(|err| map_auth_error(err, LOGIN_FAILED, LOGIN_NETWORK_ERROR))?;
        manager.login(&token).map_err(map_session_error)
    }

    /// Set a new password and return to the login view.
    pub async fn reset_password(&self, reset: &PasswordReset) -> Result<(), Error> {
        self.api
            .reset_password(reset)
            .await
            .map_err(|err| map_auth_error(err, RESET_FAILED, RESET_NETWORK_ERROR))?;
        info!("password reset accepted");
        self.navigator.navigate(Route::Login);
        Ok(())
    }
}

fn server_message(message: String, fallback: &str) -> String {
    if message.trim().is_empty() {
        fallback.to_owned()
    } else {
        message
    }
}

fn map_auth_error(error: AuthApiError, rejected_fallback: &str, network_fallback: &str) -> Error {
    match error {
        AuthApiError::Rejected { status, message } => {
            let message = server_message(message, rejected_fallback);
            match status {
                401 | 403 => Error::unauthorized(message),
                400..=499 => Error::invalid_request(message),
                _ => Error::service_unavailable(message),
            }
        }
        AuthApiError::Transport { message }
        | AuthApiError::Timeout { message }
        | AuthApiError::Decode { message } => {
            warn!(error = %message, "auth request did not complete");
            Error::service_unavailable(network_fallback).with_details(json!({ "cause": message }))
        }
    }
}

fn map_session_error(error: SessionError) -> Error {
    match error {
        SessionError::MalformedToken { message } => {
            warn!(error = %message, "server issued a malformed token");
            Error::internal(LOGIN_FAILED).with_details(json!({ "cause": message }))
        }
        SessionError::CorruptSession { message } | SessionError::Storage { message } => {
            Error::internal(format!("Could not save session: {message}"))
        }
    }
}
