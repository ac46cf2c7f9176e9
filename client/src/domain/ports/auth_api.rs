//! Driven port for the remote authentication endpoints.
//!
//! Adapters own transport details; the domain only sees the bearer token on
//! success and a categorised error otherwise.

use async_trait::async_trait;

use crate::domain::{LoginCredentials, PasswordReset};

use super::define_port_error;

define_port_error! {
    /// Errors raised by authentication API adapters.
    pub enum AuthApiError {
        /// The server answered with a non-success status. `message` is the
        /// server-provided explanation and may be empty.
        Rejected { status: u16, message: String } =>
            "auth request rejected with status {status}: {message}",
        /// The request never completed.
        Transport { message: String } => "auth API unreachable: {message}",
        /// The request exceeded its deadline.
        Timeout { message: String } => "auth API timed out: {message}",
        /// The response body did not have the expected shape.
        Decode { message: String } => "unexpected auth API response: {message}",
    }
}

/// Remote authentication endpoints.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthApi: Send + Sync {
    /// Exchange credentials for a raw bearer token (`POST /auth/login`).
    async fn login(&self, credentials: &LoginCredentials) -> Result<String, AuthApiError>;

    /// Set a new password using an emailed reset token
    /// (`POST /auth/reset-password/:token`).
    async fn reset_password(&self, reset: &PasswordReset) -> Result<(), AuthApiError>;
}
