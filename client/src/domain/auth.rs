//! Authentication inputs: login credentials and password resets.
//!
//! Keep raw terminal input parsing outside the domain by exposing constructors
//! that validate string inputs before a view talks to a port or service.

use std::fmt;

use zeroize::Zeroizing;

/// Domain error returned when authentication input values are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialsValidationError {
    /// Email was missing or blank once trimmed.
    EmptyEmail,
    /// Password was blank.
    EmptyPassword,
    /// Reset token was blank.
    EmptyResetToken,
    /// Reset token would not fit in a single URL path segment.
    InvalidResetToken,
}

impl fmt::Display for CredentialsValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyEmail => write!(f, "email must not be empty"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
            Self::EmptyResetToken => write!(f, "reset token must not be empty"),
            Self::InvalidResetToken => write!(f, "reset token must not contain '/' or whitespace"),
        }
    }
}

impl std::error::Error for CredentialsValidationError {}

/// Validated login credentials sent to `POST /auth/login`.
///
/// ## Invariants
/// - `email` is trimmed and must not be empty after trimming.
/// - `password` must be non-empty but keeps caller-provided whitespace.
///
/// # Examples
/// ```
/// use client::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts(" ada@example.com ", "hunter2").unwrap();
/// assert_eq!(creds.email(), "ada@example.com");
/// assert_eq!(creds.password(), "hunter2");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw email/password inputs.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, CredentialsValidationError> {
        let normalized = email.trim();
        if normalized.is_empty() {
            return Err(CredentialsValidationError::EmptyEmail);
        }

        if password.is_empty() {
            return Err(CredentialsValidationError::EmptyPassword);
        }

        Ok(Self {
            email: normalized.to_owned(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Email address identifying the account.
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    /// Password provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// A password reset request for `POST /auth/reset-password/:token`.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordReset {
    reset_token: String,
    password: Zeroizing<String>,
}

impl PasswordReset {
    /// Validate the emailed reset token and the new password.
    pub fn try_from_parts(
        reset_token: &str,
        password: &str,
    ) -> Result<Self, CredentialsValidationError> {
        let token = reset_token.trim();
        if token.is_empty() {
            return Err(CredentialsValidationError::EmptyResetToken);
        }
        if token.contains('/') || token.chars().any(char::is_whitespace) {
            return Err(CredentialsValidationError::InvalidResetToken);
        }
        if password.is_empty() {
            return Err(CredentialsValidationError::EmptyPassword);
        }
        Ok(Self {
            reset_token: token.to_owned(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Token from the reset link.
    pub fn reset_token(&self) -> &str {
        self.reset_token.as_str()
    }

    /// The new password.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

impl fmt::Debug for LoginCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginCredentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl fmt::Debug for PasswordReset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PasswordReset")
            .field("reset_token", &"<redacted>")
            .field("password", &"<redacted>")
            .finish()
    }
}
