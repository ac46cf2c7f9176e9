//! Session primitives: bearer tokens, their claims, and the session record.
//!
//! A bearer token is trusted as issued. The payload segment is decoded to read
//! claims, but the signature is never checked, so any syntactically valid
//! token is accepted. Role claims must therefore not be used for anything
//! stronger than presentation decisions.

use std::fmt;

use base64::Engine as _;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Token payloads are base64url; issuers disagree on padding, so accept both.
const PAYLOAD_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

const SEGMENT_COUNT: usize = 3;

/// Reasons a raw string is not an acceptable bearer token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// The token string was empty.
    Empty,
    /// The token did not split into `header.payload.signature`.
    SegmentCount {
        /// Number of dot-separated segments found.
        found: usize,
    },
    /// The payload segment is not valid base64url.
    PayloadEncoding {
        /// Decoder message.
        message: String,
    },
    /// The decoded payload is not JSON.
    PayloadJson {
        /// Parser message.
        message: String,
    },
}

impl fmt::Display for TokenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "token must not be empty"),
            Self::SegmentCount { found } => write!(
                f,
                "token must have {SEGMENT_COUNT} dot-separated segments, found {found}"
            ),
            Self::PayloadEncoding { message } => {
                write!(f, "token payload is not base64url: {message}")
            }
            Self::PayloadJson { message } => write!(f, "token payload is not JSON: {message}"),
        }
    }
}

impl std::error::Error for TokenError {}

/// Opaque bearer credential shaped as `header.payload.signature`.
///
/// Construction only checks the shape. Use [`TokenClaims::decode`] to read the
/// payload.
///
/// # Examples
/// ```
/// use client::domain::BearerToken;
///
/// assert!(BearerToken::new("a.b.c").is_ok());
/// assert!(BearerToken::new("not-a-token").is_err());
/// ```
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BearerToken(String);

impl BearerToken {
    /// Validate the token shape.
    pub fn new(raw: impl Into<String>) -> Result<Self, TokenError> {
        let raw = raw.into();
        if raw.is_empty() {
            return Err(TokenError::Empty);
        }
        let found = raw.split('.').count();
        if found != SEGMENT_COUNT {
            return Err(TokenError::SegmentCount { found });
        }
        Ok(Self(raw))
    }

    /// The raw credential, suitable for an `Authorization` header.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    fn payload_segment(&self) -> &str {
        self.0.split('.').nth(1).unwrap_or_default()
    }
}

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BearerToken(<redacted>)")
    }
}

impl TryFrom<String> for BearerToken {
    type Error = TokenError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<BearerToken> for String {
    fn from(value: BearerToken) -> Self {
        value.0
    }
}

/// Decoded, unverified claims carried in a token payload.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenClaims(Value);

impl TokenClaims {
    /// Decode the payload segment of `token`.
    ///
    /// # Examples
    /// ```
    /// use base64::Engine as _;
    /// use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    /// use client::domain::{BearerToken, TokenClaims};
    ///
    /// let payload = URL_SAFE_NO_PAD.encode(r#"{"role":"admin"}"#);
    /// let token = BearerToken::new(format!("h.{payload}.s")).unwrap();
    /// let claims = TokenClaims::decode(&token).unwrap();
    /// assert_eq!(claims.role().map(|r| r.as_str().to_owned()), Some("admin".to_owned()));
    /// ```
    pub fn decode(token: &BearerToken) -> Result<Self, TokenError> {
        let bytes = PAYLOAD_ENGINE
            .decode(token.payload_segment())
            .map_err(|err| TokenError::PayloadEncoding {
                message: err.to_string(),
            })?;
        let value = serde_json::from_slice(&bytes).map_err(|err| TokenError::PayloadJson {
            message: err.to_string(),
        })?;
        Ok(Self(value))
    }

    /// The `role` claim when it is present and a string.
    pub fn role(&self) -> Option<Role> {
        self.claim("role")
            .and_then(Value::as_str)
            .map(Role::new)
    }

    /// Look up an arbitrary claim by name.
    pub fn claim(&self, name: &str) -> Option<&Value> {
        self.0.as_object().and_then(|claims| claims.get(name))
    }
}

/// Role claim copied from the token payload.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Role(String);

impl Role {
    /// Role name used by the API for administrators.
    pub const ADMIN: &'static str = "admin";

    /// Wrap a role name as found in the claims.
    pub fn new(role: impl Into<String>) -> Self {
        Self(role.into())
    }

    /// The role name.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Whether the claim names the administrator role.
    pub fn is_admin(&self) -> bool {
        self.0 == Self::ADMIN
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The client-held record of an authenticated identity.
///
/// Serialises to `{"token": "...", "role": "..."}`; `role` is omitted when the
/// token carried none.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    token: BearerToken,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<Role>,
}

impl Session {
    /// Assemble a session from already-validated parts.
    pub fn new(token: BearerToken, role: Option<Role>) -> Self {
        Self { token, role }
    }

    /// Validate `raw` and derive the role from its payload.
    pub fn from_token(raw: impl Into<String>) -> Result<Self, TokenError> {
        let token = BearerToken::new(raw)?;
        let claims = TokenClaims::decode(&token)?;
        Ok(Self::new(token, claims.role()))
    }

    /// Bearer credential for outgoing requests.
    pub fn token(&self) -> &BearerToken {
        &self.token
    }

    /// Role claim, if the token carried one.
    pub fn role(&self) -> Option<&Role> {
        self.role.as_ref()
    }
}

/// Readiness-aware view of the current session.
///
/// Views must not redirect while the state is [`SessionState::Loading`]: the
/// persisted session has not been read yet.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionState {
    /// Persisted state has not been restored yet.
    #[default]
    Loading,
    /// No session is held.
    Unauthenticated,
    /// A session is held.
    Authenticated(Session),
}

impl SessionState {
    /// The held session, if any.
    pub fn session(&self) -> Option<&Session> {
        match self {
            Self::Authenticated(session) => Some(session),
            Self::Loading | Self::Unauthenticated => None,
        }
    }

    /// Whether restoration has completed.
    pub fn is_ready(&self) -> bool {
        !matches!(self, Self::Loading)
    }
}

impl From<Option<Session>> for SessionState {
    fn from(value: Option<Session>) -> Self {
        value.map_or(Self::Unauthenticated, Self::Authenticated)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for token parsing and claim extraction.

    use super::*;
    use base64::engine::general_purpose::{URL_SAFE, URL_SAFE_NO_PAD};
    use rstest::rstest;
    use serde_json::json;

    fn token_with_payload(payload: &str) -> String {
        format!("eyJhbGciOiJIUzI1NiJ9.{}.c2ln", URL_SAFE_NO_PAD.encode(payload))
    }

    #[rstest]
    #[case("", TokenError::Empty)]
    #[case("not-a-valid-token", TokenError::SegmentCount { found: 1 })]
    #[case("a.b", TokenError::SegmentCount { found: 2 })]
    #[case("a.b.c.d", TokenError::SegmentCount { found: 4 })]
    fn rejects_misshapen_tokens(#[case] raw: &str, #[case] expected: TokenError) {
        assert_eq!(BearerToken::new(raw).expect_err("shape must fail"), expected);
    }

    #[rstest]
    fn extracts_role_claim() {
        let session = Session::from_token(token_with_payload(r#"{"role":"admin","id":"42"}"#))
            .expect("valid token");
        assert_eq!(session.role().map(Role::as_str), Some("admin"));
        assert!(session.role().is_some_and(Role::is_admin));
    }

    #[rstest]
    #[case::missing(r#"{"id":"42"}"#)]
    #[case::not_a_string(r#"{"role":7}"#)]
    #[case::not_an_object("[1,2,3]")]
    fn absent_role_is_not_an_error(#[case] payload: &str) {
        let session = Session::from_token(token_with_payload(payload)).expect("valid token");
        assert!(session.role().is_none());
    }

    #[rstest]
    fn accepts_padded_payloads() {
        let payload = URL_SAFE.encode(r#"{"role":"editor"}"#);
        assert!(payload.ends_with('='), "fixture must carry padding");
        let session = Session::from_token(format!("h.{payload}.s")).expect("padded payload");
        assert_eq!(session.role().map(Role::as_str), Some("editor"));
    }

    #[rstest]
    #[case::bad_alphabet("h.%%%%.s")]
    #[case::empty_payload("h..s")]
    fn rejects_undecodable_payloads(#[case] raw: &str) {
        let err = Session::from_token(raw).expect_err("payload must fail");
        assert!(
            matches!(
                err,
                TokenError::PayloadEncoding { .. } | TokenError::PayloadJson { .. }
            ),
            "unexpected error: {err:?}"
        );
    }

    #[rstest]
    fn rejects_non_json_payloads() {
        let err = Session::from_token(token_with_payload("plain text")).expect_err("not json");
        assert!(matches!(err, TokenError::PayloadJson { .. }));
    }

    #[rstest]
    fn serialises_to_persisted_layout() {
        let session = Session::new(
            BearerToken::new("a.b.c").expect("shape"),
            Some(Role::new("user")),
        );
        let value = serde_json::to_value(&session).expect("serialise");
        assert_eq!(value, json!({ "token": "a.b.c", "role": "user" }));

        let anonymous = Session::new(BearerToken::new("a.b.c").expect("shape"), None);
        let value = serde_json::to_value(&anonymous).expect("serialise");
        assert_eq!(value, json!({ "token": "a.b.c" }));
    }

    #[rstest]
    fn debug_output_redacts_the_token() {
        let token = BearerToken::new("secret.secret.secret").expect("shape");
        assert!(!format!("{token:?}").contains("secret"));
    }

    #[rstest]
    fn state_defaults_to_loading() {
        let state = SessionState::default();
        assert!(!state.is_ready());
        assert!(state.session().is_none());
        assert_eq!(SessionState::from(None), SessionState::Unauthenticated);
    }
}
