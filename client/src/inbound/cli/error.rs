//! Terminal mapping for domain errors.
//!
//! Keeps the domain error type process-agnostic while giving every failure a
//! stable exit status.

use std::io::{self, Write};

use serde_json::Value;
use thiserror::Error;

use crate::domain::{Error, ErrorCode};

/// Failures surfaced by a command.
#[derive(Debug, Error)]
pub enum CliError {
    /// A use case failed.
    #[error("{0}")]
    Domain(#[from] Error),
    /// The user supplied unusable input.
    #[error("{0}")]
    Input(String),
    /// Reading from or writing to the terminal failed.
    #[error("terminal I/O failed: {0}")]
    Io(#[from] io::Error),
}

impl CliError {
    /// Build an input error.
    pub fn input(message: impl Into<String>) -> Self {
        Self::Input(message.into())
    }

    /// Write the failure for the user, followed by its cause when the domain
    /// error carries one.
    pub fn report(&self, out: &mut impl Write) -> io::Result<()> {
        writeln!(out, "error: {self}")?;
        let Self::Domain(error) = self else {
            return Ok(());
        };
        match error.details() {
            Some(details) => match details.get("cause").and_then(Value::as_str) {
                Some(cause) => writeln!(out, "  cause: {cause}"),
                None => writeln!(out, "  details: {details}"),
            },
            None => Ok(()),
        }
    }

    /// Process exit status for this failure.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Domain(error) => exit_code_for(error.code()),
            Self::Input(_) => 2,
            Self::Io(_) => 1,
        }
    }
}

fn exit_code_for(code: ErrorCode) -> u8 {
    match code {
        ErrorCode::InvalidRequest => 2,
        ErrorCode::Unauthorized | ErrorCode::Forbidden => 3,
        ErrorCode::NotFound => 4,
        ErrorCode::ServiceUnavailable => 5,
        _ => 1,
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use super::*;
    use rstest::rstest;
    use serde_json::json;

    fn reported(err: &CliError) -> String {
        let mut out = Vec::new();
        err.report(&mut out).expect("writing to a buffer succeeds");
        String::from_utf8(out).expect("utf-8 report")
    }

    #[rstest]
    #[case(Error::invalid_request("bad"), 2)]
    #[case(Error::unauthorized("who?"), 3)]
    #[case(Error::forbidden("no"), 3)]
    #[case(Error::not_found("gone"), 4)]
    #[case(Error::service_unavailable("Network error"), 5)]
    #[case(Error::internal("boom"), 1)]
    fn domain_codes_map_to_exit_statuses(#[case] error: Error, #[case] expected: u8) {
        assert_eq!(CliError::from(error).exit_code(), expected);
    }

    #[test]
    fn messages_pass_through_unchanged() {
        let err = CliError::from(Error::unauthorized("Login failed"));
        assert_eq!(err.to_string(), "Login failed");
    }

    #[test]
    fn report_includes_the_underlying_cause() {
        let err = CliError::from(
            Error::internal("Login failed").with_details(json!({ "cause": "token has 2 segments" })),
        );
        assert_eq!(
            reported(&err),
            "error: Login failed\n  cause: token has 2 segments\n"
        );
    }

    #[test]
    fn report_falls_back_to_raw_details() {
        let err = CliError::from(Error::internal("boom").with_details(json!({ "status": 502 })));
        assert_eq!(reported(&err), "error: boom\n  details: {\"status\":502}\n");
    }

    #[rstest]
    #[case(CliError::from(Error::unauthorized("Invalid credentials")), "error: Invalid credentials\n")]
    #[case(CliError::input("title must not be blank"), "error: title must not be blank\n")]
    fn report_without_details_is_one_line(#[case] err: CliError, #[case] expected: &str) {
        assert_eq!(reported(&err), expected);
    }
}
