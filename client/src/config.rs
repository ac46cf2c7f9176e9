//! Client configuration loaded via OrthoConfig.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use camino::Utf8PathBuf;
use ortho_config::OrthoConfig;
use serde::Deserialize;
use thiserror::Error;
use url::Url;

const DEFAULT_API_URL: &str = "http://localhost:5000/api";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const SESSION_DIR_NAME: &str = ".taskforge";

/// Problems with otherwise well-formed settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// `api_url` is not an absolute URL.
    #[error("invalid API URL '{value}': {message}")]
    InvalidApiUrl {
        /// Configured value.
        value: String,
        /// Parser explanation.
        message: String,
    },
    /// The session directory path is not UTF-8.
    #[error("session directory '{path}' is not valid UTF-8")]
    NonUtf8SessionDir {
        /// Lossy rendering of the path.
        path: String,
    },
    /// A zero timeout would fail every request.
    #[error("request timeout must be at least one second")]
    ZeroTimeout,
}

/// Settings for the `taskforge` binary.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "TASKFORGE")]
pub struct ClientSettings {
    /// Base URL of the REST API, including the `/api` prefix.
    pub api_url: Option<String>,
    /// Directory holding the persisted session.
    pub session_dir: Option<PathBuf>,
    /// Per-request timeout in seconds.
    pub request_timeout_secs: Option<u64>,
}

impl ClientSettings {
    /// Configured API base URL, falling back to the local development server.
    pub fn api_url(&self) -> Result<Url, SettingsError> {
        let raw = self.api_url.as_deref().unwrap_or(DEFAULT_API_URL);
        Url::parse(raw).map_err(|err| SettingsError::InvalidApiUrl {
            value: raw.to_owned(),
            message: err.to_string(),
        })
    }

    /// Configured session directory, falling back to `$HOME/.taskforge` or
    /// `./.taskforge` when no home directory is known.
    pub fn session_dir(&self) -> Result<Utf8PathBuf, SettingsError> {
        let path = self.session_dir.clone().unwrap_or_else(default_session_dir);
        Utf8PathBuf::from_path_buf(path).map_err(|path| SettingsError::NonUtf8SessionDir {
            path: path.to_string_lossy().into_owned(),
        })
    }

    /// Configured request timeout.
    pub fn request_timeout(&self) -> Result<Duration, SettingsError> {
        match self.request_timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS) {
            0 => Err(SettingsError::ZeroTimeout),
            secs => Ok(Duration::from_secs(secs)),
        }
    }
}

fn default_session_dir() -> PathBuf {
    env::var_os("HOME")
        .filter(|home| !home.is_empty())
        .map_or_else(|| PathBuf::from("."), PathBuf::from)
        .join(SESSION_DIR_NAME)
}

#[cfg(test)]
mod tests {
    //! Unit tests for client configuration parsing.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    fn load_from_empty_args() -> ClientSettings {
        ClientSettings::load_from_iter([OsString::from("taskforge")]).expect("config should load")
    }

    #[rstest]
    fn default_values_are_used_when_missing() {
        let _guard = lock_env([
            ("TASKFORGE_API_URL", None::<String>),
            ("TASKFORGE_SESSION_DIR", None::<String>),
            ("TASKFORGE_REQUEST_TIMEOUT_SECS", None::<String>),
            ("HOME", Some("/home/ada".to_owned())),
        ]);

        let settings = load_from_empty_args();
        assert_eq!(
            settings.api_url().expect("default url").as_str(),
            "http://localhost:5000/api"
        );
        assert_eq!(
            settings.session_dir().expect("default dir"),
            Utf8PathBuf::from("/home/ada/.taskforge")
        );
        assert_eq!(
            settings.request_timeout().expect("default timeout"),
            Duration::from_secs(30)
        );
    }

    #[rstest]
    fn missing_home_falls_back_to_working_directory() {
        let _guard = lock_env([
            ("TASKFORGE_SESSION_DIR", None::<String>),
            ("HOME", None::<String>),
        ]);

        let settings = load_from_empty_args();
        assert_eq!(
            settings.session_dir().expect("fallback dir"),
            Utf8PathBuf::from("./.taskforge")
        );
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            ("TASKFORGE_API_URL", Some("https://tasks.example.com/api".to_owned())),
            ("TASKFORGE_SESSION_DIR", Some("/tmp/taskforge-test".to_owned())),
            ("TASKFORGE_REQUEST_TIMEOUT_SECS", Some("5".to_owned())),
        ]);

        let settings = load_from_empty_args();
        assert_eq!(
            settings.api_url().expect("url").as_str(),
            "https://tasks.example.com/api"
        );
        assert_eq!(
            settings.session_dir().expect("dir"),
            Utf8PathBuf::from("/tmp/taskforge-test")
        );
        assert_eq!(
            settings.request_timeout().expect("timeout"),
            Duration::from_secs(5)
        );
    }

    #[rstest]
    #[case::relative_url(Some("localhost/api".to_owned()), None)]
    #[case::zero_timeout(None, Some(0))]
    fn invalid_values_are_reported(
        #[case] api_url: Option<String>,
        #[case] request_timeout_secs: Option<u64>,
    ) {
        let settings = ClientSettings {
            api_url,
            session_dir: None,
            request_timeout_secs,
        };
        assert!(settings.api_url().is_err() || settings.request_timeout().is_err());
    }
}
