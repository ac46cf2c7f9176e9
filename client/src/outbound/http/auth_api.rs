//! Reqwest-backed authentication adapter.

use async_trait::async_trait;
use tracing::debug;

use super::api_client::{ApiClient, execute, server_message};
use super::dto::{LoginRequestDto, LoginResponseDto, ResetPasswordRequestDto};
use crate::domain::ports::{AuthApi, AuthApiError};
use crate::domain::{LoginCredentials, PasswordReset};

/// Calls `/auth/*` on the Taskforge API.
#[derive(Debug, Clone)]
pub struct HttpAuthApi {
    api: ApiClient,
}

impl HttpAuthApi {
    /// Wrap a configured API client.
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

#[async_trait]
impl AuthApi for HttpAuthApi {
    async fn login(&self, credentials: &LoginCredentials) -> Result<String, AuthApiError> {
        let url = self.api.endpoint(&["auth", "login"]);
        debug!(%url, "requesting session token");
        let response = execute(
            self.api
                .http()
                .post(url)
                .json(&LoginRequestDto::from(credentials)),
        )
        .await
        .map_err(map_transport_error)?;

        if !response.status.is_success() {
            return Err(rejected(response.status.as_u16(), &response.body));
        }
        serde_json::from_slice::<LoginResponseDto>(&response.body)
            .map(|dto| dto.token)
            .map_err(|err| AuthApiError::decode(format!("invalid login payload: {err}")))
    }

    async fn reset_password(&self, reset: &PasswordReset) -> Result<(), AuthApiError> {
        let url = self
            .api
            .endpoint(&["auth", "reset-password", reset.reset_token()]);
        let response = execute(self.api.http().post(url).json(&ResetPasswordRequestDto {
            password: reset.password(),
        }))
        .await
        .map_err(map_transport_error)?;

        if response.status.is_success() {
            Ok(())
        } else {
            Err(rejected(response.status.as_u16(), &response.body))
        }
    }
}

fn rejected(status: u16, body: &[u8]) -> AuthApiError {
    AuthApiError::rejected(status, server_message(body).unwrap_or_default())
}

fn map_transport_error(error: reqwest::Error) -> AuthApiError {
    if error.is_timeout() {
        AuthApiError::timeout(error.to_string())
    } else {
        AuthApiError::transport(error.to_string())
    }
}
