//! Reqwest-backed task adapter.
//!
//! Requests carry `Authorization: Bearer <token>`. Status codes map onto the
//! port's error categories; bodies that should be JSON but are not become
//! decode errors.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{RequestBuilder, StatusCode};
use tracing::debug;

use super::api_client::{ApiClient, RawResponse, describe_failure, execute};
use super::dto::{TaskDto, TaskUpdateDto};
use crate::domain::ports::{TaskApi, TaskApiError};
use crate::domain::{BearerToken, Task, TaskDraft, TaskId, TaskUpdate};

/// Calls `/tasks` on the Taskforge API.
#[derive(Debug, Clone)]
pub struct HttpTaskApi {
    api: ApiClient,
}

impl HttpTaskApi {
    /// Wrap a configured API client.
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    async fn send(
        &self,
        token: &BearerToken,
        request: RequestBuilder,
    ) -> Result<RawResponse, TaskApiError> {
        let response = execute(request.bearer_auth(token.as_str()))
            .await
            .map_err(map_transport_error)?;
        if response.status.is_success() {
            Ok(response)
        } else {
            Err(map_status_error(response.status, &response.body))
        }
    }
}

#[async_trait]
impl TaskApi for HttpTaskApi {
    async fn list(&self, token: &BearerToken) -> Result<Vec<Task>, TaskApiError> {
        let url = self.api.endpoint(&["tasks"]);
        debug!(%url, "listing tasks");
        let response = self.send(token, self.api.http().get(url)).await?;
        let dtos: Vec<TaskDto> = decode_json(&response.body)?;
        dtos.into_iter()
            .map(|dto| dto.into_domain().map_err(TaskApiError::decode))
            .collect()
    }

    async fn get(&self, token: &BearerToken, id: &TaskId) -> Result<Task, TaskApiError> {
        let url = self.api.endpoint(&["tasks", id.as_str()]);
        let response = self.send(token, self.api.http().get(url)).await?;
        decode_json::<TaskDto>(&response.body)?
            .into_domain()
            .map_err(TaskApiError::decode)
    }

    async fn create(&self, token: &BearerToken, draft: &TaskDraft) -> Result<(), TaskApiError> {
        let url = self.api.endpoint(&["tasks"]);
        let mut form = Form::new()
            .text("title", draft.title().to_owned())
            .text("description", draft.description().to_owned())
            .text("status", draft.status().as_str());
        if let Some(attachment) = draft.attachment() {
            let part = Part::bytes(attachment.bytes().to_vec())
                .file_name(attachment.file_name().to_owned());
            form = form.part("attachment", part);
        }
        self.send(token, self.api.http().post(url).multipart(form))
            .await?;
        Ok(())
    }

    async fn update(
        &self,
        token: &BearerToken,
        id: &TaskId,
        update: &TaskUpdate,
    ) -> Result<(), TaskApiError> {
        let url = self.api.endpoint(&["tasks", id.as_str()]);
        self.send(
            token,
            self.api.http().put(url).json(&TaskUpdateDto::from(update)),
        )
        .await?;
        Ok(())
    }

    async fn delete(&self, token: &BearerToken, id: &TaskId) -> Result<(), TaskApiError> {
        let url = self.api.endpoint(&["tasks", id.as_str()]);
        let response = self.send(token, self.api.http().delete(url)).await?;
        decode_json::<serde_json::Value>(&response.body)?;
        Ok(())
    }
}

fn decode_json<T: serde::de::DeserializeOwned>(body: &[u8]) -> Result<T, TaskApiError> {
    serde_json::from_slice(body)
        .map_err(|err| TaskApiError::decode(format!("invalid JSON payload: {err}")))
}

fn map_transport_error(error: reqwest::Error) -> TaskApiError {
    if error.is_timeout() {
        TaskApiError::timeout(error.to_string())
    } else {
        TaskApiError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> TaskApiError {
    let message = describe_failure(status, body);
    match status {
        StatusCode::UNAUTHORIZED => TaskApiError::unauthorized(message),
        StatusCode::NOT_FOUND => TaskApiError::not_found(message),
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
            TaskApiError::timeout(message)
        }
        _ => TaskApiError::rejected(status.as_u16(), message),
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for non-network mapping helpers.

    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::unauthorised(StatusCode::UNAUTHORIZED, "Unauthorized")]
    #[case::missing(StatusCode::NOT_FOUND, "NotFound")]
    #[case::gateway_timeout(StatusCode::GATEWAY_TIMEOUT, "Timeout")]
    #[case::forbidden(StatusCode::FORBIDDEN, "Rejected")]
    #[case::server_error(StatusCode::INTERNAL_SERVER_ERROR, "Rejected")]
    fn maps_http_statuses_to_port_errors(#[case] status: StatusCode, #[case] expected: &str) {
        let error = map_status_error(status, br#"{"message":"nope"}"#);
        let matched = match expected {
            "Unauthorized" => matches!(error, TaskApiError::Unauthorized { .. }),
            "NotFound" => matches!(error, TaskApiError::NotFound { .. }),
            "Timeout" => matches!(error, TaskApiError::Timeout { .. }),
            "Rejected" => matches!(error, TaskApiError::Rejected { .. }),
            _ => panic!("unsupported test expectation: {expected}"),
        };
        assert!(matched, "{status} mapped to {error:?}");
    }

    #[test]
    fn rejected_errors_keep_the_server_message() {
        let error = map_status_error(StatusCode::FORBIDDEN, br#"{"message":"Not your task"}"#);
        assert_eq!(error, TaskApiError::rejected(403_u16, "Not your task"));
    }

    #[test]
    fn non_json_bodies_are_decode_errors() {
        let error = decode_json::<serde_json::Value>(b"Deleted").expect_err("not JSON");
        assert!(matches!(error, TaskApiError::Decode { .. }));
    }
}
