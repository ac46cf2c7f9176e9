//! Driven port for the remote task endpoints.
//!
//! Every call carries the bearer token of the current session. Adapters map
//! `401` to [`TaskApiError::Unauthorized`] so callers can drop a stale session.

use async_trait::async_trait;

use crate::domain::{BearerToken, Task, TaskDraft, TaskId, TaskUpdate};

use super::define_port_error;

define_port_error! {
    /// Errors raised by task API adapters.
    pub enum TaskApiError {
        /// The server no longer accepts the bearer token.
        Unauthorized { message: String } => "task API rejected the session: {message}",
        /// The task does not exist (or is not visible to this user).
        NotFound { message: String } => "task not found: {message}",
        /// Any other non-success status.
        Rejected { status: u16, message: String } =>
            "task request rejected with status {status}: {message}",
        /// The request never completed.
        Transport { message: String } => "task API unreachable: {message}",
        /// The request exceeded its deadline.
        Timeout { message: String } => "task API timed out: {message}",
        /// The response body did not have the expected shape.
        Decode { message: String } => "unexpected task API response: {message}",
    }
}

/// Remote task endpoints.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TaskApi: Send + Sync {
    /// `GET /tasks`.
    async fn list(&self, token: &BearerToken) -> Result<Vec<Task>, TaskApiError>;

    /// `GET /tasks/:id`.
    async fn get(&self, token: &BearerToken, id: &TaskId) -> Result<Task, TaskApiError>;

    /// `POST /tasks` as a multipart form.
    async fn create(&self, token: &BearerToken, draft: &TaskDraft) -> Result<(), TaskApiError>;

    /// `PUT /tasks/:id` with the full edit form.
    async fn update(
        &self,
        token: &BearerToken,
        id: &TaskId,
        update: &TaskUpdate,
    ) -> Result<(), TaskApiError>;

    /// `DELETE /tasks/:id`.
    async fn delete(&self, token: &BearerToken, id: &TaskId) -> Result<(), TaskApiError>;
}
