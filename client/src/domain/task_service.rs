//! Task use cases for the signed-in user.
//!
//! Every operation first passes the session gate. A `401` from the API means
//! the stored token is stale, so the session is dropped and the user is sent
//! back to the login view.

use std::sync::Arc;

use serde_json::json;
use tracing::{info, warn};

use crate::domain::ports::{TaskApi, TaskApiError};
use crate::domain::{
    AccessDenied, BearerToken, Error, SessionManager, Task, TaskDraft, TaskId, TaskUpdate,
};

const SESSION_EXPIRED: &str = "Your session has expired. Please log in again.";

/// Task operations backed by a [`TaskApi`].
pub struct TaskService<T: ?Sized> {
    api: Arc<T>,
}

impl<T> TaskService<T>
where
    T: TaskApi + ?Sized,
{
    /// Build the service.
    pub fn new(api: Arc<T>) -> Self {
        Self { api }
    }

    /// Fetch every task visible to the current user.
    pub async fn list(&self, manager: &mut SessionManager) -> Result<Vec<Task>, Error> {
        let token = authorised_token(manager)?;
        let outcome = self.api.list(&token).await;
        settle(manager, outcome)
    }

    /// Fetch one task.
    pub async fn get(&self, manager: &mut SessionManager, id: &TaskId) -> Result<Task, Error> {
        let token = authorised_token(manager)?;
        let outcome = self.api.get(&token, id).await;
        settle(manager, outcome)
    }

    /// Create a task.
    pub async fn create(&self, manager: &mut SessionManager, draft: &TaskDraft) -> Result<(), Error> {
        let token = authorised_token(manager)?;
        let outcome = self.api.create(&token, draft).await;
        settle(manager, outcome)?;
        info!(title = draft.title(), "task created");
        Ok(())
    }

    /// Replace a task's editable fields.
    pub async fn update(
        &self,
        manager: &mut SessionManager,
        id: &TaskId,
        update: &TaskUpdate,
    ) -> Result<(), Error> {
        update
            .validate()
            .map_err(|err| Error::invalid_request(err.to_string()))?;
        let token = authorised_token(manager)?;
        let outcome = self.api.update(&token, id, update).await;
        settle(manager, outcome)?;
        info!(task_id = %id, "task updated");
        Ok(())
    }

    /// Delete a task.
    pub async fn delete(&self, manager: &mut SessionManager, id: &TaskId) -> Result<(), Error> {
        let token = authorised_token(manager)?;
        let outcome = self.api.delete(&token, id).await;
        settle(manager, outcome)?;
        info!(task_id = %id, "task deleted");
        Ok(())
    }
}

fn authorised_token(manager: &SessionManager) -> Result<BearerToken, Error> {
    manager
        .require_session()
        .map(|session| session.token().clone())
        .map_err(|denied| match denied {
            AccessDenied::NotReady => Error::service_unavailable("Session is still loading."),
            AccessDenied::SignedOut => Error::unauthorized("Please log in first."),
        })
}

fn settle<V>(manager: &mut SessionManager, outcome: Result<V, TaskApiError>) -> Result<V, Error> {
    outcome.map_err(|err| {
        if matches!(err, TaskApiError::Unauthorized { .. }) {
            warn!(error = %err, "dropping rejected session");
            if let Err(logout_err) = manager.logout() {
                warn!(error = %logout_err, "failed to clear rejected session");
            }
        }
        map_task_error(err)
    })
}

fn map_task_error(error: TaskApiError) -> Error {
    match error {
        TaskApiError::Unauthorized { .. } => Error::unauthorized(SESSION_EXPIRED),
        TaskApiError::NotFound { .. } => Error::not_found("Task not found."),
        TaskApiError::Rejected { status, message } => {
            let message = if message.trim().is_empty() {
                format!("Request failed with status {status}.")
            } else {
                message
            };
            match status {
                403 => Error::forbidden(message),
                400..=499 => Error::invalid_request(message),
                _ => Error::service_unavailable(message),
            }
        }
        TaskApiError::Transport { .. } | TaskApiError::Timeout { .. } => {
            Error::service_unavailable("Network error. Please try again.")
        }
        TaskApiError::Decode { message } => {
            Error::internal("Unexpected response from server.")
                .with_details(json!({ "cause": message }))
        }
    }
}
