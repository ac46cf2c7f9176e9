//! Reqwest adapters for the Taskforge REST API.

mod api_client;
mod auth_api;
mod dto;
mod task_api;

pub use api_client::{ApiClient, ApiClientError};
pub use auth_api::HttpAuthApi;
pub use task_api::HttpTaskApi;
