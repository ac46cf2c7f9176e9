//! Wire DTOs for the Taskforge REST API.
//!
//! Responses decode into these first and are then mapped into domain types in
//! one pass, so wire quirks (the `_id` field, ISO timestamps for due dates)
//! stay in this module.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{LoginCredentials, Task, TaskId, TaskPriority, TaskStatus, TaskUpdate};

#[derive(Debug, Serialize)]
pub(super) struct LoginRequestDto<'a> {
    pub(super) email: &'a str,
    pub(super) password: &'a str,
}

impl<'a> From<&'a LoginCredentials> for LoginRequestDto<'a> {
    fn from(value: &'a LoginCredentials) -> Self {
        Self {
            email: value.email(),
            password: value.password(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct LoginResponseDto {
    pub(super) token: String,
}

#[derive(Debug, Serialize)]
pub(super) struct ResetPasswordRequestDto<'a> {
    pub(super) password: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct TaskDto {
    #[serde(rename = "_id")]
    pub(super) id: String,
    pub(super) title: String,
    #[serde(default)]
    pub(super) description: Option<String>,
    #[serde(default)]
    pub(super) status: Option<String>,
    #[serde(default)]
    pub(super) priority: Option<String>,
    #[serde(default)]
    pub(super) due_date: Option<String>,
}

impl TaskDto {
    pub(super) fn into_domain(self) -> Result<Task, String> {
        let id = TaskId::new(self.id).map_err(|err| err.to_string())?;
        let status = match self.status.as_deref().map(str::trim) {
            None | Some("") => TaskStatus::default(),
            Some(raw) => raw
                .parse::<TaskStatus>()
                .map_err(|err| format!("task {id}: {err}"))?,
        };
        let priority = match self.priority.as_deref().map(str::trim) {
            None | Some("") => TaskPriority::default(),
            Some(raw) => raw
                .parse::<TaskPriority>()
                .map_err(|err| format!("task {id}: {err}"))?,
        };
        let due_date = self
            .due_date
            .as_deref()
            .map(parse_due_date)
            .transpose()
            .map_err(|err| format!("task {id}: {err}"))?
            .flatten();
        let description = self.description.filter(|text| !text.is_empty());

        Ok(Task {
            id,
            title: self.title,
            description,
            status,
            priority,
            due_date,
        })
    }
}

/// Keep the calendar date of an ISO date or timestamp.
fn parse_due_date(raw: &str) -> Result<Option<NaiveDate>, String> {
    let date = raw.split('T').next().unwrap_or_default().trim();
    if date.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map(Some)
        .map_err(|err| format!("invalid due date '{raw}': {err}"))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct TaskUpdateDto<'a> {
    pub(super) title: &'a str,
    pub(super) description: &'a str,
    pub(super) due_date: String,
    pub(super) status: TaskStatus,
    pub(super) priority: TaskPriority,
}

impl<'a> From<&'a TaskUpdate> for TaskUpdateDto<'a> {
    fn from(value: &'a TaskUpdate) -> Self {
        Self {
            title: value.title.as_str(),
            description: value.description.as_str(),
            due_date: value
                .due_date
                .map(|date| date.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            status: value.status,
            priority: value.priority,
        }
    }
}
