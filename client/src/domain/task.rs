//! Task data model shared by the task views and the task API port.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Validation errors raised while building task values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskValidationError {
    /// Task id was blank or would not fit in a URL path segment.
    InvalidId,
    /// Title was blank once trimmed.
    EmptyTitle,
    /// Status text is not one of the known states.
    UnknownStatus {
        /// Rejected input.
        value: String,
    },
    /// Priority text is not one of the known levels.
    UnknownPriority {
        /// Rejected input.
        value: String,
    },
    /// Attachment had no usable file name.
    EmptyAttachmentName,
}

impl fmt::Display for TaskValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidId => write!(f, "task id must be a non-empty path segment"),
            Self::EmptyTitle => write!(f, "task title must not be empty"),
            Self::UnknownStatus { value } => write!(
                f,
                "unknown task status '{value}' (expected pending, in progress, or completed)"
            ),
            Self::UnknownPriority { value } => write!(
                f,
                "unknown task priority '{value}' (expected low, medium, or high)"
            ),
            Self::EmptyAttachmentName => write!(f, "attachment must have a file name"),
        }
    }
}

impl std::error::Error for TaskValidationError {}

/// Server-assigned task identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TaskId(String);

impl TaskId {
    /// Validate an identifier taken from user input or a response body.
    pub fn new(id: impl Into<String>) -> Result<Self, TaskValidationError> {
        let id = id.into();
        if id.is_empty() || id.trim() != id || id.contains('/') {
            return Err(TaskValidationError::InvalidId);
        }
        Ok(Self(id))
    }

    /// Identifier as sent in request paths.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for TaskId {
    type Error = TaskValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<TaskId> for String {
    fn from(value: TaskId) -> Self {
        value.0
    }
}

/// Progress state of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TaskStatus {
    /// Not started.
    #[default]
    #[serde(rename = "pending")]
    Pending,
    /// Being worked on.
    #[serde(rename = "in progress")]
    InProgress,
    /// Done.
    #[serde(rename = "completed")]
    Completed,
}

impl TaskStatus {
    /// Wire and display form.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in progress",
            Self::Completed => "completed",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = TaskValidationError;

    /// Accepts the wire form plus the hyphen/underscore spellings that are
    /// easier to type in a shell.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "in progress" | "in-progress" | "in_progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            _ => Err(TaskValidationError::UnknownStatus {
                value: s.to_owned(),
            }),
        }
    }
}

/// Urgency of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    /// Can wait.
    Low,
    /// Default urgency.
    #[default]
    Medium,
    /// Urgent.
    High,
}

impl TaskPriority {
    /// Wire and display form.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskPriority {
    type Err = TaskValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            _ => Err(TaskValidationError::UnknownPriority {
                value: s.to_owned(),
            }),
        }
    }
}

/// A task as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    /// Server identifier.
    pub id: TaskId,
    /// Short title.
    pub title: String,
    /// Optional notes.
    pub description: Option<String>,
    /// Progress state.
    pub status: TaskStatus,
    /// Urgency.
    pub priority: TaskPriority,
    /// Calendar due date, if set.
    pub due_date: Option<NaiveDate>,
}

impl Task {
    /// Start an edit form pre-filled with this task's current values.
    pub fn to_update(&self) -> TaskUpdate {
        TaskUpdate {
            title: self.title.clone(),
            description: self.description.clone().unwrap_or_default(),
            due_date: self.due_date,
            status: self.status,
            priority: self.priority,
        }
    }
}

/// File uploaded alongside a new task.
#[derive(Clone, PartialEq, Eq)]
pub struct Attachment {
    file_name: String,
    bytes: Vec<u8>,
}

impl Attachment {
    /// Wrap file contents under the name the server should see.
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Result<Self, TaskValidationError> {
        let file_name = file_name.into();
        if file_name.trim().is_empty() {
            return Err(TaskValidationError::EmptyAttachmentName);
        }
        Ok(Self { file_name, bytes })
    }

    /// File name sent in the multipart part.
    pub fn file_name(&self) -> &str {
        self.file_name.as_str()
    }

    /// File contents.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl fmt::Debug for Attachment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Attachment")
            .field("file_name", &self.file_name)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Input for creating a task.
///
/// ## Invariants
/// - `title` is non-empty once trimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDraft {
    title: String,
    description: String,
    status: TaskStatus,
    attachment: Option<Attachment>,
}

impl TaskDraft {
    /// Validate a new task.
    ///
    /// # Examples
    /// ```
    /// use client::domain::{TaskDraft, TaskStatus};
    ///
    /// let draft = TaskDraft::new("Write report", "", TaskStatus::Pending).unwrap();
    /// assert_eq!(draft.title(), "Write report");
    /// assert!(TaskDraft::new("  ", "", TaskStatus::Pending).is_err());
    /// ```
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        status: TaskStatus,
    ) -> Result<Self, TaskValidationError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(TaskValidationError::EmptyTitle);
        }
        Ok(Self {
            title,
            description: description.into(),
            status,
            attachment: None,
        })
    }

    /// Attach a file to upload with the task.
    pub fn with_attachment(mut self, attachment: Attachment) -> Self {
        self.attachment = Some(attachment);
        self
    }

    /// Task title.
    pub fn title(&self) -> &str {
        self.title.as_str()
    }

    /// Task notes, possibly empty.
    pub fn description(&self) -> &str {
        self.description.as_str()
    }

    /// Initial status.
    pub fn status(&self) -> TaskStatus {
        self.status
    }

    /// Optional attachment.
    pub fn attachment(&self) -> Option<&Attachment> {
        self.attachment.as_ref()
    }
}

/// Full edit form submitted to `PUT /tasks/:id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskUpdate {
    /// New title.
    pub title: String,
    /// New notes.
    pub description: String,
    /// New due date; `None` clears it.
    pub due_date: Option<NaiveDate>,
    /// New status.
    pub status: TaskStatus,
    /// New priority.
    pub priority: TaskPriority,
}

impl TaskUpdate {
    /// Check the form before it is sent.
    pub fn validate(&self) -> Result<(), TaskValidationError> {
        if self.title.trim().is_empty() {
            return Err(TaskValidationError::EmptyTitle);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("pending", TaskStatus::Pending)]
    #[case("in progress", TaskStatus::InProgress)]
    #[case("In-Progress", TaskStatus::InProgress)]
    #[case(" completed ", TaskStatus::Completed)]
    fn parses_status_spellings(#[case] input: &str, #[case] expected: TaskStatus) {
        assert_eq!(input.parse::<TaskStatus>(), Ok(expected));
    }

    #[rstest]
    fn rejects_unknown_status() {
        let err = "done".parse::<TaskStatus>().expect_err("unknown status");
        assert_eq!(
            err,
            TaskValidationError::UnknownStatus {
                value: "done".to_owned()
            }
        );
    }

    #[rstest]
    #[case("LOW", TaskPriority::Low)]
    #[case("medium", TaskPriority::Medium)]
    #[case("high", TaskPriority::High)]
    fn parses_priorities(#[case] input: &str, #[case] expected: TaskPriority) {
        assert_eq!(input.parse::<TaskPriority>(), Ok(expected));
    }

    #[rstest]
    fn status_uses_wire_spelling_in_json() {
        let encoded = serde_json::to_string(&TaskStatus::InProgress).expect("encode");
        assert_eq!(encoded, "\"in progress\"");
    }

    #[rstest]
    #[case("")]
    #[case(" 42")]
    #[case("a/b")]
    fn rejects_unusable_ids(#[case] raw: &str) {
        assert_eq!(TaskId::new(raw), Err(TaskValidationError::InvalidId));
    }

    #[rstest]
    fn edit_form_starts_from_current_values() {
        let task = Task {
            id: TaskId::new("64f0c2").expect("id"),
            title: "Ship".to_owned(),
            description: None,
            status: TaskStatus::Completed,
            priority: TaskPriority::High,
            due_date: NaiveDate::from_ymd_opt(2026, 3, 1),
        };
        let update = task.to_update();
        assert_eq!(update.title, "Ship");
        assert_eq!(update.description, "");
        assert_eq!(update.status, TaskStatus::Completed);
        assert_eq!(update.priority, TaskPriority::High);
        assert_eq!(update.due_date, NaiveDate::from_ymd_opt(2026, 3, 1));
        assert!(update.validate().is_ok());
    }

    #[rstest]
    fn attachment_requires_a_name() {
        assert_eq!(
            Attachment::new(" ", vec![1, 2, 3]),
            Err(TaskValidationError::EmptyAttachmentName)
        );
    }
}
