//! Command-line arguments for the `taskforge` binary.

use camino::Utf8PathBuf;
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

use crate::domain::{TaskId, TaskPriority, TaskStatus};

/// `taskforge` command arguments.
#[derive(Debug, Parser)]
#[command(
    name = "taskforge",
    about = "Sign in to Taskforge and manage your tasks",
    version
)]
pub struct Cli {
    /// Emit logs as JSON lines on stderr.
    #[arg(long, global = true)]
    pub log_json: bool,
    /// Command to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Top-level commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Sign in and remember the session.
    Login(LoginArgs),
    /// Forget the remembered session.
    Logout,
    /// Show the remembered session without contacting the server.
    Whoami,
    /// Set a new password using the token from a reset email.
    ResetPassword(ResetPasswordArgs),
    /// Work with tasks.
    #[command(subcommand)]
    Tasks(TaskCommand),
}

/// `taskforge login` arguments.
#[derive(Debug, Args)]
pub struct LoginArgs {
    /// Account email address.
    #[arg(long, value_name = "email")]
    pub email: String,
    /// Account password. Read from standard input when omitted.
    #[arg(long, value_name = "password")]
    pub password: Option<String>,
}

/// `taskforge reset-password` arguments.
#[derive(Debug, Args)]
pub struct ResetPasswordArgs {
    /// Token from the reset link.
    #[arg(value_name = "token")]
    pub token: String,
    /// New password. Read from standard input when omitted.
    #[arg(long, value_name = "password")]
    pub password: Option<String>,
}

/// `taskforge tasks` subcommands.
#[derive(Debug, Subcommand)]
pub enum TaskCommand {
    /// List your tasks.
    List,
    /// Show one task.
    Show {
        /// Task identifier.
        #[arg(value_name = "id", value_parser = parse_task_id)]
        id: TaskId,
    },
    /// Create a task.
    New(NewTaskArgs),
    /// Edit a task. Omitted fields keep their current values.
    Edit(EditTaskArgs),
    /// Delete a task.
    Delete {
        /// Task identifier.
        #[arg(value_name = "id", value_parser = parse_task_id)]
        id: TaskId,
        /// Skip the confirmation prompt.
        #[arg(long, short = 'y')]
        yes: bool,
    },
}

/// `taskforge tasks new` arguments.
#[derive(Debug, Args)]
pub struct NewTaskArgs {
    /// Task title.
    #[arg(long, value_name = "title")]
    pub title: String,
    /// Optional notes.
    #[arg(long, value_name = "text", default_value = "")]
    pub description: String,
    /// Initial status: pending, in-progress, or completed.
    #[arg(long, value_name = "status", default_value = "pending")]
    pub status: TaskStatus,
    /// File to upload with the task.
    #[arg(long, value_name = "path")]
    pub attachment: Option<Utf8PathBuf>,
}

/// `taskforge tasks edit` arguments.
#[derive(Debug, Args)]
pub struct EditTaskArgs {
    /// Task identifier.
    #[arg(value_name = "id", value_parser = parse_task_id)]
    pub id: TaskId,
    /// New title.
    #[arg(long, value_name = "title")]
    pub title: Option<String>,
    /// New notes.
    #[arg(long, value_name = "text")]
    pub description: Option<String>,
    /// New status.
    #[arg(long, value_name = "status")]
    pub status: Option<TaskStatus>,
    /// New priority: low, medium, or high.
    #[arg(long, value_name = "priority")]
    pub priority: Option<TaskPriority>,
    /// New due date as `YYYY-MM-DD`; an empty value clears it.
    #[arg(long, value_name = "date", value_parser = parse_due_date)]
    pub due_date: Option<DueDate>,
}

/// A due date argument; `None` clears the date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DueDate(pub Option<NaiveDate>);

fn parse_task_id(raw: &str) -> Result<TaskId, String> {
    TaskId::new(raw).map_err(|err| err.to_string())
}

fn parse_due_date(raw: &str) -> Result<DueDate, String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(DueDate(None));
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .map(|date| DueDate(Some(date)))
        .map_err(|err| format!("due date must be YYYY-MM-DD: {err}"))
}

#[cfg(test)]
mod tests {
    //! Unit tests for argument parsing.

    use super::*;
    use rstest::rstest;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("taskforge").chain(args.iter().copied()))
            .expect("arguments should parse")
    }

    #[rstest]
    fn new_task_defaults_to_pending() {
        let cli = parse(&["tasks", "new", "--title", "Write report"]);
        let Command::Tasks(TaskCommand::New(args)) = cli.command else {
            panic!("expected tasks new");
        };
        assert_eq!(args.status, TaskStatus::Pending);
        assert_eq!(args.description, "");
        assert!(args.attachment.is_none());
    }

    #[rstest]
    #[case("in-progress", TaskStatus::InProgress)]
    #[case("in progress", TaskStatus::InProgress)]
    #[case("completed", TaskStatus::Completed)]
    fn statuses_accept_shell_friendly_spellings(#[case] raw: &str, #[case] expected: TaskStatus) {
        let cli = parse(&["tasks", "edit", "64f1c2", "--status", raw]);
        let Command::Tasks(TaskCommand::Edit(args)) = cli.command else {
            panic!("expected tasks edit");
        };
        assert_eq!(args.status, Some(expected));
    }

    #[rstest]
    #[case("2024-03-01", DueDate(NaiveDate::from_ymd_opt(2024, 3, 1)))]
    #[case("", DueDate(None))]
    fn due_dates_parse_or_clear(#[case] raw: &str, #[case] expected: DueDate) {
        assert_eq!(parse_due_date(raw), Ok(expected));
    }

    #[rstest]
    #[case::bad_date(&["tasks", "edit", "64f1c2", "--due-date", "tomorrow"])]
    #[case::bad_id(&["tasks", "show", "a/b"])]
    #[case::bad_priority(&["tasks", "edit", "64f1c2", "--priority", "urgent"])]
    fn invalid_arguments_are_rejected(#[case] args: &[&str]) {
        let argv = std::iter::once("taskforge").chain(args.iter().copied());
        assert!(Cli::try_parse_from(argv).is_err());
    }

    #[rstest]
    fn log_json_is_global() {
        let cli = parse(&["whoami", "--log-json"]);
        assert!(cli.log_json);
        assert!(matches!(cli.command, Command::Whoami));
    }
}
