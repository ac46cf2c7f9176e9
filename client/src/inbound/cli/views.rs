//! Plain-text renderings of the client's views.

use std::io::{self, Write};

use crate::domain::{SessionState, Task};

/// Shown whenever the user is sent to the login view.
pub const LOGIN_HINT: &str = "You are signed out. Run `taskforge login --email <email>` to sign in.";

/// Render the task list view.
pub fn render_task_list(out: &mut impl Write, tasks: &[Task]) -> io::Result<()> {
    writeln!(out, "My Tasks")?;
    if tasks.is_empty() {
        writeln!(out, "You have no tasks yet.")?;
        return Ok(());
    }
    for task in tasks {
        writeln!(out, "{}  [{}]  {}", task.id, task.status, task.title)?;
        writeln!(
            out,
            "    {}",
            task.description.as_deref().unwrap_or("No description provided.")
        )?;
    }
    Ok(())
}

/// Render a single task in full.
pub fn render_task(out: &mut impl Write, task: &Task) -> io::Result<()> {
    writeln!(out, "id:          {}", task.id)?;
    writeln!(out, "title:       {}", task.title)?;
    writeln!(
        out,
        "description: {}",
        task.description.as_deref().unwrap_or("")
    )?;
    writeln!(out, "status:      {}", task.status)?;
    writeln!(out, "priority:    {}", task.priority)?;
    match task.due_date {
        Some(date) => writeln!(out, "due:         {}", date.format("%Y-%m-%d")),
        None => writeln!(out, "due:         -"),
    }
}

/// Render the session summary used by `whoami`.
pub fn render_session(out: &mut impl Write, state: &SessionState) -> io::Result<()> {
    match state {
        SessionState::Loading => writeln!(out, "Session is still loading."),
        SessionState::Unauthenticated => writeln!(out, "Not signed in."),
        SessionState::Authenticated(session) => match session.role() {
            Some(role) if role.is_admin() => writeln!(out, "Signed in as an administrator."),
            Some(role) => writeln!(out, "Signed in (role: {role})."),
            None => writeln!(out, "Signed in."),
        },
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use super::*;
    use crate::domain::{Session, TaskId, TaskPriority, TaskStatus};
    use chrono::NaiveDate;
    use rstest::rstest;

    fn render<F>(render: F) -> String
    where
        F: FnOnce(&mut Vec<u8>) -> io::Result<()>,
    {
        let mut out = Vec::new();
        render(&mut out).expect("render succeeds");
        String::from_utf8(out).expect("utf-8 output")
    }

    fn task(description: Option<&str>) -> Task {
        Task {
            id: TaskId::new("64f1c2").expect("valid id"),
            title: "Write report".to_owned(),
            description: description.map(str::to_owned),
            status: TaskStatus::InProgress,
            priority: TaskPriority::High,
            due_date: NaiveDate::from_ymd_opt(2024, 3, 1),
        }
    }

    #[test]
    fn empty_lists_say_so() {
        let text = render(|out| render_task_list(out, &[]));
        assert_eq!(text, "My Tasks\nYou have no tasks yet.\n");
    }

    #[test]
    fn list_rows_show_status_and_placeholder_description() {
        let text = render(|out| render_task_list(out, &[task(None)]));
        assert!(text.contains("64f1c2  [in progress]  Write report"));
        assert!(text.contains("No description provided."));
    }

    #[test]
    fn details_include_priority_and_due_date() {
        let text = render(|out| render_task(out, &task(Some("Quarterly"))));
        assert!(text.contains("priority:    high"));
        assert!(text.contains("due:         2024-03-01"));
    }

    #[rstest]
    #[case::loading(SessionState::Loading, "Session is still loading.\n")]
    #[case::signed_out(SessionState::Unauthenticated, "Not signed in.\n")]
    #[case::admin(
        SessionState::Authenticated(
            Session::from_token("eyJhbGciOiJIUzI1NiJ9.eyJyb2xlIjoiYWRtaW4ifQ.c2ln").expect("valid"),
        ),
        "Signed in as an administrator.\n"
    )]
    #[case::no_role(
        SessionState::Authenticated(Session::from_token("a.e30.c").expect("valid")),
        "Signed in.\n"
    )]
    fn session_summaries(#[case] state: SessionState, #[case] expected: &str) {
        assert_eq!(render(|out| render_session(out, &state)), expected);
    }
}
