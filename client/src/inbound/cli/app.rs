//! Command runner: the terminal counterpart of the web client's views.
//!
//! Each invocation restores the persisted session, runs one command, then
//! shows whichever view the session manager navigated to.

use std::io::{BufRead, Write};
use std::sync::Arc;

use camino::Utf8Path;
use cap_std::ambient_authority;
use cap_std::fs::Dir;
use tracing::debug;
use zeroize::Zeroizing;

use super::args::{Command, EditTaskArgs, LoginArgs, NewTaskArgs, ResetPasswordArgs, TaskCommand};
use super::console::Console;
use super::error::CliError;
use super::navigator::RouteRecorder;
use super::views::{LOGIN_HINT, render_session, render_task, render_task_list};
use crate::domain::ports::{AuthApi, KeyValueStore, Navigator, Route, TaskApi};
use crate::domain::{
    Attachment, AuthenticationService, Error, LoginCredentials, PasswordReset, SessionManager,
    SessionStore, TaskDraft, TaskId, TaskService,
};

/// Wires the session manager and use cases to the terminal.
pub struct TaskforgeCli {
    manager: SessionManager,
    auth: AuthenticationService<dyn AuthApi>,
    tasks: TaskService<dyn TaskApi>,
    router: Arc<RouteRecorder>,
}

impl TaskforgeCli {
    /// Build the runner over the given adapters.
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        auth_api: Arc<dyn AuthApi>,
        task_api: Arc<dyn TaskApi>,
    ) -> Self {
        let router = Arc::new(RouteRecorder::new());
        let navigator: Arc<dyn Navigator> = router.clone();
        Self {
            manager: SessionManager::new(SessionStore::new(store), Arc::clone(&navigator)),
            auth: AuthenticationService::new(auth_api, navigator),
            tasks: TaskService::new(task_api),
            router,
        }
    }

    /// The session manager, for inspection after a run.
    pub fn session(&self) -> &SessionManager {
        &self.manager
    }

    /// Restore the session, run `command`, then show the view it led to.
    ///
    /// # Errors
    ///
    /// Returns the command's failure, or a terminal I/O failure.
    pub async fn run<R, W, E>(
        &mut self,
        command: Command,
        console: &mut Console<R, W, E>,
    ) -> Result<(), CliError>
    where
        R: BufRead,
        W: Write,
        E: Write,
    {
        self.manager.initialize();
        let mut outcome = self.dispatch(command, console).await;
        // Showing the task list can itself end the session, so keep following.
        while let Some(route) = self.router.take() {
            match route {
                Route::Tasks if outcome.is_ok() => outcome = self.show_tasks(console).await,
                Route::Tasks => {}
                Route::Login => console.note(LOGIN_HINT)?,
            }
        }
        outcome
    }

    async fn dispatch<R, W, E>(
        &mut self,
        command: Command,
        console: &mut Console<R, W, E>,
    ) -> Result<(), CliError>
    where
        R: BufRead,
        W: Write,
        E: Write,
    {
        match command {
            Command::Login(args) => self.login(args, console).await,
            Command::Logout => {
                self.manager
                    .logout()
                    .map_err(|err| Error::internal(err.to_string()))?;
                writeln!(console.output(), "Signed out.")?;
                Ok(())
            }
            Command::Whoami => {
                render_session(console.output(), self.manager.state())?;
                Ok(())
            }
            Command::ResetPassword(args) => self.reset_password(args, console).await,
            Command::Tasks(task_command) => self.task_command(task_command, console).await,
        }
    }

    async fn login<R, W, E>(
        &mut self,
        args: LoginArgs,
        console: &mut Console<R, W, E>,
    ) -> Result<(), CliError>
    where
        R: BufRead,
        W: Write,
        E: Write,
    {
        let password = Zeroizing::new(match args.password {
            Some(password) => password,
            None => console.ask("Password: ")?,
        });
        let credentials = LoginCredentials::try_from_parts(&args.email, &password)
            .map_err(|err| CliError::input(err.to_string()))?;
        let session = self.auth.sign_in(&mut self.manager, &credentials).await?;
        match session.role() {
            Some(role) => writeln!(console.output(), "Signed in (role: {role}).")?,
            None => writeln!(console.output(), "Signed in.")?,
        }
        Ok(())
    }

    async fn reset_password<R, W, E>(
        &mut self,
        args: ResetPasswordArgs,
        console: &mut Console<R, W, E>,
    ) -> Result<(), CliError>
    where
        R: BufRead,
        W: Write,
        E: Write,
    {
        let password = Zeroizing::new(match args.password {
            Some(password) => password,
            None => console.ask("New password: ")?,
        });
        let reset = PasswordReset::try_from_parts(&args.token, &password)
            .map_err(|err| CliError::input(err.to_string()))?;
        self.auth.reset_password(&reset).await?;
        writeln!(console.output(), "Password reset successfully!")?;
        Ok(())
    }

    async fn task_command<R, W, E>(
        &mut self,
        command: TaskCommand,
        console: &mut Console<R, W, E>,
    ) -> Result<(), CliError>
    where
        R: BufRead,
        W: Write,
        E: Write,
    {
        match command {
            TaskCommand::List => self.show_tasks(console).await,
            TaskCommand::Show { id } => {
                let task = self.tasks.get(&mut self.manager, &id).await?;
                render_task(console.output(), &task)?;
                Ok(())
            }
            TaskCommand::New(args) => self.create_task(args).await,
            TaskCommand::Edit(args) => self.edit_task(args).await,
            TaskCommand::Delete { id, yes } => self.delete_task(&id, yes, console).await,
        }
    }

    async fn show_tasks<R, W, E>(&mut self, console: &mut Console<R, W, E>) -> Result<(), CliError>
    where
        R: BufRead,
        W: Write,
        E: Write,
    {
        let tasks = self.tasks.list(&mut self.manager).await?;
        render_task_list(console.output(), &tasks)?;
        Ok(())
    }

    async fn create_task(&mut self, args: NewTaskArgs) -> Result<(), CliError> {
        let mut draft = TaskDraft::new(args.title, args.description, args.status)
            .map_err(|err| CliError::input(err.to_string()))?;
        if let Some(path) = args.attachment.as_deref() {
            draft = draft.with_attachment(read_attachment(path)?);
        }
        self.tasks.create(&mut self.manager, &draft).await?;
        self.router.navigate(Route::Tasks);
        Ok(())
    }

    async fn edit_task(&mut self, args: EditTaskArgs) -> Result<(), CliError> {
        let current = self.tasks.get(&mut self.manager, &args.id).await?;
        let mut update = current.to_update();
        if let Some(title) = args.title {
            update.title = title;
        }
        if let Some(description) = args.description {
            update.description = description;
        }
        if let Some(status) = args.status {
            update.status = status;
        }
        if let Some(priority) = args.priority {
            update.priority = priority;
        }
        if let Some(due_date) = args.due_date {
            update.due_date = due_date.0;
        }
        self.tasks.update(&mut self.manager, &args.id, &update).await?;
        self.router.navigate(Route::Tasks);
        Ok(())
    }

    async fn delete_task<R, W, E>(
        &mut self,
        id: &TaskId,
        confirmed: bool,
        console: &mut Console<R, W, E>,
    ) -> Result<(), CliError>
    where
        R: BufRead,
        W: Write,
        E: Write,
    {
        if !confirmed && !console.confirm("Are you sure you want to delete this task?")? {
            debug!(task_id = %id, "delete cancelled");
            writeln!(console.output(), "Cancelled.")?;
            return Ok(());
        }
        self.tasks.delete(&mut self.manager, id).await?;
        writeln!(console.output(), "Task deleted")?;
        Ok(())
    }
}

fn read_attachment(path: &Utf8Path) -> Result<Attachment, CliError> {
    let file_name = path
        .file_name()
        .ok_or_else(|| CliError::input(format!("attachment '{path}' is not a file")))?;
    let parent = path
        .parent()
        .filter(|parent| !parent.as_str().is_empty())
        .unwrap_or_else(|| Utf8Path::new("."));
    let dir = Dir::open_ambient_dir(parent, ambient_authority())
        .map_err(|err| CliError::input(format!("open attachment directory '{parent}': {err}")))?;
    let bytes = dir
        .read(file_name)
        .map_err(|err| CliError::input(format!("read attachment '{path}': {err}")))?;
    Attachment::new(file_name, bytes).map_err(|err| CliError::input(err.to_string()))
}

#[cfg(test)]
mod tests {
    //! Regression coverage for attachment loading.

    use super::*;
    use camino::Utf8PathBuf;
    use tempfile::TempDir;

    #[test]
    fn attachments_are_read_with_their_file_name() {
        let temp = TempDir::new().expect("temp dir");
        let path = Utf8PathBuf::from_path_buf(temp.path().join("notes.txt")).expect("utf-8 path");
        std::fs::write(&path, b"hello").expect("write attachment");

        let attachment = read_attachment(&path).expect("attachment loads");
        assert_eq!(attachment.file_name(), "notes.txt");
        assert_eq!(attachment.bytes(), b"hello");
    }

    #[test]
    fn missing_attachments_are_input_errors() {
        let err = read_attachment(Utf8Path::new("/definitely/not/here.txt")).expect_err("missing");
        assert!(matches!(err, CliError::Input(_)));
    }
}
