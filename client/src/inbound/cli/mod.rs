//! Terminal adapter: argument parsing, views, and the command runner.
//!
//! The runner owns the session manager for the lifetime of one command and
//! plays the part of the view layer: it renders the route the manager
//! navigated to once the command finishes.

mod app;
mod args;
mod console;
mod error;
mod navigator;
mod views;

pub use app::TaskforgeCli;
pub use args::{
    Cli, Command, DueDate, EditTaskArgs, LoginArgs, NewTaskArgs, ResetPasswordArgs, TaskCommand,
};
pub use console::Console;
pub use error::CliError;
pub use navigator::RouteRecorder;
pub use views::{LOGIN_HINT, render_session, render_task, render_task_list};
