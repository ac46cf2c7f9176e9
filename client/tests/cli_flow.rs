//! End-to-end command runs over in-memory storage and fake APIs.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use clap::Parser;
use client::domain::ports::{AuthApi, AuthApiError, KeyValueStore, TaskApi, TaskApiError};
use client::domain::{
    BearerToken, LoginCredentials, PasswordReset, SESSION_STORAGE_KEY, Task, TaskDraft, TaskId,
    TaskPriority, TaskStatus, TaskUpdate,
};
use client::inbound::cli::{CliError, Cli, Console, LOGIN_HINT, TaskforgeCli};
use client::outbound::storage::InMemoryKeyValueStore;
use rstest::{fixture, rstest};

const ADMIN_TOKEN: &str = "eyJhbGciOiJIUzI1NiJ9.eyJyb2xlIjoiYWRtaW4ifQ.c2ln";

struct FakeAuth;

#[async_trait]
impl AuthApi for FakeAuth {
    async fn login(&self, credentials: &LoginCredentials) -> Result<String, AuthApiError> {
        match credentials.password() {
            "hunter2" => Ok(ADMIN_TOKEN.to_owned()),
            "garbled" => Ok("not-a-token".to_owned()),
            _ => Err(AuthApiError::rejected(401_u16, "Invalid credentials")),
        }
    }

    async fn reset_password(&self, _reset: &PasswordReset) -> Result<(), AuthApiError> {
        Ok(())
    }
}

#[derive(Default)]
struct FakeTasks {
    expired: bool,
    deleted: Mutex<Vec<String>>,
}

#[async_trait]
impl TaskApi for FakeTasks {
    async fn list(&self, _token: &BearerToken) -> Result<Vec<Task>, TaskApiError> {
        if self.expired {
            return Err(TaskApiError::unauthorized("jwt expired"));
        }
        Ok(vec![Task {
            id: TaskId::new("64f1c2").expect("valid id"),
            title: "Write report".to_owned(),
            description: None,
            status: TaskStatus::Pending,
            priority: TaskPriority::High,
            due_date: None,
        }])
    }

    async fn get(&self, _token: &BearerToken, _id: &TaskId) -> Result<Task, TaskApiError> {
        Err(TaskApiError::not_found("missing"))
    }

    async fn create(&self, _token: &BearerToken, _draft: &TaskDraft) -> Result<(), TaskApiError> {
        Ok(())
    }

    async fn update(
        &self,
        _token: &BearerToken,
        _id: &TaskId,
        _update: &TaskUpdate,
    ) -> Result<(), TaskApiError> {
        Ok(())
    }

    async fn delete(&self, _token: &BearerToken, id: &TaskId) -> Result<(), TaskApiError> {
        self.deleted
            .lock()
            .expect("deleted lock")
            .push(id.as_str().to_owned());
        Ok(())
    }
}

struct Harness {
    store: Arc<InMemoryKeyValueStore>,
    tasks: Arc<FakeTasks>,
}

struct Run {
    outcome: Result<(), CliError>,
    output: String,
    prompt: String,
}

impl Harness {
    fn signed_in(self) -> Self {
        self.store
            .set(
                SESSION_STORAGE_KEY,
                &format!(r#"{{"token":"{ADMIN_TOKEN}","role":"admin"}}"#),
            )
            .expect("in-memory writes succeed");
        self
    }

    fn with_tasks(mut self, tasks: FakeTasks) -> Self {
        self.tasks = Arc::new(tasks);
        self
    }

    async fn run(&self, args: &[&str], input: &str) -> Run {
        let cli = Cli::try_parse_from(std::iter::once("taskforge").chain(args.iter().copied()))
            .expect("arguments parse");
        let mut app = TaskforgeCli::new(self.store.clone(), Arc::new(FakeAuth), self.tasks.clone());
        let mut console = Console::new(input.as_bytes(), Vec::new(), Vec::new());
        let outcome = app.run(cli.command, &mut console).await;
        let (_, output, prompt) = console.into_parts();
        Run {
            outcome,
            output: String::from_utf8(output).expect("utf-8 output"),
            prompt: String::from_utf8(prompt).expect("utf-8 prompt"),
        }
    }

    fn stored(&self) -> Option<String> {
        self.store
            .get(SESSION_STORAGE_KEY)
            .expect("in-memory reads succeed")
    }
}

#[fixture]
fn harness() -> Harness {
    Harness {
        store: Arc::new(InMemoryKeyValueStore::new()),
        tasks: Arc::new(FakeTasks::default()),
    }
}

#[rstest]
#[tokio::test]
async fn login_persists_the_session_and_shows_the_task_list(harness: Harness) {
    let run = harness
        .run(&["login", "--email", "ada@example.com"], "hunter2\n")
        .await;

    assert!(run.outcome.is_ok(), "outcome: {:?}", run.outcome);
    assert!(run.prompt.starts_with("Password: "));
    assert!(run.output.starts_with("Signed in (role: admin).\nMy Tasks\n"));
    assert!(run.output.contains("Write report"));
    assert!(harness.stored().expect("session stored").contains(ADMIN_TOKEN));
}

#[rstest]
#[tokio::test]
async fn rejected_logins_keep_the_user_signed_out(harness: Harness) {
    let run = harness
        .run(&["login", "--email", "ada@example.com", "--password", "nope"], "")
        .await;

    let err = run.outcome.expect_err("login fails");
    assert_eq!(err.to_string(), "Invalid credentials");
    assert_eq!(err.exit_code(), 3);
    assert_eq!(harness.stored(), None);
}

#[rstest]
#[tokio::test]
async fn malformed_tokens_report_their_cause(harness: Harness) {
    let run = harness
        .run(&["login", "--email", "ada@example.com", "--password", "garbled"], "")
        .await;

    let err = run.outcome.expect_err("token rejected");
    let mut report = Vec::new();
    err.report(&mut report).expect("report written");
    let report = String::from_utf8(report).expect("utf-8 report");

    assert!(report.starts_with("error: Login failed"), "report: {report}");
    assert!(report.contains("\n  cause: "), "report: {report}");
    assert_eq!(harness.stored(), None);
}

#[rstest]
#[tokio::test]
async fn login_into_an_expired_session_hints_at_login_once(harness: Harness) {
    let harness = harness.with_tasks(FakeTasks {
        expired: true,
        ..FakeTasks::default()
    });

    let run = harness
        .run(&["login", "--email", "ada@example.com", "--password", "hunter2"], "")
        .await;

    let err = run.outcome.expect_err("listing fails after login");
    assert_eq!(err.exit_code(), 3);
    assert!(run.output.starts_with("Signed in (role: admin).\n"));
    assert_eq!(run.prompt.matches(LOGIN_HINT).count(), 1, "prompt: {}", run.prompt);
    assert_eq!(harness.stored(), None);
}

#[rstest]
#[tokio::test]
async fn protected_commands_send_signed_out_users_to_login(harness: Harness) {
    let run = harness.run(&["tasks", "list"], "").await;

    let err = run.outcome.expect_err("not signed in");
    assert_eq!(err.exit_code(), 3);
    assert!(run.prompt.contains(LOGIN_HINT));
    assert!(run.output.is_empty());
}

#[rstest]
#[tokio::test]
async fn whoami_reads_the_persisted_session(harness: Harness) {
    let harness = harness.signed_in();

    let run = harness.run(&["whoami"], "").await;

    assert!(run.outcome.is_ok());
    assert_eq!(run.output, "Signed in as an administrator.\n");
}

#[rstest]
#[tokio::test]
async fn logout_clears_storage_and_points_at_login(harness: Harness) {
    let harness = harness.signed_in();

    let run = harness.run(&["logout"], "").await;

    assert!(run.outcome.is_ok());
    assert_eq!(run.output, "Signed out.\n");
    assert!(run.prompt.contains(LOGIN_HINT));
    assert_eq!(harness.stored(), None);
}

#[rstest]
#[tokio::test]
async fn expired_sessions_are_cleared(harness: Harness) {
    let harness = harness.signed_in().with_tasks(FakeTasks {
        expired: true,
        ..FakeTasks::default()
    });

    let run = harness.run(&["tasks", "list"], "").await;

    let err = run.outcome.expect_err("session expired");
    assert_eq!(err.to_string(), "Your session has expired. Please log in again.");
    assert!(run.prompt.contains(LOGIN_HINT));
    assert_eq!(harness.stored(), None);
}

#[rstest]
#[case::declined("n\n", "Cancelled.\n", 0)]
#[case::confirmed("y\n", "Task deleted\n", 1)]
#[tokio::test]
async fn delete_asks_before_removing(
    harness: Harness,
    #[case] answer: &str,
    #[case] expected_output: &str,
    #[case] expected_deletes: usize,
) {
    let harness = harness.signed_in();

    let run = harness.run(&["tasks", "delete", "64f1c2"], answer).await;

    assert!(run.outcome.is_ok(), "outcome: {:?}", run.outcome);
    assert_eq!(run.output, expected_output);
    assert!(run.prompt.contains("[y/N]"));
    assert_eq!(
        harness.tasks.deleted.lock().expect("deleted lock").len(),
        expected_deletes
    );
}
