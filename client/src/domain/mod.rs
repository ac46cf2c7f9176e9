//! Domain primitives, ports, and use cases.
//!
//! Purpose: define strongly typed session and task entities plus the services
//! that move the client between signed-out and signed-in states. Nothing in
//! here performs I/O directly; adapters implement the traits in [`ports`].
//!
//! Public surface:
//! - Error and ErrorCode: transport agnostic error payload.
//! - BearerToken, TokenClaims, Role, Session, SessionState: session model.
//! - SessionStore and SessionManager: persistence and state transitions.
//! - AuthenticationService and TaskService: use cases driven by the views.

pub mod auth;
pub mod auth_service;
pub mod error;
pub mod ports;
pub mod session;
pub mod session_manager;
pub mod session_store;
pub mod task;
pub mod task_service;

pub use self::auth::{CredentialsValidationError, LoginCredentials, PasswordReset};
pub use self::auth_service::AuthenticationService;
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::session::{BearerToken, Role, Session, SessionState, TokenClaims, TokenError};
pub use self::session_manager::{AccessDenied, SessionManager};
pub use self::session_store::{SESSION_STORAGE_KEY, SessionError, SessionStore};
pub use self::task::{
    Attachment, Task, TaskDraft, TaskId, TaskPriority, TaskStatus, TaskUpdate, TaskValidationError,
};
pub use self::task_service::TaskService;
