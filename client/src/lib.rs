//! Taskforge client library: session management, task use cases, and the
//! adapters that connect them to storage, the REST API, and the terminal.

pub mod config;
pub mod domain;
pub mod inbound;
pub mod outbound;

pub use config::{ClientSettings, SettingsError};
