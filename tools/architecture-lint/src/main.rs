//! Lints the Taskforge client layers and exits non-zero on any violation.
//!
//! Takes an optional path to the client crate; defaults to the `client`
//! member of this workspace.

use std::io::{self, Write};
use std::process::ExitCode;

use camino::Utf8PathBuf;

fn main() -> ExitCode {
    let client_dir = std::env::args()
        .nth(1)
        .map(Utf8PathBuf::from)
        .unwrap_or_else(|| Utf8PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../client"));

    match architecture_lint::lint_client_sources(&client_dir) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let _ = writeln!(io::stderr().lock(), "{}", err.to_string().trim_end());
            ExitCode::FAILURE
        }
    }
}
