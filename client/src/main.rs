//! `taskforge` entry-point: loads settings, wires adapters, runs one command.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::ffi::OsString;
use std::io;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use client::ClientSettings;
use client::inbound::cli::{Cli, Console, TaskforgeCli};
use client::outbound::http::{ApiClient, HttpAuthApi, HttpTaskApi};
use client::outbound::storage::FileKeyValueStore;
use color_eyre::eyre::{Result, WrapErr, eyre};
use ortho_config::OrthoConfig;
use tokio::runtime::Builder;
use tracing::{debug, warn};
use tracing_subscriber::{EnvFilter, fmt};

fn main() -> Result<ExitCode> {
    color_eyre::install()?;
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    let settings = ClientSettings::load_from_iter([OsString::from("taskforge")])
        .map_err(|err| eyre!("failed to load configuration: {err}"))?;
    let api_url = settings.api_url()?;
    let session_dir = settings.session_dir()?;
    let timeout = settings.request_timeout()?;
    debug!(%api_url, %session_dir, ?timeout, "configuration loaded");

    let store = FileKeyValueStore::open(session_dir.clone())
        .wrap_err_with(|| format!("failed to open session directory {session_dir}"))?;
    let api = ApiClient::new(api_url, timeout)?;
    let mut app = TaskforgeCli::new(
        Arc::new(store),
        Arc::new(HttpAuthApi::new(api.clone())),
        Arc::new(HttpTaskApi::new(api)),
    );

    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .wrap_err("failed to create Tokio runtime")?;
    let stdin = io::stdin();
    let mut console = Console::new(stdin.lock(), io::stdout().lock(), io::stderr());
    let outcome = runtime.block_on(app.run(cli.command, &mut console));
    drop(console);

    match outcome {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(err) => {
            err.report(&mut io::stderr().lock())?;
            Ok(ExitCode::from(err.exit_code()))
        }
    }
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let builder = fmt().with_env_filter(filter).with_writer(io::stderr);
    let result = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    if let Err(e) = result {
        warn!(error = %e, "tracing init failed");
    }
}
