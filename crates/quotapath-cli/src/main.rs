//! QuotaPath CLI - a terminal client for the QuotaPath sales commission
//! backend.
//!
//! Restores the saved session on start, prompts for login when needed, and
//! prints deals, commissions and dashboard metrics.

mod app;
mod cli;
mod output;

use std::io;

use anyhow::Result;
use quotapath_core::api::{ApiClient, Gateway};
use quotapath_core::auth::{SessionContext, SessionStore};
use quotapath_core::Config;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use app::App;
use cli::Command;

/// Directory for daily log files; logs go to stderr when unset
const LOG_DIR_ENV: &str = "QUOTAPATH_LOG_DIR";

/// Initialize the tracing subscriber for logging.
/// The returned guard must live until exit so buffered file logs are flushed.
fn init_tracing() -> Option<WorkerGuard> {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    match std::env::var(LOG_DIR_ENV) {
        Ok(dir) if !dir.trim().is_empty() => {
            let appender = tracing_appender::rolling::daily(dir.trim(), "quotapath.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::registry()
                .with(fmt::layer().with_writer(writer).with_ansi(false))
                .with(filter)
                .init();
            Some(guard)
        }
        _ => {
            tracing_subscriber::registry()
                .with(fmt::layer().with_writer(io::stderr))
                .with(filter)
                .init();
            None
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();
    let _log_guard = init_tracing();

    let command = match cli::parse(std::env::args().skip(1)) {
        Ok(command) => command,
        Err(e) => {
            eprintln!("Error: {}\n\n{}", e, cli::USAGE);
            std::process::exit(2);
        }
    };
    if matches!(command, Command::Help) {
        println!("{}", cli::USAGE);
        return Ok(());
    }

    let config = Config::load()?;
    info!(api = %config.api_base_url, storage = ?config.storage, "QuotaPath starting");

    let session = SessionContext::new(config.open_storage()?);
    let gateway = Gateway::from_config(&config, session)?;
    let store = SessionStore::new(ApiClient::new(gateway));

    let mut app = App::new(config, store);
    if let Err(e) = app.run(command).await {
        eprintln!("Error: {}", app::notification(&e));
        std::process::exit(1);
    }
    Ok(())
}
