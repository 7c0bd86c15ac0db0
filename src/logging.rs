//! Logging setup for the binary
//!
//! Logs go to stderr, filtered by `RUST_LOG` (default `archive_gate=info`).
//! With `ARCHIVE_GATE_LOG_DIR` set they go to a daily rolling JSON file there instead.

use anyhow::{anyhow, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "archive_gate=info";
const LOG_DIR_ENV: &str = "ARCHIVE_GATE_LOG_DIR";
const LOG_FILE_PREFIX: &str = "archive-gate.log";

/// Install the global subscriber.
///
/// Keep the returned guard alive until exit, otherwise buffered file output is lost.
pub fn init_logging() -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    match std::env::var_os(LOG_DIR_ENV) {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(writer)
                .with_ansi(false)
                .json()
                .try_init()
                .map_err(|e| anyhow!("Failed to install tracing subscriber: {}", e))?;
            Ok(Some(guard))
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .try_init()
                .map_err(|e| anyhow!("Failed to install tracing subscriber: {}", e))?;
            Ok(None)
        }
    }
}
