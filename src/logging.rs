//! Logging configuration using the tracing ecosystem.
//!
//! Logs go to a daily-rotating file so that stdout stays reserved for the
//! fetched JSON. With `--verbose` the same events are mirrored to stderr.

use std::path::PathBuf;

use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

/// Default log filter if RUST_LOG is not set.
const DEFAULT_LOG_FILTER: &str = "jira_api_fetcher=info,warn";

/// Filter used for `--verbose` when RUST_LOG is not set.
const VERBOSE_LOG_FILTER: &str = "jira_api_fetcher=debug,warn";

/// Initialize the logging system.
///
/// Configure the level via `RUST_LOG`, e.g. `RUST_LOG=jira_api_fetcher=debug`
/// to see every page request.
///
/// # Log Directory
///
/// - Linux: `~/.local/share/jira-api-fetcher/logs/`
/// - macOS: `~/Library/Application Support/jira-api-fetcher/logs/`
/// - Windows: `C:\Users\<User>\AppData\Local\jira-api-fetcher\logs\`
///
/// # Errors
///
/// Returns an error if the log directory cannot be created or a global
/// subscriber is already installed.
pub fn init(verbose: bool) -> anyhow::Result<()> {
    let log_dir = get_log_directory()?;
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = RollingFileAppender::new(Rotation::DAILY, &log_dir, "jira-fetch.log");

    let default_filter = if verbose {
        VERBOSE_LOG_FILTER
    } else {
        DEFAULT_LOG_FILTER
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let stderr_layer = verbose.then(|| {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .compact()
    });

    let subscriber = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false)
                .with_target(true)
                .with_file(true)
                .with_line_number(true),
        )
        .with(stderr_layer)
        .with(filter);

    tracing::subscriber::set_global_default(subscriber)?;

    tracing::debug!(
        version = env!("CARGO_PKG_VERSION"),
        log_dir = %log_dir.display(),
        "Logging initialized"
    );

    Ok(())
}

fn get_log_directory() -> anyhow::Result<PathBuf> {
    let base_dir = dirs::data_local_dir()
        .ok_or_else(|| anyhow::anyhow!("Could not determine local data directory"))?;

    Ok(base_dir.join("jira-api-fetcher").join("logs"))
}

/// The directory where log files are written, if it can be determined.
pub fn log_directory() -> Option<PathBuf> {
    get_log_directory().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_directory_has_expected_structure() {
        if let Some(dir) = log_directory() {
            assert!(dir.ends_with("jira-api-fetcher/logs"));
        }
    }
}
