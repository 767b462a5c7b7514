use crate::persistence::log_file_name;
use anyhow::{anyhow, Result};
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

const DEFAULT_FILTER: &str = "info";

/// Route tracing output to `<data dir>/pomodo.log`.
///
/// The terminal belongs to the TUI, so nothing is written to stdout/stderr.
/// `RUST_LOG` overrides the default level. Keep the returned guard alive
/// until exit or buffered lines are lost.
pub fn init_logging(data_dir: &Path) -> Result<WorkerGuard> {
    let appender = tracing_appender::rolling::never(data_dir, log_file_name());
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(DEFAULT_FILTER))
        .map_err(|e| anyhow!("invalid log filter: {}", e))?;

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true),
        )
        .try_init()
        .map_err(|e| anyhow!("failed to initialize logging: {}", e))?;

    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_logs_land_in_data_dir() {
        let temp_dir = tempdir().unwrap();
        let guard = init_logging(temp_dir.path()).unwrap();
        tracing::warn!(marker = "log-check", "logging to file");
        drop(guard);

        let log = std::fs::read_to_string(temp_dir.path().join(log_file_name())).unwrap();
        assert!(log.contains("log-check"));
    }
}
