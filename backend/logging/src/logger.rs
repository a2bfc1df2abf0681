//! Structured Logger
//!
//! Wraps `tracing` to provide console output (plain or JSON), optional file
//! rotation (NDJSON), and environment-based level control.

use anyhow::{Context, Result};
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// File name prefix of the rolling log, e.g. `sysaudit.log.2026-10-15`.
pub const LOG_FILE_PREFIX: &str = "sysaudit.log";

/// Initialize the global structured logger.
///
/// `RUST_LOG` wins over `level` when set. With `log_dir`, a daily-rotated
/// NDJSON file is written alongside the console; keep the returned guard
/// alive for as long as file logs should be flushed.
///
/// A second call leaves the first subscriber in place.
pub fn init_logger(level: &str, json: bool, log_dir: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let console_layer = if json {
        fmt::layer().json().with_writer(std::io::stdout).boxed()
    } else {
        fmt::layer()
            .with_writer(std::io::stdout)
            .with_target(false)
            .with_ansi(true)
            .boxed()
    };

    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create log directory: {}", dir.display()))?;
            let appender = RollingFileAppender::new(Rotation::DAILY, dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().json().with_writer(writer).with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    if tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .is_err()
    {
        tracing::debug!("Global logger already initialized");
    }

    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn creates_log_dir_and_returns_guard() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("logs");
        let guard = init_logger("info", false, Some(&dir)).unwrap();
        assert!(guard.is_some());
        assert!(dir.is_dir());
    }
}
