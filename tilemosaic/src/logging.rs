//! Logging bootstrap.
//!
//! Structured logging via `tracing`, with two sinks: a non-blocking log
//! file for operator forensics (skipped tiles, sidecar failures) and
//! stdout for interactive use. Filtering follows `RUST_LOG`, defaulting
//! to `info`.

use std::fs;
use std::io;
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::time::LocalTime;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Keeps the file writer alive; dropping it flushes and closes the log.
pub struct LogGuard {
    _file_guard: WorkerGuard,
}

/// Initialize the global subscriber with file and stdout sinks.
///
/// # Arguments
///
/// * `log_dir` - Directory for the log file, created if missing
/// * `log_file` - Log file name within `log_dir`
///
/// # Returns
///
/// A [`LogGuard`] the caller must hold for the lifetime of the program.
///
/// # Errors
///
/// I/O errors creating the log directory.
pub fn init(log_dir: &Path, log_file: &str) -> Result<LogGuard, io::Error> {
    fs::create_dir_all(log_dir)?;

    let file_appender = tracing_appender::rolling::never(log_dir, log_file);
    let (non_blocking_file, file_guard) = tracing_appender::non_blocking(file_appender);

    let timer = LocalTime::rfc_3339();

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false)
        .with_timer(timer.clone());

    let stdout_layer = tracing_subscriber::fmt::layer()
        .with_writer(io::stdout)
        .with_ansi(true)
        .with_timer(timer)
        .compact();

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(stdout_layer)
        .init();

    Ok(LogGuard {
        _file_guard: file_guard,
    })
}
