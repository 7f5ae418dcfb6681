//! File logging.
//!
//! The quiz UI owns the terminal, so log lines go to a file instead of
//! stderr.

use std::io;
use std::path::{Path, PathBuf};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

pub const LOG_FILE_NAME: &str = "timed-quiz.log";

/// `<cache dir>/timed-quiz`, falling back to the working directory.
pub fn default_log_dir() -> PathBuf {
    dirs::cache_dir()
        .map(|dir| dir.join("timed-quiz"))
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Level filter for a `-v` count. `RUST_LOG` wins when set.
pub fn filter_for_verbosity(verbose: u8) -> EnvFilter {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
}

/// Install the global subscriber writing to `<dir>/timed-quiz.log`.
///
/// Keep the returned guard alive for as long as logging is needed; dropping
/// it flushes buffered lines.
pub fn init(dir: &Path, verbose: u8) -> io::Result<WorkerGuard> {
    std::fs::create_dir_all(dir)?;
    let appender = tracing_appender::rolling::never(dir, LOG_FILE_NAME);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::fmt()
        .with_env_filter(filter_for_verbosity(verbose))
        .with_writer(writer)
        .with_ansi(false)
        .with_target(false)
        .init();

    Ok(guard)
}
