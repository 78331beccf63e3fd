//! Minimal stderr backend for the `log` facade used across the engine.

use log::{LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::env;
use std::sync::OnceLock;

/// Environment variable holding the log level (`error` .. `trace`, `off`).
pub const LOG_ENV: &str = "HUNTER_LOG";

struct StderrLogger {
    level: LevelFilter,
}

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            // stdout carries the JSON reports
            eprintln!("[{:<5} {}] {}", record.level(), record.target(), record.args());
        }
    }

    fn flush(&self) {}
}

static LOGGER: OnceLock<StderrLogger> = OnceLock::new();

/// Parse a level name; anything unrecognised yields `default`.
fn level_from(value: Option<&str>, default: LevelFilter) -> LevelFilter {
    value
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

/// Install the stderr logger at the level named by [`LOG_ENV`], `info` when
/// unset. Fails if another logger is already installed.
pub fn try_init_logging() -> Result<(), SetLoggerError> {
    let level = level_from(env::var(LOG_ENV).ok().as_deref(), LevelFilter::Info);
    let logger = LOGGER.get_or_init(|| StderrLogger { level });
    log::set_logger(logger)?;
    log::set_max_level(logger.level);
    Ok(())
}

/// Like [`try_init_logging`] but ignores a logger that is already in place.
pub fn init_logging() {
    let _ = try_init_logging();
}
