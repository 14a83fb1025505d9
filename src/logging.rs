//! Tracing setup: JSON to stdout, optionally mirrored to rolling files.

use crate::{Error, Result, config::LogsConfig};
use std::path::Path;
use tracing_appender::{
    non_blocking::WorkerGuard,
    rolling::{RollingFileAppender, Rotation},
};
use tracing_subscriber::{
    EnvFilter, Layer, filter::LevelFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt,
};

pub const MAIN_LOG_PREFIX: &str = "mcp";
pub const ERROR_LOG_PREFIX: &str = "error";

/// Keeps the background file writers alive. Dropping it flushes them.
#[must_use = "dropping the guards stops file logging"]
pub struct LogGuards {
    _guards: Vec<WorkerGuard>,
}

/// Parses a configured level. `none` turns logging off.
pub fn parse_level(level: &str) -> Result<LevelFilter> {
    let level = level.trim();
    if level.eq_ignore_ascii_case("none") {
        return Ok(LevelFilter::OFF);
    }
    level.parse::<LevelFilter>().map_err(|_| {
        Error::config(format!(
            "Invalid log level: '{}'. Valid levels: none, error, warn, info, debug, trace",
            level
        ))
    })
}

/// Daily rotated `<prefix>.<date>.log` files in `dir`.
pub fn rolling_appender(dir: &Path, prefix: &str, max_files: usize) -> Result<RollingFileAppender> {
    std::fs::create_dir_all(dir)?;
    RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(prefix)
        .filename_suffix("log")
        .max_log_files(max_files.max(1))
        .build(dir)
        .map_err(|e| Error::config(format!("Cannot log to {}: {}", dir.display(), e)))
}

/// Installs the global subscriber.
///
/// `RUST_LOG` overrides the configured level for stdout. The file logs use
/// the configured level, and `error.log` only receives errors.
pub fn init(config: &LogsConfig) -> Result<LogGuards> {
    let level = parse_level(&config.level)?;
    let stdout_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.to_string()));

    let mut guards = Vec::new();
    let (main_file, error_file) = if config.file_enabled {
        let dir = Path::new(&config.dir);
        let (main_writer, main_guard) =
            tracing_appender::non_blocking(rolling_appender(dir, MAIN_LOG_PREFIX, config.max_files)?);
        let (error_writer, error_guard) =
            tracing_appender::non_blocking(rolling_appender(dir, ERROR_LOG_PREFIX, config.max_files)?);
        guards.push(main_guard);
        guards.push(error_guard);
        (
            Some(
                fmt::layer()
                    .json()
                    .with_ansi(false)
                    .with_writer(main_writer)
                    .with_filter(level),
            ),
            Some(
                fmt::layer()
                    .json()
                    .with_ansi(false)
                    .with_writer(error_writer)
                    .with_filter(LevelFilter::ERROR),
            ),
        )
    } else {
        (None, None)
    };

    tracing_subscriber::registry()
        .with(fmt::layer().json().with_filter(stdout_filter))
        .with(main_file)
        .with(error_file)
        .try_init()
        .map_err(|e| Error::internal(format!("Failed to install tracing subscriber: {}", e)))?;

    Ok(LogGuards { _guards: guards })
}
