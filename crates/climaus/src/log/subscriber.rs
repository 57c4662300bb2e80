//! Subscriber installation for stdout and rolling file output.

use crate::{ClimausError, Result};
use once_cell::sync::OnceCell;
use std::fs;
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

static LOG_INIT: OnceCell<()> = OnceCell::new();
// Dropping the guard stops the background writer, so it lives for the process.
static FILE_GUARD: OnceCell<WorkerGuard> = OnceCell::new();

/// Configuration for the process-wide logger.
#[derive(Clone, Debug)]
pub struct LogConfig {
    /// Default filter directive; `RUST_LOG` takes precedence when set
    pub level: String,
    /// Also write to a rolling log file
    pub log_to_file: bool,
    /// Directory for log files
    pub log_dir: PathBuf,
    /// Log file name; the stem and extension frame the date suffix
    pub file_name: String,
    /// Number of rotated files to keep
    pub max_files: usize,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            log_to_file: false,
            log_dir: PathBuf::from("logs"),
            file_name: "climaus.log".to_string(),
            max_files: 7,
        }
    }
}

impl LogConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the default filter directive.
    pub fn level(mut self, level: impl Into<String>) -> Self {
        self.level = level.into();
        self
    }

    /// Enable file output into the given directory.
    pub fn log_to_file(mut self, log_dir: impl Into<PathBuf>) -> Self {
        self.log_to_file = true;
        self.log_dir = log_dir.into();
        self
    }

    /// Set the log file name.
    pub fn file_name(mut self, name: impl Into<String>) -> Self {
        self.file_name = name.into();
        self
    }

    /// Set how many rotated files are kept.
    pub fn max_files(mut self, n: usize) -> Self {
        self.max_files = n;
        self
    }
}

/// Install the global subscriber.
///
/// Only the first call does anything; later calls return `Ok(())` without
/// touching the installed subscriber.
pub fn init_logging(config: &LogConfig) -> Result<()> {
    LOG_INIT.get_or_try_init(|| -> Result<()> {
        let filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(&config.level))
            .map_err(|e| ClimausError::Logging(format!("invalid log level: {e}")))?;

        let stdout_layer = fmt::layer().with_target(false);

        let file_layer = if config.log_to_file {
            let appender = rolling_appender(config)?;
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let _ = FILE_GUARD.set(guard);
            Some(fmt::layer().with_ansi(false).with_writer(writer))
        } else {
            None
        };

        tracing_subscriber::registry()
            .with(filter)
            .with(stdout_layer)
            .with(file_layer)
            .try_init()
            .map_err(|e| ClimausError::Logging(e.to_string()))?;
        Ok(())
    })?;

    tracing::debug!("Logging initialized");
    Ok(())
}

fn rolling_appender(config: &LogConfig) -> Result<RollingFileAppender> {
    fs::create_dir_all(&config.log_dir)?;

    let name = Path::new(&config.file_name);
    let prefix = name
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("climaus");

    let mut builder = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(prefix)
        .max_log_files(config.max_files.max(1));
    if let Some(ext) = name.extension().and_then(|s| s.to_str()) {
        builder = builder.filename_suffix(ext);
    }

    builder
        .build(&config.log_dir)
        .map_err(|e| ClimausError::Logging(format!("cannot open log file: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_config_builder() {
        let config = LogConfig::new()
            .level("debug")
            .log_to_file("outputs/logs")
            .file_name("run.log")
            .max_files(3);

        assert_eq!(config.level, "debug");
        assert!(config.log_to_file);
        assert_eq!(config.log_dir, PathBuf::from("outputs/logs"));
        assert_eq!(config.file_name, "run.log");
        assert_eq!(config.max_files, 3);
    }

    #[test]
    fn test_log_config_defaults() {
        let config = LogConfig::default();
        assert_eq!(config.level, "info");
        assert!(!config.log_to_file);
        assert_eq!(config.file_name, "climaus.log");
        assert_eq!(config.max_files, 7);
    }

    #[test]
    fn test_init_logging_twice_is_noop() {
        init_logging(&LogConfig::new()).unwrap();
        assert!(LOG_INIT.get().is_some());

        // The second config is never applied
        let ignored = LogConfig::new().level("not=a=[valid filter");
        init_logging(&ignored).unwrap();
        tracing::info!("still logging after second init");
    }

    #[test]
    fn test_rolling_appender_creates_dir() {
        let dir = tempfile::tempdir().unwrap();
        let log_dir = dir.path().join("nested").join("logs");
        let config = LogConfig::new().log_to_file(&log_dir);

        rolling_appender(&config).unwrap();
        assert!(log_dir.is_dir());
    }
}
