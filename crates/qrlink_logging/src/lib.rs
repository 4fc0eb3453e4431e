#![deny(missing_docs)]
//! Logging for the qrlink workspace.
//!
//! Library crates log through the `qrlink_*` macros, which resolve `log`
//! through this crate so callers need no direct `log` dependency. The binary
//! picks a [`LogTarget`] once at startup with [`init`].

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

pub use log::LevelFilter;
use simplelog::{
    ColorChoice, CombinedLogger, Config, ConfigBuilder, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};
use thiserror::Error;

#[doc(hidden)]
pub use log as __log;

/// Logs a debug-level message.
#[macro_export]
macro_rules! qrlink_debug {
    ($($arg:tt)*) => { $crate::__log::debug!($($arg)*) };
}

/// Logs an info-level message.
#[macro_export]
macro_rules! qrlink_info {
    ($($arg:tt)*) => { $crate::__log::info!($($arg)*) };
}

/// Logs a warn-level message.
#[macro_export]
macro_rules! qrlink_warn {
    ($($arg:tt)*) => { $crate::__log::warn!($($arg)*) };
}

/// Logs an error-level message.
#[macro_export]
macro_rules! qrlink_error {
    ($($arg:tt)*) => { $crate::__log::error!($($arg)*) };
}

/// Where log records go. Terminal output uses stderr so stdout stays free for
/// the prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    /// Truncate and write the given file.
    File(PathBuf),
    /// Write to stderr.
    Terminal,
    /// Write to stderr and the given file.
    Both(PathBuf),
}

/// Failure to install the global logger.
#[derive(Debug, Error)]
pub enum LogInitError {
    /// The log file could not be created.
    #[error("cannot create log file {path:?}: {source}")]
    File {
        /// Requested log file.
        path: PathBuf,
        /// Underlying error.
        source: io::Error,
    },
    /// A global logger was installed earlier.
    #[error("a logger is already installed")]
    AlreadySet(#[from] log::SetLoggerError),
}

/// Installs the global logger for `target` at `level`.
pub fn init(target: &LogTarget, level: LevelFilter) -> Result<(), LogInitError> {
    let loggers: Vec<Box<dyn SharedLogger>> = match target {
        LogTarget::File(path) => vec![file_logger(path, level)?],
        LogTarget::Terminal => vec![stderr_logger(level)],
        LogTarget::Both(path) => vec![stderr_logger(level), file_logger(path, level)?],
    };
    CombinedLogger::init(loggers)?;
    Ok(())
}

fn record_config() -> Config {
    ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_target_level(LevelFilter::Error)
        .build()
}

fn stderr_logger(level: LevelFilter) -> Box<dyn SharedLogger> {
    TermLogger::new(
        level,
        record_config(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )
}

fn file_logger(path: &Path, level: LevelFilter) -> Result<Box<dyn SharedLogger>, LogInitError> {
    let file = File::create(path).map_err(|source| LogInitError::File {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(WriteLogger::new(level, record_config(), file))
}

/// Installs a debug-level stderr logger for tests; later calls are no-ops.
pub fn initialize_for_tests() {
    let _ = init(&LogTarget::Terminal, LevelFilter::Debug);
}
