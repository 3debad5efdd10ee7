#![deny(missing_docs)]
//! Shared logging utilities for the console workspace.
//!
//! This crate provides the `console_*` logging macros used across the
//! codebase plus the logger initializers for the relay binary and for
//! tests.

use std::fs::File;
use std::path::{Path, PathBuf};

use log::LevelFilter;
use simplelog::{
    ColorChoice, CombinedLogger, Config, ConfigBuilder, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};

/// Logs a trace-level message using the global logging facade.
#[macro_export]
macro_rules! console_trace {
    ($($arg:tt)*) => {{
        log::trace!($($arg)*);
    }};
}

/// Logs a debug-level message using the global logging facade.
#[macro_export]
macro_rules! console_debug {
    ($($arg:tt)*) => {{
        log::debug!($($arg)*);
    }};
}

/// Logs an info-level message using the global logging facade.
#[macro_export]
macro_rules! console_info {
    ($($arg:tt)*) => {{
        log::info!($($arg)*);
    }};
}

/// Logs a warn-level message using the global logging facade.
#[macro_export]
macro_rules! console_warn {
    ($($arg:tt)*) => {{
        log::warn!($($arg)*);
    }};
}

/// Logs an error-level message using the global logging facade.
#[macro_export]
macro_rules! console_error {
    ($($arg:tt)*) => {{
        log::error!($($arg)*);
    }};
}

/// Where the global logger writes.
pub struct LogOptions {
    level: LevelFilter,
    log_file: Option<PathBuf>,
}

impl LogOptions {
    /// Terminal-only logging at info level.
    pub fn terminal() -> Self {
        Self {
            level: LevelFilter::Info,
            log_file: None,
        }
    }

    /// Additionally mirror output to the given file.
    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.log_file = Some(path.into());
        self
    }

    /// Override the minimum level.
    pub fn with_level(mut self, level: LevelFilter) -> Self {
        self.level = level;
        self
    }
}

/// Initializes the global logger. A file that cannot be created is
/// reported on stderr and skipped; terminal logging still comes up.
pub fn initialize(options: LogOptions) {
    let config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_target_level(LevelFilter::Error)
        .build();

    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        options.level,
        config.clone(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )];
    if let Some(path) = &options.log_file {
        match file_logger(options.level, config, path) {
            Ok(logger) => loggers.push(logger),
            Err(err) => eprintln!("Warning: could not create log file {:?}: {}", path, err),
        }
    }

    let _ = CombinedLogger::init(loggers);
}

fn file_logger(
    level: LevelFilter,
    config: Config,
    path: &Path,
) -> std::io::Result<Box<WriteLogger<File>>> {
    Ok(WriteLogger::new(level, config, File::create(path)?))
}

/// Initializes a simple terminal logger for use in unit tests.
///
/// This safely no-ops if another logger has already been initialized.
pub fn initialize_for_tests() {
    // Use debug level in debug builds, info in release builds.
    let level = if cfg!(debug_assertions) {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    // Ignore the error if a logger was already set by another test.
    let _ = CombinedLogger::init(vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )]);
}
