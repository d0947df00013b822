//! Leveled logger with console/file fan-out
//!
//! A `Logger` owns the minimum severity, the handler set and the fan-out
//! writer built from it. It is an explicit instance, usually shared as
//! `Arc<Logger>` from the process entry point.
//!
//! ```rust,ignore
//! use fanlog::{log_info, Logger, Severity};
//!
//! let logger = Logger::new();
//! logger.configure(Severity::Info);
//! logger.add_file_handler("out/app.log");
//!
//! log_info!(logger, "y: {}", 5);
//! ```

use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::Utc;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::fmt::MakeWriter;

use super::fanout::{ConsoleMaker, FanoutWriter, Sink};
use super::format::{Caller, LineFormat};
use super::handler::{HandlerConfig, HandlerError, HandlerKind, HandlerSet};
use super::paths;
use super::severity::{LevelSpec, Severity};

#[derive(Debug)]
struct LoggerState {
    level: Severity,
    handlers: HandlerSet,
    format: LineFormat,
    writer: FanoutWriter,
    errors: Vec<HandlerError>,
    closed: bool,
}

/// Leveled logger
#[derive(Debug)]
pub struct Logger {
    console: ConsoleMaker,
    state: Mutex<LoggerState>,
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

impl Logger {
    /// Logger writing to standard output at INFO
    pub fn new() -> Self {
        Self::with_console(std::io::stdout)
    }

    /// Logger whose STDOUT handler writes to `console` instead of standard output
    pub fn with_console<M>(console: M) -> Self
    where
        M: for<'a> MakeWriter<'a> + Send + Sync + 'static,
    {
        let logger = Self {
            console: Arc::new(BoxMakeWriter::new(console)),
            state: Mutex::new(LoggerState {
                level: Severity::Info,
                handlers: HandlerSet::default(),
                format: LineFormat::default(),
                writer: FanoutWriter::new(),
                errors: Vec::new(),
                closed: false,
            }),
        };
        // The console handler alone cannot fail to open
        let _ = logger.rebuild();
        logger
    }

    fn state(&self) -> MutexGuard<'_, LoggerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // Level registry

    /// Set the minimum severity.
    ///
    /// Names are matched case-insensitively and unknown names resolve to
    /// `Severity::Error`. Setting a level by name announces the new level.
    #[track_caller]
    pub fn set_level(&self, level: impl Into<LevelSpec>) -> Severity {
        let requested = level.into();
        let severity = requested.resolve();
        self.state().level = severity;

        if requested.is_named() {
            let announce_at = match severity {
                Severity::Debug => Severity::Debug,
                _ => Severity::Info,
            };
            self.log(
                announce_at,
                Some(Caller::here()),
                format_args!("Current logger level set to: {}", severity),
            );
        }

        severity
    }

    pub fn current_level(&self) -> Severity {
        self.state().level
    }

    /// Whether a message of `severity` would currently be written
    pub fn is_enabled(&self, severity: Severity) -> bool {
        let state = self.state();
        !state.closed && severity >= state.level
    }

    // Handler set

    /// Register or replace the FILE handler and return its resolved path.
    ///
    /// An empty path resolves to `logs/application.log`. The fan-out is
    /// rebuilt right away: missing directories are created and the file is
    /// opened, or the failure is reported at ERROR.
    #[track_caller]
    pub fn add_file_handler(&self, path: impl AsRef<Path>) -> PathBuf {
        let handler = HandlerConfig::file(path);
        let resolved = handler.path().map(Path::to_path_buf).unwrap_or_default();
        self.state().handlers.insert(handler);
        self.apply_handlers(Caller::here());
        resolved
    }

    /// Register the STDOUT handler and rebuild the fan-out
    #[track_caller]
    pub fn add_console_handler(&self) {
        self.state().handlers.insert(HandlerConfig::Stdout);
        self.apply_handlers(Caller::here());
    }

    /// Unregister a handler and rebuild the fan-out
    #[track_caller]
    pub fn remove_handler(&self, kind: HandlerKind) -> bool {
        let removed = self.state().handlers.remove(kind).is_some();
        if removed {
            self.apply_handlers(Caller::here());
        }
        removed
    }

    /// Replace the whole handler set. Takes effect on the next configure.
    pub fn set_handlers(&self, handlers: HandlerSet) {
        self.state().handlers = handlers;
    }

    /// Registered handlers in write order
    pub fn handlers(&self) -> Vec<HandlerConfig> {
        self.state().handlers.iter().cloned().collect()
    }

    /// Kinds of the sinks currently receiving output
    pub fn active_sinks(&self) -> Vec<HandlerKind> {
        self.state().writer.kinds()
    }

    pub fn set_format(&self, format: LineFormat) {
        self.state().format = format;
    }

    pub fn format(&self) -> LineFormat {
        self.state().format
    }

    /// Apply `level` and rebuild the fan-out writer from the handler set.
    ///
    /// Missing parent directories of the log file are created. A file that
    /// cannot be opened is reported at ERROR through the remaining sinks and
    /// left out; configuration never fails.
    #[track_caller]
    pub fn configure(&self, level: impl Into<LevelSpec>) {
        self.apply_handlers(Caller::here());
        self.set_level(level);
    }

    /// One-shot initialization.
    ///
    /// When `logfile` is non-empty the logs folder `logpath` is created if
    /// missing and output goes to standard output and `logpath/logfile`.
    /// The level is applied in every case.
    #[track_caller]
    pub fn setup(&self, level: impl Into<LevelSpec>, logfile: &str, logpath: impl AsRef<Path>) {
        if logfile.is_empty() {
            self.set_level(level);
            return;
        }

        let path = paths::log_file_in(logpath.as_ref(), logfile);
        {
            let mut state = self.state();
            state.handlers.insert(HandlerConfig::Stdout);
            state.handlers.insert(HandlerConfig::File { path });
        }
        self.configure(level);
    }

    /// Handler failures of the most recent rebuild, not yet taken
    pub fn take_handler_errors(&self) -> Vec<HandlerError> {
        std::mem::take(&mut self.state().errors)
    }

    /// Rebuild the fan-out, report open failures at ERROR and keep them for
    /// [`Logger::take_handler_errors`]
    fn apply_handlers(&self, caller: Caller) {
        let errors = self.rebuild();
        for error in &errors {
            self.log(Severity::Error, Some(caller), format_args!("{}", error));
        }
        self.state().errors = errors;
    }

    fn rebuild(&self) -> Vec<HandlerError> {
        let mut state = self.state();
        let mut writer = FanoutWriter::new();
        let mut errors = Vec::new();

        for handler in state.handlers.iter() {
            match handler {
                HandlerConfig::Stdout => writer.push(Sink::Console(Arc::clone(&self.console))),
                HandlerConfig::File { path } => {
                    paths::ensure_parent_dir(path);
                    match paths::open_append(path) {
                        Ok(file) => writer.push(Sink::File {
                            path: path.clone(),
                            file,
                        }),
                        Err(source) => errors.push(HandlerError::Open {
                            path: path.clone(),
                            source,
                        }),
                    }
                }
            }
        }

        state.writer.close();
        state.writer = writer;
        state.closed = false;
        errors
    }

    // Lifecycle

    /// Flush and release every sink. Messages are dropped until the next configure.
    pub fn shutdown(&self) {
        let mut state = self.state();
        state.writer.close();
        state.closed = true;
    }

    pub fn is_closed(&self) -> bool {
        self.state().closed
    }

    // Emit functions

    /// Write one line if `severity` passes the minimum level
    pub fn log(&self, severity: Severity, caller: Option<Caller>, args: fmt::Arguments<'_>) {
        let mut state = self.state();
        if state.closed || severity < state.level {
            return;
        }

        let line = state.format.render(Utc::now(), caller, severity, args);
        let _ = state.writer.write_all(line.as_bytes());
    }

    #[track_caller]
    pub fn emit(&self, severity: Severity, args: fmt::Arguments<'_>) {
        self.log(severity, Some(Caller::here()), args);
    }

    #[track_caller]
    pub fn debug(&self, args: fmt::Arguments<'_>) {
        self.log(Severity::Debug, Some(Caller::here()), args);
    }

    #[track_caller]
    pub fn info(&self, args: fmt::Arguments<'_>) {
        self.log(Severity::Info, Some(Caller::here()), args);
    }

    #[track_caller]
    pub fn warning(&self, args: fmt::Arguments<'_>) {
        self.log(Severity::Warning, Some(Caller::here()), args);
    }

    #[track_caller]
    pub fn error(&self, args: fmt::Arguments<'_>) {
        self.log(Severity::Error, Some(Caller::here()), args);
    }
}

/// Convenience macros for logging with format arguments
#[macro_export]
macro_rules! log_debug {
    ($logger:expr, $($arg:tt)+) => {
        $logger.debug(format_args!($($arg)+))
    };
}

#[macro_export]
macro_rules! log_info {
    ($logger:expr, $($arg:tt)+) => {
        $logger.info(format_args!($($arg)+))
    };
}

#[macro_export]
macro_rules! log_warning {
    ($logger:expr, $($arg:tt)+) => {
        $logger.warning(format_args!($($arg)+))
    };
}

#[macro_export]
macro_rules! log_error {
    ($logger:expr, $($arg:tt)+) => {
        $logger.error(format_args!($($arg)+))
    };
}
