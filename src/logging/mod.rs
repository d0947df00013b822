//! Leveled logging for fanlog
//!
//! Provides severity filtering, a per-kind handler set (console, file), a
//! fan-out writer that duplicates every line to all active handlers, and a
//! bridge for events recorded with `tracing`.

pub mod bridge;
mod buffer;
mod fanout;
mod format;
mod handler;
mod init;
mod logger;
pub mod paths;
mod severity;

pub use buffer::MemoryBuffer;
pub use fanout::{FanoutWriter, Sink};
pub use format::{Caller, CallerFormat, LineFormat};
pub use handler::{HandlerConfig, HandlerError, HandlerKind, HandlerSet};
pub use init::{init_logging, init_with, LoggingGuard};
pub use logger::Logger;
pub use paths::DEFAULT_LOG_FILE;
pub use severity::{LevelSpec, ParseSeverityError, Severity};
