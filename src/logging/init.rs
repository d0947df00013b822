//! Process-level initialization and the guard that shuts logging down

use std::sync::Arc;

use crate::config::Config;

use super::logger::Logger;

/// Guard that keeps the logging system alive
///
/// Dropping it flushes and closes every sink.
pub struct LoggingGuard {
    logger: Arc<Logger>,
}

impl LoggingGuard {
    pub fn logger(&self) -> &Arc<Logger> {
        &self.logger
    }
}

impl Drop for LoggingGuard {
    fn drop(&mut self) {
        self.logger.shutdown();
    }
}

/// Build a logger from configuration
///
/// Returns the shared logger and a guard that must be kept alive for the
/// duration of logging.
pub fn init_logging(config: &Config) -> (Arc<Logger>, LoggingGuard) {
    init_with(Logger::new(), config)
}

/// Like [`init_logging`] for a logger with a custom console
pub fn init_with(logger: Logger, config: &Config) -> (Arc<Logger>, LoggingGuard) {
    config.apply(&logger);

    let logger = Arc::new(logger);
    let guard = LoggingGuard {
        logger: Arc::clone(&logger),
    };
    (logger, guard)
}
