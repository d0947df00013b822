//! Bridge from the `tracing` ecosystem into a [`Logger`]
//!
//! Events recorded with the standard `tracing` macros are mapped onto
//! severities and written through the logger's fan-out, so libraries that
//! instrument with `tracing` share the same destinations and line format.
//!
//! ```rust,ignore
//! let logger = Arc::new(Logger::new());
//! fanlog::logging::bridge::install(Arc::clone(&logger))?;
//!
//! tracing::warn!(retries = 3, "upstream slow");
//! ```

use std::fmt::{self, Write as _};
use std::sync::Arc;

use anyhow::{Context as _, Result};
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use super::format::Caller;
use super::logger::Logger;
use super::severity::Severity;

/// Layer forwarding every event to a logger
pub struct LoggerLayer {
    logger: Arc<Logger>,
}

impl LoggerLayer {
    pub fn new(logger: Arc<Logger>) -> Self {
        Self { logger }
    }
}

impl<S> Layer<S> for LoggerLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        let severity = Severity::from(*metadata.level());
        if !self.logger.is_enabled(severity) {
            return;
        }

        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);

        let caller = match (metadata.file(), metadata.line()) {
            (Some(file), Some(line)) => Some(Caller::new(file, line)),
            _ => None,
        };
        self.logger
            .log(severity, caller, format_args!("{}", visitor.finish()));
    }
}

/// Collects the message and renders other fields as `key=value`
#[derive(Default)]
struct MessageVisitor {
    message: String,
    fields: String,
}

impl MessageVisitor {
    fn finish(self) -> String {
        match (self.message.is_empty(), self.fields.is_empty()) {
            (_, true) => self.message,
            (true, false) => self.fields,
            (false, false) => format!("{} {}", self.message, self.fields),
        }
    }

    fn push_field(&mut self, field: &Field, value: fmt::Arguments<'_>) {
        if !self.fields.is_empty() {
            self.fields.push(' ');
        }
        let _ = write!(self.fields, "{}={}", field.name(), value);
    }
}

impl Visit for MessageVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{:?}", value);
        } else {
            self.push_field(field, format_args!("{:?}", value));
        }
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_owned();
        } else {
            self.push_field(field, format_args!("{}", value));
        }
    }
}

/// Install a global subscriber that forwards `tracing` events to `logger`.
///
/// `RUST_LOG` takes precedence; otherwise the logger's current level is used
/// as the filter.
pub fn install(logger: Arc<Logger>) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(logger.current_level().as_directive()));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(LoggerLayer::new(logger))
        .try_init()
        .context("Failed to install tracing subscriber")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::buffer::MemoryBuffer;
    use crate::logging::format::LineFormat;

    fn layered() -> (Arc<Logger>, MemoryBuffer) {
        let buffer = MemoryBuffer::new();
        let logger = Arc::new(Logger::with_console(buffer.clone()));
        (logger, buffer)
    }

    #[test]
    fn test_events_are_forwarded() {
        let (logger, buffer) = layered();
        let subscriber = tracing_subscriber::registry().with(LoggerLayer::new(Arc::clone(&logger)));

        tracing::subscriber::with_default(subscriber, || {
            tracing::info!("hello from tracing");
            tracing::warn!("careful");
            tracing::error!("failed");
        });

        let lines = buffer.lines();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("bridge.rs:"));
        assert!(lines[0].ends_with("[INFO] hello from tracing"));
        assert!(lines[1].ends_with("[WARNING] careful"));
        assert!(lines[2].ends_with("[ERROR] failed"));
    }

    #[test]
    fn test_events_respect_logger_level() {
        let (logger, buffer) = layered();
        logger.set_level(Severity::Warning);
        let subscriber = tracing_subscriber::registry().with(LoggerLayer::new(Arc::clone(&logger)));

        tracing::subscriber::with_default(subscriber, || {
            tracing::trace!("trace");
            tracing::debug!("debug");
            tracing::info!("info");
        });

        assert!(buffer.is_empty());
    }

    #[test]
    fn test_fields_are_appended() {
        let (logger, buffer) = layered();
        logger.set_format(LineFormat::bare());
        let subscriber = tracing_subscriber::registry().with(LoggerLayer::new(Arc::clone(&logger)));

        tracing::subscriber::with_default(subscriber, || {
            tracing::info!(count = 3, disk = "sda", "checked");
        });

        assert_eq!(buffer.contents(), "[INFO] checked count=3 disk=sda\n");
    }

    #[test]
    fn test_trace_maps_to_debug() {
        let (logger, buffer) = layered();
        logger.set_level(Severity::Debug);
        logger.set_format(LineFormat::bare());
        let subscriber = tracing_subscriber::registry().with(LoggerLayer::new(Arc::clone(&logger)));

        tracing::subscriber::with_default(subscriber, || {
            tracing::trace!("fine grained");
        });

        assert_eq!(buffer.contents(), "[DEBUG] fine grained\n");
    }
}
