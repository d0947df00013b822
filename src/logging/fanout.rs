//! Broadcast writer that duplicates every write to each active sink

use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::fmt::MakeWriter;

use super::handler::HandlerKind;

/// Factory for the console stream, shared between rebuilds of the fan-out
pub type ConsoleMaker = Arc<BoxMakeWriter>;

/// A single opened destination
#[derive(Debug)]
pub enum Sink {
    /// Console stream; a fresh writer is made for every line
    Console(ConsoleMaker),
    /// Log file held open for the lifetime of the sink
    File { path: PathBuf, file: File },
}

impl Sink {
    pub fn kind(&self) -> HandlerKind {
        match self {
            Sink::Console(_) => HandlerKind::Stdout,
            Sink::File { .. } => HandlerKind::File,
        }
    }

    /// Path of a file sink
    pub fn path(&self) -> Option<&Path> {
        match self {
            Sink::Console(_) => None,
            Sink::File { path, .. } => Some(path),
        }
    }

    /// Write the whole buffer and flush
    fn write_flushed(&mut self, buf: &[u8]) -> io::Result<()> {
        match self {
            Sink::Console(maker) => {
                let mut writer = MakeWriter::make_writer(&**maker);
                writer.write_all(buf)?;
                writer.flush()
            }
            Sink::File { file, .. } => {
                file.write_all(buf)?;
                file.flush()
            }
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Sink::Console(maker) => MakeWriter::make_writer(&**maker).flush(),
            Sink::File { file, .. } => file.flush(),
        }
    }
}

/// Writer combining all sinks
///
/// Every write goes to every sink. A failing sink does not stop the others;
/// the first error is reported once all sinks were attempted.
#[derive(Debug, Default)]
pub struct FanoutWriter {
    sinks: Vec<Sink>,
}

impl FanoutWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, sink: Sink) {
        self.sinks.push(sink);
    }

    /// Kinds of the active sinks, in write order
    pub fn kinds(&self) -> Vec<HandlerKind> {
        self.sinks.iter().map(Sink::kind).collect()
    }

    pub fn sinks(&self) -> &[Sink] {
        &self.sinks
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }

    /// Flush and drop every sink, closing file handles
    pub fn close(&mut self) {
        let _ = self.flush();
        self.sinks.clear();
    }
}

impl Write for FanoutWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut first_error = None;

        for sink in &mut self.sinks {
            if let Err(e) = sink.write_flushed(buf) {
                first_error.get_or_insert(e);
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(buf.len()),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        let mut first_error = None;

        for sink in &mut self.sinks {
            if let Err(e) = sink.flush() {
                first_error.get_or_insert(e);
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}
