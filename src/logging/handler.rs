//! Handler set: configured output destinations, one per kind

use std::collections::BTreeMap;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::paths;

/// Kind of output destination
///
/// Ordering decides the order in which sinks receive each line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum HandlerKind {
    Stdout,
    File,
}

impl HandlerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            HandlerKind::Stdout => "STDOUT",
            HandlerKind::File => "FILE",
        }
    }
}

impl fmt::Display for HandlerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Configuration of a single handler
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandlerConfig {
    Stdout,
    File { path: PathBuf },
}

impl HandlerConfig {
    /// File handler; an empty path resolves to [`paths::DEFAULT_LOG_FILE`]
    pub fn file(path: impl AsRef<Path>) -> Self {
        HandlerConfig::File {
            path: paths::resolve_log_file(path.as_ref()),
        }
    }

    pub fn kind(&self) -> HandlerKind {
        match self {
            HandlerConfig::Stdout => HandlerKind::Stdout,
            HandlerConfig::File { .. } => HandlerKind::File,
        }
    }

    /// File path for FILE handlers
    pub fn path(&self) -> Option<&Path> {
        match self {
            HandlerConfig::Stdout => None,
            HandlerConfig::File { path } => Some(path),
        }
    }
}

/// Failure to bring a handler online
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("Error opening file {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl HandlerError {
    pub fn kind(&self) -> HandlerKind {
        match self {
            HandlerError::Open { .. } => HandlerKind::File,
        }
    }
}

/// Mapping from handler kind to its configuration
///
/// Inserting a handler of a kind that is already present replaces it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerSet {
    handlers: BTreeMap<HandlerKind, HandlerConfig>,
}

impl HandlerSet {
    /// An empty set (no output at all)
    pub fn empty() -> Self {
        Self {
            handlers: BTreeMap::new(),
        }
    }

    /// Insert or replace the handler of the same kind, returning the old one
    pub fn insert(&mut self, handler: HandlerConfig) -> Option<HandlerConfig> {
        self.handlers.insert(handler.kind(), handler)
    }

    pub fn remove(&mut self, kind: HandlerKind) -> Option<HandlerConfig> {
        self.handlers.remove(&kind)
    }

    pub fn get(&self, kind: HandlerKind) -> Option<&HandlerConfig> {
        self.handlers.get(&kind)
    }

    pub fn contains(&self, kind: HandlerKind) -> bool {
        self.handlers.contains_key(&kind)
    }

    /// Handlers in sink order
    pub fn iter(&self) -> impl Iterator<Item = &HandlerConfig> {
        self.handlers.values()
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl Default for HandlerSet {
    /// Console only
    fn default() -> Self {
        let mut set = Self::empty();
        set.insert(HandlerConfig::Stdout);
        set
    }
}
