//! fanlog - leveled logging with console/file fan-out
//!
//! This library provides a `Logger` that filters messages by a minimum
//! severity and writes each accepted line to every configured destination.

pub mod config;
pub mod logging;

pub use logging::{Logger, Severity};
