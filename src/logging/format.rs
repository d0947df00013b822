//! Line formatting: timestamp, caller location and severity tag

use std::fmt::{self, Write as _};
use std::panic::Location;
use std::path::Path;

use chrono::{DateTime, Local, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use super::severity::Severity;

/// How the source location is rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CallerFormat {
    /// Omit the location
    None,
    /// File name and line (`main.rs:12`)
    #[default]
    Short,
    /// Full path as compiled and line (`src/main.rs:12`)
    Long,
}

/// Source location of an emit call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller {
    pub file: &'static str,
    pub line: u32,
}

impl Caller {
    pub fn new(file: &'static str, line: u32) -> Self {
        Self { file, line }
    }

    /// Location of the caller of the current `#[track_caller]` function
    #[track_caller]
    pub fn here() -> Self {
        Location::caller().into()
    }

    fn short_file(&self) -> &'static str {
        Path::new(self.file)
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or(self.file)
    }
}

impl From<&'static Location<'static>> for Caller {
    fn from(location: &'static Location<'static>) -> Self {
        Self::new(location.file(), location.line())
    }
}

/// Formatting flags applied to every line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LineFormat {
    /// `2024/01/02`
    pub date: bool,
    /// `03:04:05`
    pub time: bool,
    /// `.123456` appended to the time (implies `time`)
    pub microseconds: bool,
    pub caller: CallerFormat,
    /// Use UTC instead of the local time zone
    pub utc: bool,
}

impl Default for LineFormat {
    fn default() -> Self {
        Self {
            date: true,
            time: true,
            microseconds: true,
            caller: CallerFormat::Short,
            utc: false,
        }
    }
}

impl LineFormat {
    /// Only the tag and the message
    pub fn bare() -> Self {
        Self {
            date: false,
            time: false,
            microseconds: false,
            caller: CallerFormat::None,
            utc: false,
        }
    }

    /// Render a complete, newline-terminated line
    pub fn render(
        &self,
        now: DateTime<Utc>,
        caller: Option<Caller>,
        severity: Severity,
        message: fmt::Arguments<'_>,
    ) -> String {
        let mut line = String::with_capacity(96);

        if self.utc {
            self.write_timestamp(&mut line, &now);
        } else {
            self.write_timestamp(&mut line, &now.with_timezone(&Local));
        }
        self.write_caller(&mut line, caller);

        let _ = write!(line, "[{}] {}", severity, message);
        if !line.ends_with('\n') {
            line.push('\n');
        }
        line
    }

    fn write_timestamp<Tz>(&self, out: &mut String, ts: &DateTime<Tz>)
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        if self.date {
            let _ = write!(out, "{} ", ts.format("%Y/%m/%d"));
        }
        if self.time || self.microseconds {
            let _ = write!(out, "{}", ts.format("%H:%M:%S"));
            if self.microseconds {
                let _ = write!(out, "{}", ts.format("%.6f"));
            }
            out.push(' ');
        }
    }

    fn write_caller(&self, out: &mut String, caller: Option<Caller>) {
        let (file, line) = match (self.caller, caller) {
            (CallerFormat::None, _) => return,
            (_, None) => ("???", 0),
            (CallerFormat::Short, Some(c)) => (c.short_file(), c.line),
            (CallerFormat::Long, Some(c)) => (c.file, c.line),
        };
        let _ = write!(out, "{}:{}: ", file, line);
    }
}
