//! Severity levels and level parsing
//!
//! `Severity` is the ordered importance of a message. `LevelSpec` is the raw,
//! user-supplied form of a minimum level (a number or a name) and is turned
//! into a `Severity` by a single permissive resolver.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Ordinal importance of a log message
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Severity {
    Debug = 1,
    Info = 2,
    Warning = 3,
    Error = 4,
}

impl Severity {
    /// All severities, lowest first
    pub const ALL: [Severity; 4] = [
        Severity::Debug,
        Severity::Info,
        Severity::Warning,
        Severity::Error,
    ];

    /// Tag used inside the bracketed part of an output line
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Debug => "DEBUG",
            Severity::Info => "INFO",
            Severity::Warning => "WARNING",
            Severity::Error => "ERROR",
        }
    }

    /// Numeric value (1..=4)
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Directive understood by `tracing_subscriber::EnvFilter`
    pub fn as_directive(&self) -> &'static str {
        match self {
            Severity::Debug => "debug",
            Severity::Info => "info",
            Severity::Warning => "warn",
            Severity::Error => "error",
        }
    }

    /// Clamp an arbitrary number into the severity range
    pub fn from_number(value: i64) -> Self {
        match value {
            i64::MIN..=1 => Severity::Debug,
            2 => Severity::Info,
            3 => Severity::Warning,
            _ => Severity::Error,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<tracing::Level> for Severity {
    fn from(level: tracing::Level) -> Self {
        match level {
            tracing::Level::TRACE | tracing::Level::DEBUG => Severity::Debug,
            tracing::Level::INFO => Severity::Info,
            tracing::Level::WARN => Severity::Warning,
            tracing::Level::ERROR => Severity::Error,
        }
    }
}

/// Error returned by the strict `Severity` parser
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown severity '{0}' (expected debug, info, warning or error)")]
pub struct ParseSeverityError(pub String);

/// Strict parsing: unknown names are an error.
///
/// Use [`LevelSpec::resolve`] for the permissive minimum-level behavior.
impl FromStr for Severity {
    type Err = ParseSeverityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "debug" => Ok(Severity::Debug),
            "info" => Ok(Severity::Info),
            "warning" | "warn" => Ok(Severity::Warning),
            "error" => Ok(Severity::Error),
            _ => Err(ParseSeverityError(s.to_string())),
        }
    }
}

/// A minimum level as supplied by a caller or a config file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LevelSpec {
    /// `1` (debug) through `4` (error)
    Numeric(i64),
    /// `"debug"`, `"info"`, `"warning"`; any other name means error
    Named(String),
}

impl LevelSpec {
    /// Resolve into a `Severity`.
    ///
    /// Names are compared case-insensitively. Unrecognized names resolve to
    /// `Severity::Error`. Numbers outside `1..=4` are clamped.
    pub fn resolve(&self) -> Severity {
        match self {
            LevelSpec::Numeric(n) => Severity::from_number(*n),
            LevelSpec::Named(name) => match name.trim().to_lowercase().as_str() {
                "debug" => Severity::Debug,
                "info" => Severity::Info,
                "warning" => Severity::Warning,
                _ => Severity::Error,
            },
        }
    }

    /// Interpret command-line text: integers are numeric, everything else a name
    pub fn from_arg(arg: &str) -> Self {
        match arg.trim().parse::<i64>() {
            Ok(n) => LevelSpec::Numeric(n),
            Err(_) => LevelSpec::Named(arg.to_string()),
        }
    }

    /// Whether the level was given by name
    pub fn is_named(&self) -> bool {
        matches!(self, LevelSpec::Named(_))
    }
}

impl Default for LevelSpec {
    fn default() -> Self {
        LevelSpec::Named("info".to_string())
    }
}

impl From<Severity> for LevelSpec {
    fn from(severity: Severity) -> Self {
        LevelSpec::Numeric(severity.as_u8() as i64)
    }
}

impl From<i64> for LevelSpec {
    fn from(value: i64) -> Self {
        LevelSpec::Numeric(value)
    }
}

impl From<i32> for LevelSpec {
    fn from(value: i32) -> Self {
        LevelSpec::Numeric(value as i64)
    }
}

impl From<u8> for LevelSpec {
    fn from(value: u8) -> Self {
        LevelSpec::Numeric(value as i64)
    }
}

impl From<&str> for LevelSpec {
    fn from(value: &str) -> Self {
        LevelSpec::Named(value.to_string())
    }
}

impl From<String> for LevelSpec {
    fn from(value: String) -> Self {
        LevelSpec::Named(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Debug < Severity::Info);
        assert!(Severity::Info < Severity::Warning);
        assert!(Severity::Warning < Severity::Error);
        assert_eq!(Severity::Debug.as_u8(), 1);
        assert_eq!(Severity::Error.as_u8(), 4);
    }

    #[test]
    fn test_warning_spellings_are_equivalent() {
        let by_upper = LevelSpec::from("WARNING").resolve();
        let by_lower = LevelSpec::from("warning").resolve();
        let by_number = LevelSpec::from(3).resolve();

        assert_eq!(by_upper, Severity::Warning);
        assert_eq!(by_lower, Severity::Warning);
        assert_eq!(by_number, Severity::Warning);
    }

    #[test]
    fn test_unknown_name_resolves_to_error() {
        assert_eq!(LevelSpec::from("bogus").resolve(), Severity::Error);
        assert_eq!(LevelSpec::from("").resolve(), Severity::Error);
        // Only the full name is accepted by the permissive resolver
        assert_eq!(LevelSpec::from("warn").resolve(), Severity::Error);
    }

    #[test]
    fn test_numeric_levels_clamp() {
        assert_eq!(LevelSpec::from(0).resolve(), Severity::Debug);
        assert_eq!(LevelSpec::from(-7).resolve(), Severity::Debug);
        assert_eq!(LevelSpec::from(1).resolve(), Severity::Debug);
        assert_eq!(LevelSpec::from(2).resolve(), Severity::Info);
        assert_eq!(LevelSpec::from(4).resolve(), Severity::Error);
        assert_eq!(LevelSpec::from(99).resolve(), Severity::Error);
    }

    #[test]
    fn test_from_arg() {
        assert_eq!(LevelSpec::from_arg("2"), LevelSpec::Numeric(2));
        assert_eq!(LevelSpec::from_arg(" 4 "), LevelSpec::Numeric(4));
        assert_eq!(
            LevelSpec::from_arg("Debug"),
            LevelSpec::Named("Debug".to_string())
        );
        assert!(LevelSpec::from_arg("info").is_named());
    }

    #[test]
    fn test_strict_parse() {
        assert_eq!("INFO".parse::<Severity>().unwrap(), Severity::Info);
        assert_eq!("warn".parse::<Severity>().unwrap(), Severity::Warning);
        assert_eq!("Warning".parse::<Severity>().unwrap(), Severity::Warning);

        let err = "loud".parse::<Severity>().unwrap_err();
        assert_eq!(err, ParseSeverityError("loud".to_string()));
        assert!(err.to_string().contains("loud"));
    }

    #[test]
    fn test_from_tracing_level() {
        assert_eq!(Severity::from(tracing::Level::TRACE), Severity::Debug);
        assert_eq!(Severity::from(tracing::Level::DEBUG), Severity::Debug);
        assert_eq!(Severity::from(tracing::Level::INFO), Severity::Info);
        assert_eq!(Severity::from(tracing::Level::WARN), Severity::Warning);
        assert_eq!(Severity::from(tracing::Level::ERROR), Severity::Error);
    }

    #[test]
    fn test_level_spec_from_toml() {
        #[derive(Deserialize)]
        struct Wrapper {
            level: LevelSpec,
        }

        let numeric: Wrapper = toml::from_str("level = 3").unwrap();
        assert_eq!(numeric.level, LevelSpec::Numeric(3));

        let named: Wrapper = toml::from_str("level = \"Debug\"").unwrap();
        assert_eq!(named.level.resolve(), Severity::Debug);
    }
}
