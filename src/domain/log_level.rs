use super::error::JloError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Severity of a log call, ordered from least to most severe.
///
/// The ordering is used directly as the threshold comparison: a logger with
/// threshold `T` emits a call at `S` iff `S >= T`. `Fatal` bypasses the
/// threshold entirely.
///
/// `Unknown` only exists as the sentinel returned by failed parses and has no
/// string form of its own; it renders as `fatal`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(u8)]
pub enum LogLevel {
    Unknown = 0,
    Debug = 1,
    #[default]
    Info = 2,
    Warning = 3,
    Error = 4,
    Fatal = 5,
}

impl LogLevel {
    /// Every level a logger can emit at, in ascending order.
    pub const ALL: [LogLevel; 5] = [
        LogLevel::Debug,
        LogLevel::Info,
        LogLevel::Warning,
        LogLevel::Error,
        LogLevel::Fatal,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warning => "warning",
            LogLevel::Error => "error",
            LogLevel::Unknown | LogLevel::Fatal => "fatal",
        }
    }

    /// Maps a raw numeric level onto the enum. Anything outside the defined
    /// range is treated as `Fatal`.
    pub fn from_repr(raw: i64) -> Self {
        match raw {
            0 => LogLevel::Unknown,
            1 => LogLevel::Debug,
            2 => LogLevel::Info,
            3 => LogLevel::Warning,
            4 => LogLevel::Error,
            _ => LogLevel::Fatal,
        }
    }

    /// Parses a level name, falling back to the `Unknown` sentinel.
    pub fn parse_or_unknown(s: &str) -> Self {
        s.parse().unwrap_or(LogLevel::Unknown)
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = JloError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warning),
            "error" => Ok(LogLevel::Error),
            "fatal" => Ok(LogLevel::Fatal),
            _ => Err(JloError::invalid_level(s)),
        }
    }
}

/// Parses a case-insensitive level name.
///
/// On failure the `Unknown` sentinel is returned alongside the error so that
/// callers which only want a best-effort level can keep going.
pub fn parse_level(s: &str) -> (LogLevel, Option<JloError>) {
    match s.parse() {
        Ok(level) => (level, None),
        Err(e) => (LogLevel::Unknown, Some(e)),
    }
}

impl Serialize for LogLevel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for LogLevel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
