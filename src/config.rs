//! Logger configuration from TOML and the environment.
//!
//! ```toml
//! level = "warn"
//! output = "stderr"
//!
//! [keys]
//! level = "lvl"
//! message = "msg"
//! time = "time"
//! ```

use crate::domain::{FieldKeys, JloError, LogLevel};
use crate::logger::{Logger, Sink};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;
use tracing::debug;

pub const ENV_LOG_LEVEL: &str = "JLO_LOG_LEVEL";
pub const ENV_KEY_LEVEL: &str = "JLO_KEY_LEVEL";
pub const ENV_KEY_MESSAGE: &str = "JLO_KEY_MESSAGE";
pub const ENV_KEY_TIME: &str = "JLO_KEY_TIME";
pub const ENV_OUTPUT: &str = "JLO_OUTPUT";

/// Standard stream a configured logger writes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Output {
    #[default]
    Stdout,
    Stderr,
}

impl Output {
    fn parse(raw: &str) -> Result<Self, JloError> {
        match raw.trim().to_lowercase().as_str() {
            "stdout" => Ok(Output::Stdout),
            "stderr" => Ok(Output::Stderr),
            other => Err(JloError::Config(format!(
                "Invalid output '{other}'. Expected 'stdout' or 'stderr'"
            ))),
        }
    }

    fn sink(self) -> Sink {
        match self {
            Output::Stdout => Sink::stdout(),
            Output::Stderr => Sink::stderr(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    /// Threshold of the built logger; the process-wide default when unset.
    pub level: Option<LogLevel>,
    pub keys: FieldKeys,
    pub output: Output,
}

impl LoggerConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self, JloError> {
        let config: LoggerConfig = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, JloError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| JloError::ConfigFile {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "loaded logger config");
        Self::from_toml_str(&raw)
    }

    /// Defaults with the environment applied on top.
    pub fn from_env() -> Result<Self, JloError> {
        let mut config = Self::default();
        config.apply_env()?;
        Ok(config)
    }

    /// Overrides fields from `JLO_*` environment variables, then validates.
    pub fn apply_env(&mut self) -> Result<(), JloError> {
        self.apply_overrides(|name| env::var(name).ok())
    }

    fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), JloError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup(ENV_LOG_LEVEL) {
            self.level = Some(raw.parse()?);
        }
        if let Some(raw) = lookup(ENV_KEY_LEVEL) {
            self.keys.level = raw;
        }
        if let Some(raw) = lookup(ENV_KEY_MESSAGE) {
            self.keys.message = raw;
        }
        if let Some(raw) = lookup(ENV_KEY_TIME) {
            self.keys.time = raw;
        }
        if let Some(raw) = lookup(ENV_OUTPUT) {
            self.output = Output::parse(&raw)?;
        }
        self.validate()
    }

    pub fn validate(&self) -> Result<(), JloError> {
        let keys = [
            ("level", &self.keys.level),
            ("message", &self.keys.message),
            ("time", &self.keys.time),
        ];
        for (name, key) in keys {
            if key.trim().is_empty() {
                return Err(JloError::Config(format!("{name} key cannot be empty")));
            }
        }
        if self.keys.level == self.keys.message
            || self.keys.level == self.keys.time
            || self.keys.message == self.keys.time
        {
            return Err(JloError::Config(format!(
                "Field keys must be distinct, got level='{}' message='{}' time='{}'",
                self.keys.level, self.keys.message, self.keys.time
            )));
        }
        if self.level == Some(LogLevel::Unknown) {
            return Err(JloError::Config("Log level cannot be 'unknown'".into()));
        }
        Ok(())
    }

    /// Builds a logger writing to the configured stream.
    pub fn build(&self) -> Logger {
        self.build_with_sink(self.output.sink())
    }

    pub fn build_with_sink(&self, sink: Sink) -> Logger {
        let mut logger = Logger::with_sink(sink);
        logger.keys = self.keys.clone();
        if let Some(level) = self.level {
            logger.set_log_level(level);
        }
        logger
    }
}
