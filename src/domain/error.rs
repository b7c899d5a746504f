use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for level parsing and logger configuration.
///
/// Log calls themselves never fail; these errors only surface from the
/// parsing and configuration entry points.
#[derive(Error, Debug)]
pub enum JloError {
    #[error("Invalid log level '{input}'. Valid levels: {valid_levels:?}")]
    InvalidLogLevel {
        input: String,
        valid_levels: Vec<String>,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to read config file {path}: {source}")]
    ConfigFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),
}

impl JloError {
    pub(crate) fn invalid_level(input: &str) -> Self {
        JloError::InvalidLogLevel {
            input: input.to_string(),
            valid_levels: ["debug", "info", "warn", "warning", "error", "fatal"]
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
        }
    }

    pub fn is_recoverable(&self) -> bool {
        match self {
            JloError::InvalidLogLevel { .. } => true,
            JloError::Config(_) => true,
            JloError::ConfigFile { .. } => false,
            JloError::ConfigParse(_) => false,
        }
    }
}
