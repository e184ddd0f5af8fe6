//! Custom error types for the print-osd application.
//!
//! Configuration problems are fatal at startup. Status errors abort the
//! current poll cycle only; the driver logs them and tries again on the
//! next tick.

use std::fmt;

/// Errors related to loading and validating the configuration file.
#[derive(Debug)]
pub enum ConfigError {
    /// The configuration file does not exist.
    MissingFile { path: String },

    /// A required option is missing from the `[main]` table.
    MissingOption { key: String },

    /// The configuration file exists but could not be read.
    ReadFailed { path: String, reason: String },

    /// The configuration file is not valid TOML or has the wrong shape.
    InvalidFormat { reason: String },
}

/// Errors raised while merging a printer API payload into the status record.
#[derive(Debug)]
pub enum StatusError {
    /// The payload is not valid JSON.
    MalformedJson { reason: String },

    /// A required field is missing or is not a number.
    MissingField { path: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::MissingFile { path } => {
                write!(f, "Missing configuration! File not found: {}", path)
            }
            ConfigError::MissingOption { key } => {
                write!(f, "Missing option {}", key)
            }
            ConfigError::ReadFailed { path, reason } => {
                write!(
                    f,
                    "Failed to read configuration file '{}': {}",
                    path, reason
                )
            }
            ConfigError::InvalidFormat { reason } => {
                write!(f, "Invalid configuration file: {}", reason)
            }
        }
    }
}

impl fmt::Display for StatusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusError::MalformedJson { reason } => {
                write!(f, "Malformed status payload: {}", reason)
            }
            StatusError::MissingField { path } => {
                write!(f, "Status payload is missing numeric field '{}'", path)
            }
        }
    }
}

impl std::error::Error for ConfigError {}
impl std::error::Error for StatusError {}

impl From<serde_json::Error> for StatusError {
    fn from(err: serde_json::Error) -> Self {
        StatusError::MalformedJson {
            reason: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::InvalidFormat {
            reason: err.to_string(),
        }
    }
}
