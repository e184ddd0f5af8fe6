use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ConfigError;

/// Configuration for the print-osd application loaded from a TOML file.
///
/// All options live in a `[main]` table and are kept as text exactly as
/// written, typed accessors below interpret them. Values may be written as
/// strings, integers or booleans.
///
/// ```toml
/// [main]
/// mock = "0"
/// octo_host = "octopi.local"
/// octo_port = "80"
/// octo_api_key = "0123456789ABCDEF"
/// cam_host = "192.168.1.64"
/// cam_port = "80"
/// cam_user = "admin"
/// cam_password = "secret"
/// interval = "30"
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// `"1"` (or `true`) reads fixtures and prints to the console instead of
    /// talking to the printer and the camera.
    pub mock: String,

    /// Hostname of the OctoPrint server.
    pub octo_host: String,

    /// Port of the OctoPrint server.
    pub octo_port: String,

    /// OctoPrint API key, sent as the `apikey` query parameter.
    pub octo_api_key: String,

    /// Hostname of the camera.
    pub cam_host: String,

    /// Port of the camera's HTTP interface.
    pub cam_port: String,

    /// Camera user name.
    pub cam_user: String,

    /// Camera password.
    pub cam_password: String,

    /// Seconds between poll cycles.
    pub interval: String,
}

#[derive(Debug, Deserialize)]
struct ConfigFile {
    main: Option<toml::Table>,
}

impl Config {
    /// Load and validate the configuration file at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file does not exist (`ConfigError::MissingFile`)
    /// - The file cannot be read or is not valid TOML
    /// - Any required option is missing (`ConfigError::MissingOption`, naming
    ///   the first missing key)
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::MissingFile {
                path: path.display().to_string(),
            });
        }

        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        Self::from_toml_str(&contents)
    }

    /// Parse and validate configuration from TOML text.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile = toml::from_str(contents)?;
        let main = file.main.unwrap_or_default();

        // Checked in a fixed order so the first missing key is the one reported.
        Ok(Config {
            mock: required_option(&main, "mock")?,
            octo_host: required_option(&main, "octo_host")?,
            octo_port: required_option(&main, "octo_port")?,
            octo_api_key: required_option(&main, "octo_api_key")?,
            cam_host: required_option(&main, "cam_host")?,
            cam_port: required_option(&main, "cam_port")?,
            cam_user: required_option(&main, "cam_user")?,
            cam_password: required_option(&main, "cam_password")?,
            interval: required_option(&main, "interval")?,
        })
    }

    /// Whether mock mode is enabled.
    pub fn is_mock(&self) -> bool {
        matches!(self.mock.trim(), "1" | "true")
    }

    /// Poll interval in seconds, falling back to the default when the
    /// option is empty or not a positive integer.
    pub fn interval_seconds(&self) -> u64 {
        match self.interval.trim().parse::<u64>() {
            Ok(seconds) if seconds > 0 => seconds,
            _ => {
                if !self.interval.trim().is_empty() {
                    log::warn!(
                        "Invalid interval '{}', using default of {} seconds",
                        self.interval,
                        constants::DEFAULT_INTERVAL_SECONDS
                    );
                }
                constants::DEFAULT_INTERVAL_SECONDS
            }
        }
    }

    /// Base URL of the OctoPrint server, e.g. `http://octopi.local:80`.
    pub fn octo_base_url(&self) -> String {
        format!("http://{}:{}", self.octo_host, self.octo_port)
    }

    /// Base URL of the camera, e.g. `http://192.168.1.64:80`.
    pub fn cam_base_url(&self) -> String {
        format!("http://{}:{}", self.cam_host, self.cam_port)
    }
}

/// Default location of the configuration file.
pub fn default_config_path() -> PathBuf {
    PathBuf::from(constants::DEFAULT_CONFIG_FILE)
}

fn required_option(main: &toml::Table, key: &str) -> Result<String, ConfigError> {
    let value = main.get(key).ok_or_else(|| ConfigError::MissingOption {
        key: key.to_string(),
    })?;

    match value {
        toml::Value::String(s) => Ok(s.clone()),
        toml::Value::Integer(i) => Ok(i.to_string()),
        toml::Value::Float(f) => Ok(f.to_string()),
        toml::Value::Boolean(b) => Ok(b.to_string()),
        other => Err(ConfigError::InvalidFormat {
            reason: format!("option '{}' must be a scalar, got {}", key, other.type_str()),
        }),
    }
}

/// Application constants used throughout the system.
pub mod constants {
    /// Configuration file read when no path is given.
    pub const DEFAULT_CONFIG_FILE: &str = "config.toml";

    /// Poll interval used when the configured one is empty or invalid.
    pub const DEFAULT_INTERVAL_SECONDS: u64 = 30;

    /// Timeout applied to every HTTP request, in seconds.
    pub const REQUEST_TIMEOUT_SECONDS: u64 = 5;

    /// Job payload fixture used in mock mode.
    pub const MOCK_JOB_FILE: &str = "mock/job.json";

    /// Printer payload fixture used in mock mode.
    pub const MOCK_PRINTER_FILE: &str = "mock/printer.json";

    /// Text pushed to the camera by the connection test.
    pub const TEST_CONNECT_TEXT: &str = "lorem|ipsum";
}
