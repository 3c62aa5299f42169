//! Configuration file
//!
//! A JSON document such as:
//!
//! ```json
//! {
//!   "data_file": "./persons.csv",
//!   "log_level": "info",
//!   "server": { "host": "0.0.0.0", "port": 8080, "cors_origins": [] }
//! }
//! ```
//!
//! Every field is optional. A config path that does not exist yields the
//! defaults; a file that exists but cannot be parsed is an error.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::errors::{CliError, CliResult};
use crate::http_server::HttpServerConfig;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Process configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Person log location (default: "persons.csv")
    #[serde(default = "default_data_file")]
    pub data_file: PathBuf,

    /// Default tracing level when RUST_LOG is unset (default: "info")
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// HTTP listener settings
    #[serde(default)]
    pub server: HttpServerConfig,
}

fn default_data_file() -> PathBuf {
    PathBuf::from("persons.csv")
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_file: default_data_file(),
            log_level: default_log_level(),
            server: HttpServerConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from file, falling back to defaults if it is absent
    pub fn load(path: &Path) -> CliResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .map_err(|e| CliError::config_error(format!("Failed to read config: {}", e)))?;

        let config: Config = serde_json::from_str(&content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    /// Validate field values
    pub fn validate(&self) -> CliResult<()> {
        if self.data_file.as_os_str().is_empty() {
            return Err(CliError::config_error("data_file must not be empty"));
        }

        self.server.validate().map_err(CliError::config_error)?;

        if !LOG_LEVELS.contains(&self.log_level.as_str()) {
            return Err(CliError::config_error(format!(
                "Invalid log_level: '{}'. Must be one of {}.",
                self.log_level,
                LOG_LEVELS.join(", ")
            )));
        }

        Ok(())
    }
}
