use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::workspace::PathPolicy;

pub const CONFIG_FILE: &str = "filedesk.json";
pub const ENV_PREFIX: &str = "FILEDESK_";

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8888;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Directory every tool path is resolved against
    pub base_dir: PathBuf,
    pub host: String,
    pub port: u16,
    /// Static pages for the web UI
    pub frontend_dir: PathBuf,
    /// When set, logs are also written to a daily rolling file here
    pub log_dir: Option<PathBuf>,
    pub path_policy: PathPolicy,
    pub commands_enabled: bool,
    pub command_timeout_secs: Option<u64>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_dir: PathBuf::from("."),
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            frontend_dir: PathBuf::from("./frontend"),
            log_dir: None,
            path_policy: PathPolicy::Confined,
            commands_enabled: true,
            command_timeout_secs: None,
        }
    }
}

impl ServiceConfig {
    /// Load configuration from `path`, or from [`CONFIG_FILE`] in the current
    /// directory when no path is given. A missing default file yields the
    /// defaults; a missing explicit file is an error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let (config_path, required) = match path {
            Some(path) => (path.to_path_buf(), true),
            None => (PathBuf::from(CONFIG_FILE), false),
        };

        if !required && !config_path.exists() {
            return Ok(Self::default());
        }

        let display = config_path.display().to_string();
        let config_str = fs::read_to_string(&config_path).map_err(|source| ConfigError::Read {
            path: display.clone(),
            source,
        })?;

        serde_json::from_str(&config_str).map_err(|source| ConfigError::Parse {
            path: display,
            source,
        })
    }

    /// Override fields from `FILEDESK_*` environment variables.
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides(|key| env::var(format!("{}{}", ENV_PREFIX, key)).ok())
    }

    fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup("BASE_DIR") {
            self.base_dir = PathBuf::from(value);
        }
        if let Some(value) = lookup("HOST") {
            self.host = value;
        }
        if let Some(value) = lookup("PORT") {
            self.port = parse_value("PORT", &value)?;
        }
        if let Some(value) = lookup("FRONTEND_DIR") {
            self.frontend_dir = PathBuf::from(value);
        }
        if let Some(value) = lookup("LOG_DIR") {
            self.log_dir = Some(PathBuf::from(value));
        }
        if let Some(value) = lookup("PATH_POLICY") {
            self.path_policy = match value.to_ascii_lowercase().as_str() {
                "confined" => PathPolicy::Confined,
                "unrestricted" => PathPolicy::Unrestricted,
                _ => return Err(invalid("PATH_POLICY", &value)),
            };
        }
        if let Some(value) = lookup("COMMANDS_ENABLED") {
            self.commands_enabled = parse_value("COMMANDS_ENABLED", &value)?;
        }
        if let Some(value) = lookup("COMMAND_TIMEOUT_SECS") {
            self.command_timeout_secs = Some(parse_value("COMMAND_TIMEOUT_SECS", &value)?);
        }
        Ok(())
    }

    pub fn bind_address(&self) -> (String, u16) {
        (self.host.clone(), self.port)
    }

    pub fn command_timeout(&self) -> Option<Duration> {
        self.command_timeout_secs.map(Duration::from_secs)
    }
}

fn parse_value<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| invalid(key, value))
}

fn invalid(key: &str, value: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key: format!("{}{}", ENV_PREFIX, key),
        value: value.to_string(),
    }
}
