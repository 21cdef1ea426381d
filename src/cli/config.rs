//! Configuration file
//!
//! JSON object; every field is optional:
//!
//! ```json
//! {
//!   "store_path": "data/gmha.db",
//!   "log_level": "warn",
//!   "prompt": "GMHA> ",
//!   "default_worker_addr": "127.0.0.1:9001",
//!   "default_ssh_user": "root",
//!   "default_ssh_port": 22
//! }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

use crate::dispatch::CommandDefaults;
use crate::topology::{DEFAULT_SSH_PORT, DEFAULT_SSH_USER, DEFAULT_WORKER_ADDR};

use super::errors::{CliError, CliResult};

/// Looked up in the working directory when `--config` is not given
pub const DEFAULT_CONFIG_PATH: &str = "gmha.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Store file, created with its parent directories if missing
    #[serde(default = "default_store_path")]
    pub store_path: PathBuf,

    /// Log filter used when neither `--log-level` nor RUST_LOG is set
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Interactive prompt
    #[serde(default = "default_prompt")]
    pub prompt: String,

    /// Worker address for `cluster add` without `--listen`
    #[serde(default = "default_worker_addr")]
    pub default_worker_addr: String,

    #[serde(default = "default_ssh_user")]
    pub default_ssh_user: String,

    #[serde(default = "default_ssh_port")]
    pub default_ssh_port: u16,
}

fn default_store_path() -> PathBuf {
    PathBuf::from("data/gmha.db")
}
fn default_log_level() -> String {
    "warn".to_string()
}
fn default_prompt() -> String {
    "GMHA> ".to_string()
}
fn default_worker_addr() -> String {
    DEFAULT_WORKER_ADDR.to_string()
}
fn default_ssh_user() -> String {
    DEFAULT_SSH_USER.to_string()
}
fn default_ssh_port() -> u16 {
    DEFAULT_SSH_PORT
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store_path: default_store_path(),
            log_level: default_log_level(),
            prompt: default_prompt(),
            default_worker_addr: default_worker_addr(),
            default_ssh_user: default_ssh_user(),
            default_ssh_port: default_ssh_port(),
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            CliError::config_error(format!("Failed to read config {}: {}", path.display(), e))
        })?;

        let config: Config = serde_json::from_str(&content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    /// Load the given file, or `gmha.json` if it exists, or the defaults.
    ///
    /// An explicitly named file must exist.
    pub fn resolve(explicit: Option<&Path>) -> CliResult<Self> {
        match explicit {
            Some(path) => Self::load(path),
            None => {
                let fallback = Path::new(DEFAULT_CONFIG_PATH);
                if fallback.exists() {
                    Self::load(fallback)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    fn validate(&self) -> CliResult<()> {
        if self.store_path.as_os_str().is_empty() {
            return Err(CliError::config_error("store_path must not be empty"));
        }

        EnvFilter::try_new(&self.log_level).map_err(|e| {
            CliError::config_error(format!("Invalid log_level '{}': {}", self.log_level, e))
        })?;

        validate_addr(&self.default_worker_addr)?;

        if self.default_ssh_user.trim().is_empty() {
            return Err(CliError::config_error("default_ssh_user must not be empty"));
        }

        if self.default_ssh_port == 0 {
            return Err(CliError::config_error("default_ssh_port must be > 0"));
        }

        Ok(())
    }

    /// Defaults handed to the dispatcher
    pub fn command_defaults(&self) -> CommandDefaults {
        CommandDefaults {
            worker_addr: self.default_worker_addr.clone(),
            ssh_user: self.default_ssh_user.clone(),
            ssh_port: self.default_ssh_port,
        }
    }
}

/// `host:port` with a non-empty host and a port in 1..=65535.
fn validate_addr(addr: &str) -> CliResult<()> {
    let valid = match addr.rsplit_once(':') {
        Some((host, port)) => !host.is_empty() && matches!(port.parse::<u16>(), Ok(p) if p > 0),
        None => false,
    };
    if valid {
        Ok(())
    } else {
        Err(CliError::config_error(format!(
            "Invalid default_worker_addr '{}': expected host:port",
            addr
        )))
    }
}
