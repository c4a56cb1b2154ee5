use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable overriding `remote_database`.
pub const REMOTE_ENV: &str = "CLOSETRACK_REMOTE";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Shared store path; `None` runs offline.
    #[serde(default)]
    pub remote_database: Option<String>,
    #[serde(default = "default_echo_window_ms")]
    pub echo_window_ms: u64,
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    /// Custom roster YAML; the built-in roster is used when absent.
    #[serde(default)]
    pub roster_file: Option<String>,
}

fn default_echo_window_ms() -> u64 {
    3000
}
fn default_poll_interval_ms() -> u64 {
    500
}

impl Default for Config {
    fn default() -> Self {
        Self {
            remote_database: None,
            echo_window_ms: default_echo_window_ms(),
            poll_interval_ms: default_poll_interval_ms(),
            roster_file: None,
        }
    }
}

impl Config {
    /// Return the standard configuration directory depending on the platform
    pub fn config_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".closetrack")
    }

    /// Return the full path of the config file
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("closetrack.conf")
    }

    /// Default location of the shared store created by `init`
    pub fn database_file() -> PathBuf {
        Self::config_dir().join("closetrack.sqlite")
    }

    /// Load configuration from file (defaults if missing), then apply the
    /// environment override.
    pub fn load() -> AppResult<Self> {
        let mut cfg = Self::load_from(&Self::config_file())?;
        if let Ok(remote) = env::var(REMOTE_ENV)
            && !remote.trim().is_empty()
        {
            cfg.remote_database = Some(remote);
        }
        Ok(cfg)
    }

    pub fn load_from(path: &Path) -> AppResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        serde_yaml::from_str(&content)
            .map_err(|e| AppError::Config(format!("{}: {}", path.display(), e)))
    }

    pub fn save_to(&self, path: &Path) -> AppResult<()> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        let yaml = serde_yaml::to_string(self).map_err(|e| AppError::Config(e.to_string()))?;
        let mut file = fs::File::create(path)?;
        file.write_all(yaml.as_bytes())?;
        Ok(())
    }

    pub fn to_yaml(&self) -> AppResult<String> {
        serde_yaml::to_string(self).map_err(|e| AppError::Config(e.to_string()))
    }

    pub fn echo_window(&self) -> Duration {
        Duration::from_millis(self.echo_window_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(10))
    }
}
