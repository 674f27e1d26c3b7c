use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::coordinator::MIN_SEARCH_INTERVAL;

/// Main configuration structure
///
/// Loaded from the config file, then CLI flags override individual fields.
/// Missing file or missing keys fall back to defaults.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    #[serde(default)]
    pub github: GitHubConfig,
    #[serde(default)]
    pub search: SearchConfig,
}

impl Config {
    /// Load config from default location, or defaults if there isn't one
    pub fn load() -> crate::Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &std::path::Path) -> crate::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> crate::Result<Self> {
        toml::from_str(contents)
            .map_err(|e| crate::Error::ConfigError(format!("Failed to parse config: {}", e)))
    }

    /// Save config to disk
    pub fn save(&self) -> crate::Result<PathBuf> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| crate::Error::ConfigError(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(&config_path, contents)?;
        Ok(config_path)
    }

    /// XDG config dir on Linux, Application Support on macOS, AppData on Windows
    pub fn config_path() -> crate::Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| crate::Error::ConfigError("Could not find config directory".into()))?
            .join("codecheck");

        Ok(config_dir.join("config.toml"))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GitHubConfig {
    /// API URL (for GitHub Enterprise)
    #[serde(default = "default_github_url")]
    pub api_url: String,

    /// GitHub refuses requests without a User-Agent
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_github_url() -> String {
    codecheck_api::github::GITHUB_API_BASE.to_string()
}

fn default_user_agent() -> String {
    codecheck_api::github::DEFAULT_USER_AGENT.to_string()
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            api_url: default_github_url(),
            user_agent: default_user_agent(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SearchConfig {
    /// Minimum spacing between outgoing search requests, never below one second
    #[serde(default = "default_min_interval_ms")]
    pub min_interval_ms: u64,
}

fn default_min_interval_ms() -> u64 {
    1000
}

impl SearchConfig {
    pub fn min_interval(&self) -> Duration {
        Duration::from_millis(self.min_interval_ms).max(MIN_SEARCH_INTERVAL)
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            min_interval_ms: default_min_interval_ms(),
        }
    }
}
